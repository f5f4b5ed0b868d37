//! Two-pass assembler (spec.md §4.10): assembly text in, one 32-bit
//! little-endian hex word per instruction/directive line out.

use crate::common::{AssembleError, Bits};
use crate::isa::encoding;

mod encode;
mod labels;
mod parser;
mod token;

pub use token::{DirectiveToken, ImmOperand, InstructionToken, Token};

/// Assembles `source` starting at `start_address`, returning the output
/// hex stream as one upper-case, byte-swapped 8-digit string per line
/// (spec.md §6.3).
pub struct Assembler;

impl Assembler {
    /// Runs both passes and returns the assembled word stream.
    pub fn assemble(source: &str, start_address: u32) -> Result<Vec<String>, AssembleError> {
        let words = Self::assemble_words(source, start_address)?;
        Ok(words
            .into_iter()
            .map(|w| Bits::new(w as u64, 32).to_hex32_little_endian())
            .collect())
    }

    /// Same as [`Self::assemble`] but returns raw 32-bit words, for callers
    /// (the CPU driver) that want to load them directly into instruction
    /// memory instead of round-tripping through hex text.
    pub fn assemble_words(source: &str, start_address: u32) -> Result<Vec<u32>, AssembleError> {
        let labels = labels::build_label_table(source, start_address);
        let tokens = Self::tokenize(source, start_address)?;
        tokens
            .iter()
            .map(|token| parser::encode_token(token, &labels))
            .collect()
    }

    /// Pass 2 tokenization: walks the source a second time, tracking its
    /// own PC counter identically to pass 1, producing one [`Token`] per
    /// instruction/directive line (labels and section directives produce
    /// no token).
    fn tokenize(source: &str, start_address: u32) -> Result<Vec<Token>, AssembleError> {
        let mut pc = start_address;
        let mut tokens = Vec::new();

        for (idx, raw_line) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = labels::strip_comment(raw_line);
            if line.is_empty() || labels::is_section_directive(line) || line.ends_with(':') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('.') {
                let (name, arg_str) = split_first_word(rest);
                let name = format!(".{name}");
                tokens.push(parser::parse_directive(line_no, pc, &name, arg_str));
            } else {
                let (mnemonic, operand_str) = split_first_word(line);
                let mnemonic = mnemonic.to_ascii_lowercase();
                let info = encoding::lookup(&mnemonic).ok_or_else(|| AssembleError::UnknownMnemonic {
                    line: line_no,
                    mnemonic: mnemonic.clone(),
                })?;
                let instr = parser::parse_instruction(line_no, pc, &mnemonic, &info, operand_str)?;
                tokens.push(Token::Instruction(instr));
            }
            pc = pc.wrapping_add(4);
        }

        Ok(tokens)
    }
}

/// Splits a line into its first whitespace-delimited word and the
/// (trimmed) remainder.
fn split_first_word(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(idx) => (&line[..idx], line[idx..].trim()),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_add_at_pc_zero() {
        let words = Assembler::assemble_words("add x1, x2, x3", 0).unwrap();
        assert_eq!(words, vec![0x0031_00B3]);
    }

    #[test]
    fn branch_to_forward_label_skips_one_instruction() {
        let source = "beq x0, x0, target\naddi x0, x0, 0\ntarget:\naddi x0, x0, 0";
        let words = Assembler::assemble_words(source, 0).unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(crate::core::control::imm_b(words[0]), 8);
    }

    #[test]
    fn hex_output_is_little_endian_and_upper_case() {
        let hex = Assembler::assemble("add x1, x2, x3", 0).unwrap();
        assert_eq!(hex, vec!["B3003100".to_string()]);
    }

    #[test]
    fn unknown_mnemonic_is_an_error() {
        let err = Assembler::assemble_words("bogus x1, x2, x3", 0).unwrap_err();
        assert!(matches!(err, AssembleError::UnknownMnemonic { .. }));
    }
}
