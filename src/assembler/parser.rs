//! Pass 2: instruction/directive tokenization and encoding (spec.md §4.10).

use std::collections::HashMap;

use crate::common::AssembleError;
use crate::isa::encoding::{self, InstrFormat, MnemonicInfo};

use super::encode;
use super::token::{DirectiveToken, ImmOperand, InstructionToken, Token};

/// Splits an operand string on whitespace and commas, e.g.
/// `"x1, x2, x3"` -> `["x1", "x2", "x3"]`.
fn split_operands(s: &str) -> Vec<String> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts either an integer (`xN`) or floating-point (`fN`) register
/// name; encoding only needs the bare 5-bit index (spec.md §4.10).
fn parse_any_reg(name: &str, line: usize) -> Result<u32, AssembleError> {
    crate::isa::abi::parse_int_reg(name)
        .or_else(|| crate::isa::abi::parse_fp_reg(name))
        .ok_or_else(|| AssembleError::BadRegister {
            line,
            text: name.to_string(),
        })
}

/// Parses a literal or label immediate (spec.md §4.10): `0x` hex, `0o`
/// octal, leading-zero octal, signed decimal, or a bare label name.
pub fn parse_immediate(text: &str, line: usize) -> Result<ImmOperand, AssembleError> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, text),
    };
    let lower = body.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16)
            .map(|v| ImmOperand::Literal(sign * v))
            .map_err(|_| AssembleError::MalformedImmediate {
                line,
                text: text.to_string(),
            });
    }
    if let Some(oct) = lower.strip_prefix("0o") {
        return i64::from_str_radix(oct, 8)
            .map(|v| ImmOperand::Literal(sign * v))
            .map_err(|_| AssembleError::MalformedImmediate {
                line,
                text: text.to_string(),
            });
    }
    if lower.len() > 1 && lower.starts_with('0') && lower.chars().all(|c| c.is_ascii_digit()) {
        // Leading-zero octal (spec.md §4.10: "leading-0 octal (configurable)").
        return i64::from_str_radix(&lower[1..], 8)
            .map(|v| ImmOperand::Literal(sign * v))
            .map_err(|_| AssembleError::MalformedImmediate {
                line,
                text: text.to_string(),
            });
    }
    if body.chars().all(|c| c.is_ascii_digit()) && !body.is_empty() {
        return body
            .parse::<i64>()
            .map(|v| ImmOperand::Literal(sign * v))
            .map_err(|_| AssembleError::MalformedImmediate {
                line,
                text: text.to_string(),
            });
    }
    if sign == -1 {
        return Err(AssembleError::MalformedImmediate {
            line,
            text: text.to_string(),
        });
    }
    Ok(ImmOperand::Label(body.to_string()))
}

/// Parses the `imm(reg)` memory-operand syntax used by loads/stores and
/// `jalr` (spec.md §6.2).
fn parse_memory_operand(text: &str, line: usize) -> Result<(ImmOperand, u32), AssembleError> {
    let malformed = || AssembleError::MalformedMemoryOperand {
        line,
        text: text.to_string(),
    };
    let open = text.find('(').ok_or_else(malformed)?;
    let close = text.find(')').ok_or_else(malformed)?;
    if close < open {
        return Err(malformed());
    }
    let imm_text = text[..open].trim();
    let reg_text = text[open + 1..close].trim();
    let imm = if imm_text.is_empty() {
        ImmOperand::Literal(0)
    } else {
        parse_immediate(imm_text, line)?
    };
    let reg = parse_any_reg(reg_text, line)?;
    Ok((imm, reg))
}

fn expect_operands(
    operands: &[String],
    expected: usize,
    mnemonic: &str,
    line: usize,
) -> Result<(), AssembleError> {
    if operands.len() != expected {
        return Err(AssembleError::WrongOperandCount {
            line,
            mnemonic: mnemonic.to_string(),
            expected,
            got: operands.len(),
        });
    }
    Ok(())
}

/// Parses one instruction line into an [`InstructionToken`], dispatching
/// on the mnemonic's format and the memory-operand mnemonics that need
/// `imm(reg)` syntax instead of a flat operand list. `pc` is this
/// instruction's own byte address, recorded so branch/jump immediates
/// can be resolved against it later.
pub fn parse_instruction(
    line: usize,
    pc: u32,
    mnemonic: &str,
    info: &MnemonicInfo,
    operand_str: &str,
) -> Result<InstructionToken, AssembleError> {
    let operands = split_operands(operand_str);

    let is_memory_style = info.opcode == encoding::OPCODE_LOAD
        || info.opcode == encoding::OPCODE_FLW
        || info.opcode == encoding::OPCODE_FSW
        || mnemonic == "jalr";
    let is_no_operand =
        info.opcode == encoding::OPCODE_SYSTEM || info.opcode == encoding::OPCODE_FENCE;

    if is_no_operand {
        let imm = if mnemonic == "ebreak" { 1 } else { 0 };
        return Ok(InstructionToken {
            line,
            pc,
            mnemonic: mnemonic.to_string(),
            rd: Some(0),
            rs1: Some(0),
            rs2: None,
            imm: Some(ImmOperand::Literal(imm)),
        });
    }

    if is_memory_style {
        match info.format {
            InstrFormat::I => {
                expect_operands(&operands, 2, mnemonic, line)?;
                let rd = parse_any_reg(&operands[0], line)?;
                let (imm, rs1) = parse_memory_operand(&operands[1], line)?;
                Ok(InstructionToken {
                    line,
                    pc,
                    mnemonic: mnemonic.to_string(),
                    rd: Some(rd),
                    rs1: Some(rs1),
                    rs2: None,
                    imm: Some(imm),
                })
            }
            InstrFormat::S => {
                expect_operands(&operands, 2, mnemonic, line)?;
                let rs2 = parse_any_reg(&operands[0], line)?;
                let (imm, rs1) = parse_memory_operand(&operands[1], line)?;
                Ok(InstructionToken {
                    line,
                    pc,
                    mnemonic: mnemonic.to_string(),
                    rd: None,
                    rs1: Some(rs1),
                    rs2: Some(rs2),
                    imm: Some(imm),
                })
            }
            _ => unreachable!("memory-style mnemonics are only I or S format"),
        }
    } else {
        match info.format {
            InstrFormat::R => {
                if let Some(fixed_rs2) = info.fixed_rs2 {
                    expect_operands(&operands, 2, mnemonic, line)?;
                    let rd = parse_any_reg(&operands[0], line)?;
                    let rs1 = parse_any_reg(&operands[1], line)?;
                    Ok(InstructionToken {
                        line,
                        pc,
                        mnemonic: mnemonic.to_string(),
                        rd: Some(rd),
                        rs1: Some(rs1),
                        rs2: Some(fixed_rs2),
                        imm: None,
                    })
                } else {
                    expect_operands(&operands, 3, mnemonic, line)?;
                    let rd = parse_any_reg(&operands[0], line)?;
                    let rs1 = parse_any_reg(&operands[1], line)?;
                    let rs2 = parse_any_reg(&operands[2], line)?;
                    Ok(InstructionToken {
                        line,
                        pc,
                        mnemonic: mnemonic.to_string(),
                        rd: Some(rd),
                        rs1: Some(rs1),
                        rs2: Some(rs2),
                        imm: None,
                    })
                }
            }
            InstrFormat::I => {
                expect_operands(&operands, 3, mnemonic, line)?;
                let rd = parse_any_reg(&operands[0], line)?;
                let rs1 = parse_any_reg(&operands[1], line)?;
                let imm = parse_immediate(&operands[2], line)?;
                Ok(InstructionToken {
                    line,
                    pc,
                    mnemonic: mnemonic.to_string(),
                    rd: Some(rd),
                    rs1: Some(rs1),
                    rs2: None,
                    imm: Some(imm),
                })
            }
            InstrFormat::B => {
                expect_operands(&operands, 3, mnemonic, line)?;
                let rs1 = parse_any_reg(&operands[0], line)?;
                let rs2 = parse_any_reg(&operands[1], line)?;
                let imm = parse_immediate(&operands[2], line)?;
                Ok(InstructionToken {
                    line,
                    pc,
                    mnemonic: mnemonic.to_string(),
                    rd: None,
                    rs1: Some(rs1),
                    rs2: Some(rs2),
                    imm: Some(imm),
                })
            }
            InstrFormat::U => {
                expect_operands(&operands, 2, mnemonic, line)?;
                let rd = parse_any_reg(&operands[0], line)?;
                let imm = parse_immediate(&operands[1], line)?;
                Ok(InstructionToken {
                    line,
                    pc,
                    mnemonic: mnemonic.to_string(),
                    rd: Some(rd),
                    rs1: None,
                    rs2: None,
                    imm: Some(imm),
                })
            }
            InstrFormat::J => {
                expect_operands(&operands, 2, mnemonic, line)?;
                let rd = parse_any_reg(&operands[0], line)?;
                let imm = parse_immediate(&operands[1], line)?;
                Ok(InstructionToken {
                    line,
                    pc,
                    mnemonic: mnemonic.to_string(),
                    rd: Some(rd),
                    rs1: None,
                    rs2: None,
                    imm: Some(imm),
                })
            }
            InstrFormat::S => unreachable!("non-memory S-type mnemonics do not exist"),
        }
    }
}

/// Parses one directive line (`.byte 1, 2` -> name=".byte", args=["1","2"]).
pub fn parse_directive(line: usize, pc: u32, name: &str, arg_str: &str) -> Token {
    let args = split_operands(arg_str);
    Token::Directive(DirectiveToken {
        line,
        pc,
        name: name.to_string(),
        args,
    })
}

/// Range-checks a sign-extended value against a field width and returns
/// it masked to that width.
fn field_fits(value: i64, bits: u32, line: usize) -> Result<u32, AssembleError> {
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    if value < min || value > max {
        return Err(AssembleError::ImmediateOutOfRange { line, value, bits });
    }
    let mask = (1u32 << bits) - 1;
    Ok((value as i32 as u32) & mask)
}

/// Resolves an `ImmOperand` to a concrete i64 against the label table.
/// `pc_relative` selects branch/jump semantics: the encoded value becomes
/// `target - current_pc` rather than the absolute address.
fn resolve_immediate(
    imm: &ImmOperand,
    labels: &HashMap<String, u32>,
    current_pc: u32,
    pc_relative: bool,
    line: usize,
) -> Result<i64, AssembleError> {
    match imm {
        ImmOperand::Literal(v) => Ok(*v),
        ImmOperand::Label(name) => {
            let target = *labels
                .get(name)
                .ok_or_else(|| AssembleError::UndefinedLabel {
                    line,
                    label: name.clone(),
                })?;
            if pc_relative {
                Ok(target as i64 - current_pc as i64)
            } else {
                Ok(target as i64)
            }
        }
    }
}

/// Encodes a single [`Token`] into its 32-bit machine word, given the
/// label table.
pub fn encode_token(token: &Token, labels: &HashMap<String, u32>) -> Result<u32, AssembleError> {
    match token {
        Token::Instruction(instr) => encode_instruction(instr, labels),
        Token::Directive(dir) => encode_directive(dir, labels),
    }
}

fn encode_instruction(
    instr: &InstructionToken,
    labels: &HashMap<String, u32>,
) -> Result<u32, AssembleError> {
    let info = encoding::lookup(&instr.mnemonic).ok_or_else(|| AssembleError::UnknownMnemonic {
        line: instr.line,
        mnemonic: instr.mnemonic.clone(),
    })?;

    let rd = instr.rd.unwrap_or(0);
    let rs1 = instr.rs1.unwrap_or(0);
    let rs2 = instr.rs2.unwrap_or(0);
    let funct3 = info.funct3.unwrap_or(0);
    let funct7 = info.funct7.unwrap_or(0);

    let word = match info.format {
        InstrFormat::R => encode::encode_r(funct7, rs2, rs1, funct3, rd, info.opcode),
        InstrFormat::I => {
            let value =
                resolve_immediate(instr.imm.as_ref().unwrap(), labels, instr.pc, false, instr.line)?;
            let field = field_fits(value, 12, instr.line)?;
            encode::encode_i(field, rs1, funct3, rd, info.opcode)
        }
        InstrFormat::S => {
            let value =
                resolve_immediate(instr.imm.as_ref().unwrap(), labels, instr.pc, false, instr.line)?;
            let field = field_fits(value, 12, instr.line)?;
            encode::encode_s(field, rs2, rs1, funct3, info.opcode)
        }
        InstrFormat::B => {
            let value =
                resolve_immediate(instr.imm.as_ref().unwrap(), labels, instr.pc, true, instr.line)?;
            if value % 2 != 0 {
                return Err(AssembleError::OddBranchOffset {
                    line: instr.line,
                    offset: value,
                });
            }
            let field = field_fits(value, 13, instr.line)?;
            encode::encode_b(field, rs2, rs1, funct3, info.opcode)
        }
        InstrFormat::U => {
            let value =
                resolve_immediate(instr.imm.as_ref().unwrap(), labels, instr.pc, false, instr.line)?;
            encode::encode_u((value as u32) & 0xFFFF_F000, rd, info.opcode)
        }
        InstrFormat::J => {
            let value =
                resolve_immediate(instr.imm.as_ref().unwrap(), labels, instr.pc, true, instr.line)?;
            if value % 2 != 0 {
                return Err(AssembleError::OddBranchOffset {
                    line: instr.line,
                    offset: value,
                });
            }
            let field = field_fits(value, 21, instr.line)?;
            encode::encode_j(field, rd, info.opcode)
        }
    };
    Ok(word)
}

/// Packs a directive's listed values into a single 32-bit word — see
/// `SPEC_FULL.md` §4 for why directives occupy exactly one word each,
/// matching pass 1's uniform 4-byte-per-line PC model.
fn encode_directive(dir: &DirectiveToken, labels: &HashMap<String, u32>) -> Result<u32, AssembleError> {
    match dir.name.as_str() {
        ".align" => Ok(0),
        ".byte" => pack_bytes(dir, labels, 1),
        ".half" => pack_bytes(dir, labels, 2),
        ".word" => pack_bytes(dir, labels, 4),
        ".float" | ".double" => pack_float(dir),
        ".ascii" | ".asciz" | ".string" => pack_string(dir),
        other => Err(AssembleError::UnknownDirective {
            line: dir.line,
            directive: other.to_string(),
        }),
    }
}

fn pack_bytes(dir: &DirectiveToken, labels: &HashMap<String, u32>, unit_bytes: u32) -> Result<u32, AssembleError> {
    let mut word = 0u32;
    let mut shift = 0u32;
    for arg in &dir.args {
        if shift >= 32 {
            break;
        }
        let imm = parse_immediate(arg, dir.line)?;
        let value = resolve_immediate(&imm, labels, dir.pc, false, dir.line)? as u32;
        let mask = if unit_bytes >= 4 {
            u32::MAX
        } else {
            (1u32 << (unit_bytes * 8)) - 1
        };
        word |= (value & mask) << shift;
        shift += unit_bytes * 8;
    }
    Ok(word)
}

fn pack_float(dir: &DirectiveToken) -> Result<u32, AssembleError> {
    let text = dir
        .args
        .first()
        .ok_or_else(|| AssembleError::MalformedImmediate {
            line: dir.line,
            text: String::new(),
        })?;
    let value: f32 = text.parse().map_err(|_| AssembleError::MalformedImmediate {
        line: dir.line,
        text: text.clone(),
    })?;
    Ok(value.to_bits())
}

fn pack_string(dir: &DirectiveToken) -> Result<u32, AssembleError> {
    let text = dir.args.join(" ");
    let stripped = text.trim_matches('"');
    let mut bytes: Vec<u8> = stripped.bytes().collect();
    if dir.name != ".ascii" {
        bytes.push(0);
    }
    bytes.truncate(4);
    let mut word = 0u32;
    for (i, b) in bytes.iter().enumerate() {
        word |= (*b as u32) << (8 * i);
    }
    Ok(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_octal_decimal_and_label_immediates() {
        assert_eq!(parse_immediate("0x10", 1).unwrap(), ImmOperand::Literal(16));
        assert_eq!(parse_immediate("0o17", 1).unwrap(), ImmOperand::Literal(15));
        assert_eq!(parse_immediate("-5", 1).unwrap(), ImmOperand::Literal(-5));
        assert_eq!(
            parse_immediate("loop_top", 1).unwrap(),
            ImmOperand::Label("loop_top".to_string())
        );
    }

    #[test]
    fn memory_operand_splits_imm_and_register() {
        let (imm, reg) = parse_memory_operand("8(x2)", 1).unwrap();
        assert_eq!(imm, ImmOperand::Literal(8));
        assert_eq!(reg, 2);
    }

    #[test]
    fn r_type_instruction_round_trips_to_add_encoding() {
        let info = encoding::lookup("add").unwrap();
        let token = parse_instruction(1, 0, "add", &info, "x1, x2, x3").unwrap();
        let labels = HashMap::new();
        let word = encode_token(&Token::Instruction(token), &labels).unwrap();
        assert_eq!(word, 0x0031_00B3);
    }

    #[test]
    fn load_uses_memory_operand_syntax() {
        let info = encoding::lookup("lw").unwrap();
        let token = parse_instruction(1, 0, "lw", &info, "x3, 0(x2)").unwrap();
        assert_eq!(token.rd, Some(3));
        assert_eq!(token.rs1, Some(2));
    }

    #[test]
    fn branch_to_label_encodes_pc_relative_offset() {
        let info = encoding::lookup("beq").unwrap();
        let token = parse_instruction(2, 4, "beq", &info, "x0, x0, target").unwrap();
        let mut labels = HashMap::new();
        labels.insert("target".to_string(), 12);
        let word = encode_token(&Token::Instruction(token), &labels).unwrap();
        assert_eq!(crate::core::control::imm_b(word), 8);
    }

    #[test]
    fn byte_directive_packs_little_endian() {
        let dir = DirectiveToken {
            line: 1,
            pc: 0,
            name: ".byte".to_string(),
            args: vec!["1".to_string(), "2".to_string()],
        };
        let labels = HashMap::new();
        assert_eq!(encode_directive(&dir, &labels).unwrap(), 0x0000_0201);
    }
}
