//! Pass 1: label resolution (spec.md §4.10).
//!
//! Walks the source once, advancing a PC counter by 4 bytes per
//! non-label, non-section-directive line, and records every label's
//! address. Per spec.md §9 Open Questions this uses a byte-granularity
//! PC step of 4 (not 32) and `any()` (not `all()`) to match a section
//! directive — both bugs present in some variants of the source this
//! spec was distilled from.

use std::collections::HashMap;

const SECTION_DIRECTIVES: [&str; 5] = [".globl", ".section", ".text", ".data", ".bss"];

/// Strips a `#`-to-end-of-line comment and surrounding whitespace.
pub(crate) fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}

pub(crate) fn is_section_directive(line: &str) -> bool {
    SECTION_DIRECTIVES.iter().any(|prefix| line.starts_with(prefix))
}

/// Builds the label → byte-address table. Labels are lines ending in
/// `:`; every other non-blank, non-section-directive line is assumed to
/// occupy exactly one 32-bit word, whether it holds an instruction or a
/// data directive (spec.md §4.10 pass 1).
pub fn build_label_table(source: &str, start_address: u32) -> HashMap<String, u32> {
    let mut pc = start_address;
    let mut labels = HashMap::new();

    for raw_line in source.lines() {
        let line = strip_comment(raw_line);
        if line.is_empty() {
            continue;
        }
        if is_section_directive(line) {
            continue;
        }
        if let Some(label) = line.strip_suffix(':') {
            labels.insert(label.trim().to_string(), pc);
        } else {
            pc = pc.wrapping_add(4);
        }
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_does_not_advance_pc() {
        let source = "start:\n  addi x1, x0, 1\nloop:\n  addi x1, x1, 1";
        let labels = build_label_table(source, 0);
        assert_eq!(labels["start"], 0);
        assert_eq!(labels["loop"], 4);
    }

    #[test]
    fn section_directives_are_ignored_without_advancing_pc() {
        let source = ".text\n.globl main\nmain:\n  addi x1, x0, 1";
        let labels = build_label_table(source, 0);
        assert_eq!(labels["main"], 0);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let source = "# a comment\n\nfoo:\n  addi x1, x0, 1  # trailing";
        let labels = build_label_table(source, 0x1000);
        assert_eq!(labels["foo"], 0x1000);
    }

    #[test]
    fn data_directive_lines_advance_pc_like_instructions() {
        let source = "a:\n.word 1\nb:\n  addi x1, x0, 1";
        let labels = build_label_table(source, 0);
        assert_eq!(labels["a"], 0);
        assert_eq!(labels["b"], 4);
    }
}
