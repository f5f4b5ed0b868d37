//! Instruction Set Architecture tables: register-name parsing and the
//! mnemonic → encoding-format lookup the assembler drives (spec.md §6.4).

/// Integer/FP register name parsing (`x0..x31`, `f0..f31`).
pub mod abi;

/// Mnemonic → format/opcode/funct3/funct7 tables.
pub mod encoding;

pub use encoding::{lookup, InstrFormat, MnemonicInfo};
