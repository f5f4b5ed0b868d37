//! Error taxonomy (spec.md §7).
//!
//! Assembly and execution fail into two disjoint enums. Neither is ever
//! swallowed or retried: an `AssembleError` aborts assembly, an `ExecError`
//! aborts the run. IEEE-754 exceptions are *not* errors — they're returned
//! as flags from the FPU (see [`crate::core::fpu`]) and never abort
//! anything.

use thiserror::Error;

/// Errors raised while turning assembly text into machine words
/// (spec.md §4.10, §7: "Syntax error" and "Encoding error").
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    #[error("line {line}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: '{text}' is not a valid register name")]
    BadRegister { line: usize, text: String },

    #[error("line {line}: malformed immediate '{text}'")]
    MalformedImmediate { line: usize, text: String },

    #[error("line {line}: undefined label '{label}'")]
    UndefinedLabel { line: usize, label: String },

    #[error("line {line}: immediate {value} does not fit in {bits} bits")]
    ImmediateOutOfRange { line: usize, value: i64, bits: u32 },

    #[error("line {line}: branch/jump offset {offset} is not even")]
    OddBranchOffset { line: usize, offset: i64 },

    #[error("line {line}: wrong number of operands for '{mnemonic}' (expected {expected}, got {got})")]
    WrongOperandCount {
        line: usize,
        mnemonic: String,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: malformed memory operand '{text}' (expected imm(reg))")]
    MalformedMemoryOperand { line: usize, text: String },

    #[error("line {line}: unknown directive '{directive}'")]
    UnknownDirective { line: usize, directive: String },
}

/// Errors raised while executing already-assembled machine words
/// (spec.md §7: "Decode error", "Memory fault", "Unsupported op").
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecError {
    #[error("unrecognized opcode {opcode:#09b} at pc {pc:#x}")]
    UnknownOpcode { pc: u32, opcode: u32 },

    #[error("opcode {opcode:#09b} at pc {pc:#x} has unsupported funct3={funct3} funct7={funct7}")]
    UnsupportedFunct {
        pc: u32,
        opcode: u32,
        funct3: u32,
        funct7: u32,
    },

    #[error("ALU received unknown op tag {0:#x}")]
    UnsupportedAluOp(u8),

    #[error("FPU received unknown op tag {0:#x}")]
    UnsupportedFpuOp(u8),

    #[error("memory access out of bounds: address {addr:#x} (len {len}) exceeds ceiling {ceiling:#x}")]
    MemoryOutOfBounds { addr: u32, len: u32, ceiling: u32 },
}
