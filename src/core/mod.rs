//! The gate-level arithmetic units and the single-cycle datapath that
//! wires them together (spec.md §4.3–§4.11).

/// Integer ALU and M-extension multiply/divide unit (spec.md §4.4, §6.4).
pub mod alu;

/// `(ALUOp, funct3, funct7[30]) -> AluOp` (spec.md §4.7).
pub mod alu_control;

/// Opcode -> control signals, plus the five immediate extractors (spec.md §4.6).
pub mod control;

/// Single-cycle datapath driver (spec.md §4.11).
pub mod cpu;

/// IEEE-754 binary32 floating-point unit (spec.md §4.5).
pub mod fpu;

/// Word-indexed instruction store and program counter (spec.md §4.9).
pub mod instruction_memory;

/// Sparse byte-addressable data memory (spec.md §4.8).
pub mod memory;

/// 32-register integer/FP register files (spec.md §4.3).
pub mod register_file;
