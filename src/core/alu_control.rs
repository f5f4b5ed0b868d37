//! ALU-control: `(ALUOp, funct3, funct7[30]) -> alu_op` (spec.md §4.7).

use crate::common::ExecError;
use crate::core::alu::AluOp;
use crate::core::control::AluOpClass;

/// Resolves the control unit's coarse `ALUOpClass` plus the instruction's
/// funct3/funct7-bit-30 into a concrete [`AluOp`]. `OP = true` selects the
/// ADD/SUB and SRL/SRA disambiguation bit; callers pass `instr.bit(30)`.
///
/// `AluOpClass::Fp` is never passed here — FP ops are routed to the FPU by
/// the datapath before reaching ALU-control (spec.md §4.7).
pub fn resolve(class: AluOpClass, funct3: u32, funct7_bit30: bool, is_imm: bool) -> Result<AluOp, ExecError> {
    match class {
        AluOpClass::Add => Ok(AluOp::Add),
        AluOpClass::BranchCompare => match funct3 {
            0b000 | 0b001 => Ok(AluOp::Sub), // beq, bne
            0b100 | 0b101 => Ok(AluOp::Slt), // blt, bge
            0b110 | 0b111 => Ok(AluOp::Sltu), // bltu, bgeu
            other => Err(ExecError::UnsupportedFunct {
                pc: 0,
                opcode: 0,
                funct3: other,
                funct7: 0,
            }),
        },
        AluOpClass::DecodeFunct => match funct3 {
            0b000 => {
                // SUB only exists in R-type (funct7[30]=1); I-type opcode
                // 0b000 (addi) is always ADD regardless of that bit.
                if funct7_bit30 && !is_imm {
                    Ok(AluOp::Sub)
                } else {
                    Ok(AluOp::Add)
                }
            }
            0b001 => Ok(AluOp::Sll),
            0b010 => Ok(AluOp::Slt),
            0b011 => Ok(AluOp::Sltu),
            0b100 => Ok(AluOp::Xor),
            0b101 => {
                if funct7_bit30 {
                    Ok(AluOp::Sra)
                } else {
                    Ok(AluOp::Srl)
                }
            }
            0b110 => Ok(AluOp::Or),
            0b111 => Ok(AluOp::And),
            other => Err(ExecError::UnsupportedFunct {
                pc: 0,
                opcode: 0,
                funct3: other,
                funct7: 0,
            }),
        },
        AluOpClass::Fp => Err(ExecError::UnsupportedAluOp(0xFF)),
    }
}
