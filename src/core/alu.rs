//! Integer ALU (spec.md §4.4).

use crate::common::bits::or_reduce;
use crate::common::{Bits, ExecError};

/// The closed set of integer ALU operations. An unrecognized tag is fatal
/// (spec.md §4.4); `Alu::update_tagged` is the only entry point that can
/// observe one, and every other path goes through this enum directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
    Sll,
    Srl,
    Sra,
    Slt,
    Sltu,
}

/// Integer arithmetic-logic unit.
pub struct Alu;

impl Alu {
    /// `update(op_code, a, b) -> (zero_flag, result)` (spec.md §4.4).
    ///
    /// `a` and `b` are 32-bit operands. The zero flag is the OR-reduction
    /// of the result bits, inverted (ALU.zero-flag, spec.md §8).
    pub fn update(op: AluOp, a: u32, b: u32) -> (bool, u32) {
        let result = match op {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => Self::sub(a, b),
            AluOp::And => a & b,
            AluOp::Or => a | b,
            AluOp::Xor => a ^ b,
            AluOp::Sll => a.wrapping_shl(b & 0x1f),
            AluOp::Srl => a.wrapping_shr(b & 0x1f),
            AluOp::Sra => ((a as i32) >> (b & 0x1f)) as u32,
            AluOp::Slt => ((a as i32) < (b as i32)) as u32,
            AluOp::Sltu => (a < b) as u32,
        };
        let zero = or_reduce(&Bits::new(result as u64, 32)) == 0;
        (zero, result)
    }

    /// Two's-complement subtraction, expressed exactly as spec.md §4.4
    /// states it: `a + (~b + 1)`. Kept separate so ALU.twos-complement-sub
    /// (spec.md §8) can be checked against `Alu::update(Add, a, !b + 1)`.
    pub fn sub(a: u32, b: u32) -> u32 {
        a.wrapping_add((!b).wrapping_add(1))
    }

    /// Same as `update`, but for callers holding a raw 4-bit op tag rather
    /// than an `AluOp`; returns an error for tags outside the closed set.
    pub fn update_tagged(tag: u8, a: u32, b: u32) -> Result<(bool, u32), ExecError> {
        let op = match tag {
            0 => AluOp::Add,
            1 => AluOp::Sub,
            2 => AluOp::And,
            3 => AluOp::Or,
            4 => AluOp::Xor,
            5 => AluOp::Sll,
            6 => AluOp::Srl,
            7 => AluOp::Sra,
            8 => AluOp::Slt,
            9 => AluOp::Sltu,
            other => return Err(ExecError::UnsupportedAluOp(other)),
        };
        Ok(Self::update(op, a, b))
    }
}

/// Integer multiply/divide unit (RISC-V M extension, spec.md §6.4).
///
/// Kept separate from [`Alu`] because spec.md §4.4 enumerates only the
/// ten base-ALU ops; M-extension ops are routed here by the datapath
/// (spec.md §4.11 step 6) instead of through `AluControl`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MulDivOp {
    Mul,
    Mulh,
    Mulhsu,
    Mulhu,
    Div,
    Divu,
    Rem,
    Remu,
}

pub struct MulDiv;

impl MulDiv {
    pub fn update(op: MulDivOp, a: u32, b: u32) -> u32 {
        match op {
            MulDivOp::Mul => a.wrapping_mul(b),
            MulDivOp::Mulh => {
                (((a as i32) as i64).wrapping_mul((b as i32) as i64) >> 32) as u32
            }
            MulDivOp::Mulhsu => {
                (((a as i32) as i64).wrapping_mul(b as i64) >> 32) as u32
            }
            MulDivOp::Mulhu => ((a as u64).wrapping_mul(b as u64) >> 32) as u32,
            MulDivOp::Div => {
                if b == 0 {
                    0xFFFF_FFFF
                } else if a == 0x8000_0000 && b == 0xFFFF_FFFF {
                    a // signed overflow: -2^31 / -1 = -2^31
                } else {
                    ((a as i32).wrapping_div(b as i32)) as u32
                }
            }
            MulDivOp::Divu => {
                if b == 0 {
                    0xFFFF_FFFF
                } else {
                    a / b
                }
            }
            MulDivOp::Rem => {
                if b == 0 {
                    a
                } else if a == 0x8000_0000 && b == 0xFFFF_FFFF {
                    0
                } else {
                    ((a as i32).wrapping_rem(b as i32)) as u32
                }
            }
            MulDivOp::Remu => {
                if b == 0 {
                    a
                } else {
                    a % b
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_overflow_wraps() {
        let (zero, result) = Alu::update(AluOp::Add, 0x7FFF_FFFF, 0x0000_0001);
        assert_eq!(result, 0x8000_0000);
        assert!(!zero);
    }

    #[test]
    fn sra_replicates_sign_bit() {
        let (_, result) = Alu::update(AluOp::Sra, 0x8000_0001, 1);
        assert_eq!(result, 0xC000_0000);
    }

    #[test]
    fn zero_flag_iff_result_zero() {
        for (op, a, b) in [
            (AluOp::Add, 5u32, 0xFFFF_FFFBu32),
            (AluOp::Xor, 0x1234, 0x1234),
            (AluOp::Sub, 10, 10),
            (AluOp::Add, 1, 1),
        ] {
            let (zero, result) = Alu::update(op, a, b);
            assert_eq!(zero, result == 0);
        }
    }

    #[test]
    fn sub_matches_twos_complement_add() {
        for (a, b) in [(10u32, 3u32), (0, 1), (0xFFFF_FFFF, 0xFFFF_FFFF)] {
            let (_, direct) = Alu::update(AluOp::Sub, a, b);
            let (_, via_add) = Alu::update(AluOp::Add, a, (!b).wrapping_add(1));
            assert_eq!(direct, via_add);
        }
    }

    #[test]
    fn shift_amount_is_low_five_bits_only() {
        let (_, a) = Alu::update(AluOp::Sll, 1, 1);
        let (_, b) = Alu::update(AluOp::Sll, 1, 1 + 32);
        assert_eq!(a, b);
    }

    #[test]
    fn slt_is_signed_sltu_is_unsigned() {
        let (_, slt) = Alu::update(AluOp::Slt, 0xFFFF_FFFF, 1); // -1 < 1
        assert_eq!(slt, 1);
        let (_, sltu) = Alu::update(AluOp::Sltu, 0xFFFF_FFFF, 1); // huge < 1 is false
        assert_eq!(sltu, 0);
    }

    #[test]
    fn unsupported_tag_errors() {
        assert_eq!(
            Alu::update_tagged(0xFF, 1, 1),
            Err(ExecError::UnsupportedAluOp(0xFF))
        );
    }

    #[test]
    fn div_by_zero_is_all_ones() {
        assert_eq!(MulDiv::update(MulDivOp::Div, 10, 0), 0xFFFF_FFFF);
        assert_eq!(MulDiv::update(MulDivOp::Divu, 10, 0), 0xFFFF_FFFF);
    }

    #[test]
    fn rem_by_zero_returns_dividend() {
        assert_eq!(MulDiv::update(MulDivOp::Rem, 10, 0), 10);
    }

    #[test]
    fn mulhu_takes_high_bits_of_unsigned_product() {
        assert_eq!(MulDiv::update(MulDivOp::Mulhu, 0xFFFF_FFFF, 0xFFFF_FFFF), 0xFFFF_FFFE);
    }
}
