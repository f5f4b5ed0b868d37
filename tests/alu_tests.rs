//! Integration tests for the integer ALU and M-extension multiply/divide unit.

use riscv_sim::core::alu::{Alu, AluOp, MulDiv, MulDivOp};

/// ALU ADD overflow (spec.md §8 scenario 1).
#[test]
fn add_overflow_wraps_to_min_negative() {
    let (zero, result) = Alu::update(AluOp::Add, 0x7FFF_FFFF, 0x0000_0001);
    assert_eq!(result, 0x8000_0000);
    assert!(!zero);
}

/// ALU SRA (spec.md §8 scenario 2).
#[test]
fn sra_sign_extends_through_the_shift() {
    let (_, result) = Alu::update(AluOp::Sra, 0x8000_0001, 0x0000_0001);
    assert_eq!(result, 0xC000_0000);
}

#[test]
fn sub_matches_twos_complement_addition_for_every_operand_pair() {
    for (a, b) in [(10u32, 3u32), (0, 0), (0xFFFF_FFFF, 1), (0x8000_0000, 0x8000_0000)] {
        let (_, direct) = Alu::update(AluOp::Sub, a, b);
        let (_, via_add) = Alu::update(AluOp::Add, a, (!b).wrapping_add(1));
        assert_eq!(direct, via_add);
    }
}

#[test]
fn shifts_only_consult_the_low_five_bits_of_the_shift_amount() {
    let (_, sll_small) = Alu::update(AluOp::Sll, 1, 3);
    let (_, sll_wrapped) = Alu::update(AluOp::Sll, 1, 3 + 32);
    assert_eq!(sll_small, sll_wrapped);
}

#[test]
fn mul_extension_div_by_zero_returns_all_ones() {
    assert_eq!(MulDiv::update(MulDivOp::Div, 5, 0), 0xFFFF_FFFF);
    assert_eq!(MulDiv::update(MulDivOp::Divu, 5, 0), 0xFFFF_FFFF);
}

#[test]
fn mul_extension_signed_overflow_returns_the_dividend() {
    assert_eq!(MulDiv::update(MulDivOp::Div, 0x8000_0000, 0xFFFF_FFFF), 0x8000_0000);
}
