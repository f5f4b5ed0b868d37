//! Integration tests for the IEEE-754 binary32 add/sub/mul unit.

use riscv_sim::core::fpu::{Fpu, FpFlags};

const QNAN: u32 = 0x7FC0_0000;

/// FPU ADD exact result (spec.md §8 scenario 4).
#[test]
fn add_combines_two_exact_values() {
    let (result, flags) = Fpu::add(0x3FC0_0000, 0x4010_0000); // 1.5 + 2.25
    assert_eq!(result, 0x4070_0000); // 3.75
    assert_eq!(flags, FpFlags::default());
}

/// FPU ADD ties-to-even (spec.md §8 scenario 5).
#[test]
fn add_rounds_ties_to_even() {
    let (result, flags) = Fpu::add(0x3DCC_CCCD, 0x3E4C_CCCD); // 0.1 + 0.2
    assert_eq!(result, 0x3E99_999A);
    assert!(flags.inexact);
}

/// FPU MUL overflow to infinity (spec.md §8 scenario 6).
#[test]
fn mul_of_large_values_overflows_to_infinity() {
    let (result, flags) = Fpu::mul(0x7F7F_FFFF, 0x4000_0000); // max_normal * 2.0
    assert_eq!(result, 0x7F80_0000);
    assert!(flags.overflow);
    assert!(flags.inexact);
}

/// FPU 0 * infinity (spec.md §8 scenario 7).
#[test]
fn zero_times_infinity_is_invalid() {
    let (result, flags) = Fpu::mul(0x0000_0000, 0x7F80_0000);
    assert_eq!(result, QNAN);
    assert!(flags.invalid);
}

#[test]
fn nan_propagation_prefers_quiet_over_signaling_without_raising_invalid() {
    let quiet_nan = 0x7FC0_1234;
    let (result, flags) = Fpu::mul(quiet_nan, 0x3F80_0000);
    assert_eq!(result, QNAN);
    assert!(!flags.invalid);
}

#[test]
fn signed_zero_addition_prefers_positive_zero_on_a_tie() {
    let (result, flags) = Fpu::add(0x8000_0000, 0x0000_0000);
    assert_eq!(result, 0x0000_0000);
    assert_eq!(flags, FpFlags::default());
}

#[test]
fn add_is_commutative_for_ordinary_operands() {
    let values = [0x4000_0000u32, 0xBF00_0000, 0x3F80_0000, 0xC1200000];
    for &a in &values {
        for &b in &values {
            let (r1, _) = Fpu::add(a, b);
            let (r2, _) = Fpu::add(b, a);
            assert_eq!(r1, r2, "add({a:#010x}, {b:#010x}) not commutative");
        }
    }
}

#[test]
fn subnormal_addition_stays_subnormal_when_the_sum_is_small() {
    let smallest_subnormal = 0x0000_0001;
    let (result, flags) = Fpu::add(smallest_subnormal, smallest_subnormal);
    assert_eq!(result, 0x0000_0002);
    assert!(!flags.invalid);
}
