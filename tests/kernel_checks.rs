// ============================================================================
// Kernel Checks
// Quickcheck laws for exact arithmetic and the kernel's exact paths
// ============================================================================

use num_bigint::BigInt;
use numeric_tower::prelude::*;
use quickcheck::quickcheck;

#[test]
fn check_mixed_addition_commutes() {
    fn prop(a: i32, b: i16) -> bool {
        let policy = PrecisionPolicy::decimal64();
        let integer = Number::integer(a);
        let real = Number::parse(&format!("{}.5", b), policy).unwrap_or_else(|_| Number::integer(0));
        let left = integer.add(&real).unwrap();
        let right = real.add(&integer).unwrap();
        left.compare(&right) == Ok(std::cmp::Ordering::Equal) && left.kind() == right.kind()
    }
    quickcheck(prop as fn(i32, i16) -> bool);
}

#[test]
fn check_integer_division_kind() {
    fn prop(a: i32, b: i32) -> bool {
        if b == 0 {
            return Number::integer(a).divide(&Number::integer(b)).is_err();
        }
        let quotient = Number::integer(a).divide(&Number::integer(b)).unwrap();
        let divisible = i64::from(a) % i64::from(b) == 0;
        let expected = if divisible {
            TowerKind::Integer
        } else {
            TowerKind::Rational
        };
        quotient.kind() == expected
    }
    quickcheck(prop as fn(i32, i32) -> bool);
}

#[test]
fn check_exact_integer_power() {
    fn prop(a: i8, n: u8) -> bool {
        let kernel = KernelContext::with_defaults();
        let exponent = u32::from(n % 20);
        let result = kernel
            .power(
                &Number::integer(a),
                &Number::integer(exponent),
                PrecisionPolicy::unlimited(),
            )
            .unwrap();
        result == Number::integer(num_traits::pow(BigInt::from(a), exponent as usize))
    }
    quickcheck(prop as fn(i8, u8) -> bool);
}

#[test]
fn check_roots_of_unity_have_unit_radius() {
    fn prop(n: u8) -> bool {
        let order = u64::from(n % 16) + 1;
        let kernel = KernelContext::with_defaults();
        let policy = PrecisionPolicy::new(15, RoundingRule::HalfEven);
        let roots = kernel.roots_of_unity(order, policy).unwrap();
        roots.len() as u64 == order
            && roots
                .iter()
                .all(|root| root.modulus().map(|r| r == Real::one(policy)).unwrap_or(false))
    }
    quickcheck(prop as fn(u8) -> bool);
}

#[test]
fn check_factorial_recurrence() {
    fn prop(n: u8) -> bool {
        let kernel = KernelContext::with_defaults();
        let policy = PrecisionPolicy::unlimited();
        let n = i64::from(n % 100) + 1;
        let current = kernel.factorial(&Integer::from_i64(n, policy)).unwrap();
        let previous = kernel.factorial(&Integer::from_i64(n - 1, policy)).unwrap();
        current.value() == &(previous.value() * BigInt::from(n))
    }
    quickcheck(prop as fn(u8) -> bool);
}
