// ============================================================================
// Tower Property Tests
// Coercion, reconciliation and kernel invariants over generated inputs
// ============================================================================

use numeric_tower::prelude::*;
use num_bigint::BigInt;
use proptest::prelude::*;

fn policy(digits: u32) -> PrecisionPolicy {
    PrecisionPolicy::new(digits, RoundingRule::HalfEven)
}

/// One unit in the `digits`-th significant place of `x`
fn ulp(x: &BigDecimal, digits: u32) -> BigDecimal {
    BigDecimal::new(BigInt::from(1), i64::from(digits) - 1 - x.adjusted_exponent())
}

mod generators {
    use super::*;

    /// Positive decimal with at most eight significant digits
    pub fn arb_positive_decimal() -> impl Strategy<Value = BigDecimal> {
        (1i64..100_000_000, -6i64..12).prop_map(|(m, s)| BigDecimal::new(BigInt::from(m), s))
    }

    /// Decimal with a non-zero fractional part
    pub fn arb_fractional() -> impl Strategy<Value = String> {
        (-1_000_000i64..1_000_000, 1u32..10).prop_map(|(a, f)| format!("{}.{}", a, f))
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_integer_rational_round_trip(n in any::<i64>()) {
        let integer = Number::integer(n);
        let up = integer.coerce_to(TowerKind::Rational).unwrap();
        prop_assert_eq!(up.kind(), TowerKind::Rational);
        let down = up.coerce_to(TowerKind::Integer).unwrap();
        prop_assert_eq!(down, integer);
    }

    #[test]
    fn prop_fractional_real_never_becomes_integer(literal in generators::arb_fractional()) {
        let real = Number::parse(&literal, policy(20)).unwrap();
        prop_assert_eq!(real.kind(), TowerKind::Real);
        let is_coercion_error = matches!(
            real.coerce_to(TowerKind::Integer),
            Err(TowerError::Coercion { from: TowerKind::Real, to: TowerKind::Integer })
        );
        prop_assert!(is_coercion_error);
        prop_assert!(!real.is_coercible_to(TowerKind::Integer));
    }

    #[test]
    fn prop_reconciles_to_narrower_policy(a in -99_999i64..99_999, b in -99_999i64..99_999) {
        let narrow = Real::from_decimal(BigDecimal::new(BigInt::from(a), 2), policy(5));
        let wide = Real::from_decimal(BigDecimal::new(BigInt::from(b), 7), policy(10));
        let sum = Number::Real(narrow).add(&Number::Real(wide)).unwrap();
        prop_assert_eq!(sum.policy().digits(), 5);
        if let Some(value) = sum.as_real().and_then(Real::decimal) {
            prop_assert!(value.precision() <= 5);
        }
    }

    #[test]
    fn prop_warm_factorial_matches_cold(warm in 0i64..60, n in 0i64..80) {
        let p = PrecisionPolicy::unlimited();
        let warmed = KernelContext::with_defaults();
        warmed.factorial(&Integer::from_i64(warm, p)).unwrap();
        let cold = KernelContext::with_defaults();
        prop_assert_eq!(
            warmed.factorial(&Integer::from_i64(n, p)).unwrap(),
            cold.factorial(&Integer::from_i64(n, p)).unwrap()
        );
    }

    #[test]
    fn prop_integer_power_sign_rule(x in -1_000i64..1_000, n in -8i64..12) {
        prop_assume!(x != 0);
        let kernel = KernelContext::with_defaults();
        let p = policy(30);
        let base = Real::from_decimal(BigDecimal::new(BigInt::from(x), 1), p);
        let result = kernel.integer_power(&base, n, p).unwrap();
        let expected = if x < 0 && n.rem_euclid(2) == 1 { Sign::Negative } else { Sign::Positive };
        prop_assert_eq!(result.sign().unwrap(), expected);
    }

    #[test]
    fn prop_nth_root_inverts_power(a in generators::arb_positive_decimal(), n in 2u32..7) {
        let kernel = KernelContext::with_defaults();
        let p = policy(30);
        let root = kernel.nth_root(&Real::from_decimal(a.clone(), p), n, p).unwrap();
        let back = kernel.integer_power(&root, i64::from(n), policy(40)).unwrap();
        let error = (back.decimal().unwrap() - &a).abs();
        prop_assert!(error <= ulp(&a, 25), "{} vs {}", back, a);
    }

    #[test]
    fn prop_exp_inverts_ln(x in generators::arb_positive_decimal(), digits in 10u32..25) {
        let kernel = KernelContext::with_defaults();
        let extended = policy(digits + 2);
        let ln = kernel.ln(&Real::from_decimal(x.clone(), extended), extended).unwrap();
        let back = kernel.exp(&ln, extended).unwrap();
        let (rounded, _) = back
            .decimal()
            .unwrap()
            .round_to_precision(digits, RoundingRule::HalfEven);
        let error = (&rounded - &x).abs();
        prop_assert!(error <= ulp(&x, digits), "exp(ln({})) = {}", x, rounded);
    }
}
