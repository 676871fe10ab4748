// ============================================================================
// Decimal Series
// Taylor/Machin series over BigDecimal with explicit iteration caps
// ============================================================================
//
// These are the decimal primitives the tower and the kernel build on:
// - exp: relative accuracy, argument halving then repeated squaring
// - pi: Machin's formula
// - sin / cos: absolute accuracy after reduction into [-pi, pi]
// - atan / atan2: argument halving then Taylor series
//
// Every loop is bounded by `max_iterations` and reports ConvergenceFailure
// instead of spinning.

use super::decimal::BigDecimal;
use super::errors::{TowerError, TowerResult};
use super::policy::RoundingRule;

/// Iteration cap used where no kernel configuration is in scope
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Extra digits carried internally by every series
const GUARD_DIGITS: u32 = 10;

/// Past 10^15 in magnitude exp() overflows, or underflows to zero for
/// negative arguments; the exact result would not fit in memory
const EXP_ARGUMENT_LIMIT_EXPONENT: i64 = 15;

#[inline]
fn check_iterations(operation: &'static str, iterations: usize, max: usize) -> TowerResult<()> {
    if iterations >= max {
        Err(TowerError::ConvergenceFailure {
            operation,
            iterations,
        })
    } else {
        Ok(())
    }
}

/// Divide and round to an absolute scale (number of fractional digits)
pub(crate) fn div_to_scale(
    lhs: &BigDecimal,
    rhs: &BigDecimal,
    scale: i64,
) -> TowerResult<BigDecimal> {
    if rhs.is_zero() {
        return Err(TowerError::DivisionByZero);
    }
    if lhs.is_zero() {
        return Ok(BigDecimal::zero());
    }
    let significant = lhs.adjusted_exponent() - rhs.adjusted_exponent() + scale + 3;
    if significant <= 0 {
        return Ok(BigDecimal::zero());
    }
    let significant = u32::try_from(significant).map_err(|_| TowerError::Overflow)?;
    let (q, _) = lhs.checked_div(rhs, significant, RoundingRule::HalfEven)?;
    Ok(q.round_to_scale(scale, RoundingRule::HalfEven).0)
}

#[inline]
fn mul_to_scale(lhs: &BigDecimal, rhs: &BigDecimal, scale: i64) -> BigDecimal {
    (lhs * rhs).round_to_scale(scale, RoundingRule::HalfEven).0
}

// ============================================================================
// Exponential
// ============================================================================

/// e^x rounded half-even to `digits` significant digits.
///
/// # Errors
/// - `Overflow` for positive arguments beyond 10^15; negative ones that
///   large underflow to zero instead
/// - `ConvergenceFailure` if the Taylor series exceeds `max_iterations`
pub fn exp(x: &BigDecimal, digits: u32, max_iterations: usize) -> TowerResult<BigDecimal> {
    if x.is_zero() {
        return Ok(BigDecimal::one());
    }
    if x.adjusted_exponent() > EXP_ARGUMENT_LIMIT_EXPONENT {
        return if x.is_negative() {
            Ok(BigDecimal::zero())
        } else {
            Err(TowerError::Overflow)
        };
    }
    if x.is_negative() {
        let positive = exp(&-x, digits + 2, max_iterations)?;
        let (inverse, _) =
            BigDecimal::one().checked_div(&positive, digits, RoundingRule::HalfEven)?;
        return Ok(inverse);
    }

    // Halve until r < 1/2, then square k times
    let half = BigDecimal::new(5.into(), 1);
    let mut reduced = x.clone();
    let mut halvings = 0u32;
    while reduced >= half {
        reduced = reduced.div_pow2(1);
        halvings += 1;
    }

    let working = digits + GUARD_DIGITS + (halvings as f64 * std::f64::consts::LOG10_2).ceil() as u32;
    let scale = working as i64 + 1;
    let reduced = reduced.round_to_scale(scale, RoundingRule::HalfEven).0;

    let mut sum = BigDecimal::one();
    let mut term = BigDecimal::one();
    let mut n = 1i64;
    loop {
        check_iterations("exp", n as usize, max_iterations)?;
        term = div_to_scale(&(&term * &reduced), &BigDecimal::from_i64(n), scale)?;
        if term.is_zero() {
            break;
        }
        sum = &sum + &term;
        n += 1;
    }

    for _ in 0..halvings {
        sum = (&sum * &sum)
            .round_to_precision(working, RoundingRule::HalfEven)
            .0;
    }

    Ok(sum.round_to_precision(digits, RoundingRule::HalfEven).0)
}

// ============================================================================
// Pi
// ============================================================================

/// atan(1/k) to an absolute scale
fn atan_inverse(k: i64, scale: i64, max_iterations: usize) -> TowerResult<BigDecimal> {
    let k_squared = BigDecimal::from_i64(k * k);
    let mut power = div_to_scale(&BigDecimal::one(), &BigDecimal::from_i64(k), scale)?;
    let mut sum = power.clone();
    let mut n = 1i64;
    loop {
        check_iterations("pi", n as usize, max_iterations)?;
        power = div_to_scale(&power, &k_squared, scale)?;
        if power.is_zero() {
            break;
        }
        let term = div_to_scale(&power, &BigDecimal::from_i64(2 * n + 1), scale)?;
        sum = if n % 2 == 1 { &sum - &term } else { &sum + &term };
        n += 1;
    }
    Ok(sum)
}

/// pi rounded half-even to `digits` significant digits (Machin's formula).
pub fn pi(digits: u32, max_iterations: usize) -> TowerResult<BigDecimal> {
    let scale = (digits + GUARD_DIGITS) as i64;
    let a = atan_inverse(5, scale, max_iterations)?;
    let b = atan_inverse(239, scale, max_iterations)?;
    let value = &(&BigDecimal::from_i64(16) * &a) - &(&BigDecimal::from_i64(4) * &b);
    Ok(value.round_to_precision(digits, RoundingRule::HalfEven).0)
}

// ============================================================================
// Sine and Cosine
// ============================================================================

/// Reduce `x` into [-pi, pi] at an absolute scale
fn reduce_angle(x: &BigDecimal, scale: i64, max_iterations: usize) -> TowerResult<BigDecimal> {
    let magnitude = x.adjusted_exponent().max(0);
    let pi_digits = u32::try_from(scale + magnitude + 2).map_err(|_| TowerError::Overflow)?;
    let two_pi = &BigDecimal::from_i64(2) * &pi(pi_digits, max_iterations)?;
    let turns = div_to_scale(x, &two_pi, 0)?;
    if turns.is_zero() {
        return Ok(x.round_to_scale(scale, RoundingRule::HalfEven).0);
    }
    Ok((x - &(&turns * &two_pi))
        .round_to_scale(scale, RoundingRule::HalfEven)
        .0)
}

/// Shared Taylor loop: term_{n} = -term_{n-1} * r^2 / ((2n + offset - 1)(2n + offset))
fn trig_series(
    reduced: &BigDecimal,
    first: BigDecimal,
    offset: i64,
    scale: i64,
    operation: &'static str,
    max_iterations: usize,
) -> TowerResult<BigDecimal> {
    let square = mul_to_scale(reduced, reduced, scale);
    let mut term = first.clone();
    let mut sum = first;
    let mut n = 1i64;
    loop {
        check_iterations(operation, n as usize, max_iterations)?;
        let denominator = BigDecimal::from_i64((2 * n + offset - 1) * (2 * n + offset));
        term = -div_to_scale(&(&term * &square), &denominator, scale)?;
        if term.is_zero() {
            break;
        }
        sum = &sum + &term;
        n += 1;
    }
    Ok(sum)
}

/// Round to `digits` fractional digits, then to `digits` significant digits
fn finish_absolute(value: BigDecimal, digits: u32) -> BigDecimal {
    value
        .round_to_scale(digits as i64, RoundingRule::HalfEven)
        .0
        .round_to_precision(digits, RoundingRule::HalfEven)
        .0
}

/// sin(x), accurate to `digits` fractional digits.
pub fn sin(x: &BigDecimal, digits: u32, max_iterations: usize) -> TowerResult<BigDecimal> {
    if x.is_zero() {
        return Ok(BigDecimal::zero());
    }
    let scale = (digits + GUARD_DIGITS) as i64;
    let reduced = reduce_angle(x, scale, max_iterations)?;
    let value = trig_series(&reduced, reduced.clone(), 1, scale, "sin", max_iterations)?;
    Ok(finish_absolute(value, digits))
}

/// cos(x), accurate to `digits` fractional digits.
pub fn cos(x: &BigDecimal, digits: u32, max_iterations: usize) -> TowerResult<BigDecimal> {
    if x.is_zero() {
        return Ok(BigDecimal::one());
    }
    let scale = (digits + GUARD_DIGITS) as i64;
    let reduced = reduce_angle(x, scale, max_iterations)?;
    let value = trig_series(&reduced, BigDecimal::one(), 0, scale, "cos", max_iterations)?;
    Ok(finish_absolute(value, digits))
}

// ============================================================================
// Arctangent
// ============================================================================

/// atan(x), accurate to `digits` fractional digits.
pub fn atan(x: &BigDecimal, digits: u32, max_iterations: usize) -> TowerResult<BigDecimal> {
    if x.is_zero() {
        return Ok(BigDecimal::zero());
    }
    if x.is_negative() {
        return Ok(-atan(&-x, digits, max_iterations)?);
    }

    let working = digits + GUARD_DIGITS;
    let one = BigDecimal::one();

    if *x > one {
        // atan(x) = pi/2 - atan(1/x)
        let (inverse, _) = one.checked_div(x, working, RoundingRule::HalfEven)?;
        let half_pi = pi(working, max_iterations)?.div_pow2(1);
        let value = &half_pi - &atan(&inverse, working, max_iterations)?;
        return Ok(finish_absolute(value, digits));
    }

    // atan(x) = 2 atan(x / (1 + sqrt(1 + x^2))) until x < 0.1
    let limit = BigDecimal::new(1.into(), 1);
    let mut reduced = x.clone();
    let mut doublings = 0u32;
    while reduced >= limit {
        check_iterations("atan", doublings as usize, max_iterations)?;
        let (root, _) = (&one + &(&reduced * &reduced)).sqrt(working, RoundingRule::HalfEven)?;
        reduced = reduced
            .checked_div(&(&one + &root), working, RoundingRule::HalfEven)?
            .0;
        doublings += 1;
    }

    let scale = working as i64 + doublings as i64;
    let square = mul_to_scale(&reduced, &reduced, scale);
    let mut power = reduced.round_to_scale(scale, RoundingRule::HalfEven).0;
    let mut sum = power.clone();
    let mut n = 1i64;
    loop {
        check_iterations("atan", n as usize, max_iterations)?;
        power = mul_to_scale(&power, &square, scale);
        if power.is_zero() {
            break;
        }
        let term = div_to_scale(&power, &BigDecimal::from_i64(2 * n + 1), scale)?;
        if term.is_zero() {
            break;
        }
        sum = if n % 2 == 1 { &sum - &term } else { &sum + &term };
        n += 1;
    }

    let scaled = &sum * &BigDecimal::from_bigint(num_traits::pow(2.into(), doublings as usize));
    Ok(finish_absolute(scaled, digits))
}

/// Angle of the point (x, y), in (-pi, pi]. The origin maps to zero.
pub fn atan2(
    y: &BigDecimal,
    x: &BigDecimal,
    digits: u32,
    max_iterations: usize,
) -> TowerResult<BigDecimal> {
    let working = digits + GUARD_DIGITS;
    if x.is_zero() {
        if y.is_zero() {
            return Ok(BigDecimal::zero());
        }
        let half_pi = pi(working, max_iterations)?.div_pow2(1);
        let value = if y.is_negative() { -half_pi } else { half_pi };
        return Ok(finish_absolute(value, digits));
    }

    let (ratio, _) = y.checked_div(x, working, RoundingRule::HalfEven)?;
    let base = atan(&ratio, working, max_iterations)?;
    let value = if x.is_positive() {
        base
    } else if y.is_negative() {
        &base - &pi(working, max_iterations)?
    } else {
        &base + &pi(working, max_iterations)?
    };
    Ok(finish_absolute(value, digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn close(actual: &BigDecimal, expected: &str, tolerance: &str) -> bool {
        (actual - &dec(expected)).abs() <= dec(tolerance)
    }

    const PI_40: &str = "3.141592653589793238462643383279502884197";
    const E_40: &str = "2.718281828459045235360287471352662497757";

    #[test]
    fn test_pi() {
        let value = pi(40, DEFAULT_MAX_ITERATIONS).unwrap();
        assert!(close(&value, PI_40, "1e-38"), "{}", value);
        assert_eq!(value.precision(), 40);
    }

    #[test]
    fn test_exp() {
        let e = exp(&BigDecimal::one(), 40, DEFAULT_MAX_ITERATIONS).unwrap();
        assert!(close(&e, E_40, "1e-38"), "{}", e);

        let small = exp(&dec("-1"), 30, DEFAULT_MAX_ITERATIONS).unwrap();
        assert!(close(&small, "0.367879441171442321595523770161", "1e-29"), "{}", small);

        let big = exp(&dec("10"), 20, DEFAULT_MAX_ITERATIONS).unwrap();
        assert!(close(&big, "22026.465794806716517", "1e-14"), "{}", big);
    }

    #[test]
    fn test_exp_zero_and_overflow() {
        assert_eq!(
            exp(&BigDecimal::zero(), 10, DEFAULT_MAX_ITERATIONS).unwrap(),
            BigDecimal::one()
        );
        assert_eq!(
            exp(&dec("1e20"), 10, DEFAULT_MAX_ITERATIONS),
            Err(TowerError::Overflow)
        );
        assert!(exp(&dec("-1e16"), 10, DEFAULT_MAX_ITERATIONS).unwrap().is_zero());
    }

    #[test]
    fn test_sin_cos() {
        let s = sin(&dec("0.5"), 30, DEFAULT_MAX_ITERATIONS).unwrap();
        assert!(close(&s, "0.479425538604203000273287935216", "1e-29"), "{}", s);
        let c = cos(&dec("0.5"), 30, DEFAULT_MAX_ITERATIONS).unwrap();
        assert!(close(&c, "0.877582561890372716116281582604", "1e-29"), "{}", c);
    }

    #[test]
    fn test_trig_at_multiples_of_pi_is_clean() {
        let pi_value = pi(40, DEFAULT_MAX_ITERATIONS).unwrap();
        let s = sin(&pi_value, 30, DEFAULT_MAX_ITERATIONS).unwrap();
        assert!(s.is_zero(), "{}", s);
        let c = cos(&pi_value, 30, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(c, dec("-1"));

        let big_angle = &BigDecimal::from_i64(10) * &pi_value;
        let c = cos(&big_angle, 30, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(c, BigDecimal::one());
    }

    #[test]
    fn test_atan() {
        let quarter = atan(&BigDecimal::one(), 30, DEFAULT_MAX_ITERATIONS).unwrap();
        assert!(close(&quarter, "0.785398163397448309615660845820", "1e-29"), "{}", quarter);
        let large = atan(&dec("10"), 30, DEFAULT_MAX_ITERATIONS).unwrap();
        assert!(close(&large, "1.471127674303734591852875571762", "1e-29"), "{}", large);
        let positive = atan(&dec("0.05"), 30, DEFAULT_MAX_ITERATIONS).unwrap();
        let negative = atan(&dec("-0.05"), 30, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(negative, -positive.clone());
        assert!(close(&positive, "0.04995839572194276141", "1e-19"), "{}", positive);
    }

    #[test]
    fn test_atan2_quadrants() {
        let max = DEFAULT_MAX_ITERATIONS;
        let one = BigDecimal::one();
        let minus_one = dec("-1");

        let q2 = atan2(&one, &minus_one, 30, max).unwrap();
        assert!(close(&q2, "2.356194490192344928846982537460", "1e-29"), "{}", q2);
        let q3 = atan2(&minus_one, &minus_one, 30, max).unwrap();
        assert!(close(&q3, "-2.356194490192344928846982537460", "1e-29"), "{}", q3);
        let up = atan2(&one, &BigDecimal::zero(), 30, max).unwrap();
        assert!(close(&up, "1.570796326794896619231321691640", "1e-29"), "{}", up);
        assert!(atan2(&BigDecimal::zero(), &BigDecimal::zero(), 30, max)
            .unwrap()
            .is_zero());
    }

    #[test]
    fn test_iteration_cap() {
        assert_eq!(
            exp(&BigDecimal::one(), 40, 3),
            Err(TowerError::ConvergenceFailure {
                operation: "exp",
                iterations: 3
            })
        );
    }
}
