// ============================================================================
// Arbitrary-Precision Decimal
// Sign-magnitude decimal with dynamic scale and policy-driven rounding
// ============================================================================

use super::errors::{TowerError, TowerResult};
use super::policy::RoundingRule;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Significant digits used when an unlimited policy meets a quotient (or
/// root) that has no finite decimal expansion.
pub const UNLIMITED_DIVISION_DIGITS: u32 = 34;

/// Largest |scale| a parsed literal may carry. Beyond this, rendering or
/// rescaling the value means materialising a power of ten with an
/// unbounded number of digits.
pub const MAX_LITERAL_SCALE: i64 = 100_000;

/// Arbitrary-precision decimal number.
///
/// Internally stores `unscaled × 10^-scale`. A negative scale means trailing
/// zeros to the left of the decimal point.
///
/// # Example
/// ```
/// use numeric_tower::numeric::{BigDecimal, RoundingRule};
///
/// let x: BigDecimal = "2.5".parse().unwrap();
/// let y: BigDecimal = "4".parse().unwrap();
/// assert_eq!((&x * &y).to_string(), "10.0");
///
/// let (third, inexact) = BigDecimal::one()
///     .checked_div(&"3".parse().unwrap(), 5, RoundingRule::HalfEven)
///     .unwrap();
/// assert_eq!(third.to_string(), "0.33333");
/// assert!(inexact);
/// ```
#[derive(Clone)]
pub struct BigDecimal {
    unscaled: BigInt,
    scale: i64,
}

// ============================================================================
// Digit Helpers
// ============================================================================

/// 10^n as a big integer
pub(crate) fn pow10(n: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u8), n as usize)
}

/// Number of decimal digits in |x| (zero has one digit)
pub(crate) fn digit_count(x: &BigInt) -> u64 {
    if x.is_zero() {
        1
    } else {
        x.magnitude().to_str_radix(10).len() as u64
    }
}

/// Apply a rounding rule to a truncated quotient `q` with remainder `r`.
fn round_quotient(
    q: BigInt,
    r: &BigInt,
    divisor: &BigInt,
    negative: bool,
    rule: RoundingRule,
) -> BigInt {
    if r.is_zero() {
        return q;
    }

    let half = (r.abs() * BigInt::from(2u8)).cmp(&divisor.abs());
    let increment = match rule {
        RoundingRule::Up => true,
        RoundingRule::Down => false,
        RoundingRule::Ceiling => !negative,
        RoundingRule::Floor => negative,
        RoundingRule::HalfUp => half != Ordering::Less,
        RoundingRule::HalfDown => half == Ordering::Greater,
        RoundingRule::HalfEven => {
            half == Ordering::Greater || (half == Ordering::Equal && q.is_odd())
        },
    };

    match (increment, negative) {
        (false, _) => q,
        (true, false) => q + BigInt::one(),
        (true, true) => q - BigInt::one(),
    }
}

impl BigDecimal {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from unscaled value and scale: `unscaled × 10^-scale`
    #[inline]
    pub fn new(unscaled: BigInt, scale: i64) -> Self {
        Self { unscaled, scale }
    }

    pub fn zero() -> Self {
        Self::new(BigInt::zero(), 0)
    }

    pub fn one() -> Self {
        Self::new(BigInt::one(), 0)
    }

    pub fn from_i64(value: i64) -> Self {
        Self::new(BigInt::from(value), 0)
    }

    pub fn from_bigint(value: BigInt) -> Self {
        Self::new(value, 0)
    }

    /// Convert a finite `f64` through its shortest decimal representation.
    ///
    /// Only used to seed iterative methods; returns `None` for NaN or
    /// infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        format!("{:e}", value).parse().ok()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    #[inline]
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Number of significant digits held in the unscaled value
    #[inline]
    pub fn precision(&self) -> u64 {
        digit_count(&self.unscaled)
    }

    /// Exponent of the leading digit: `x = d.ddd × 10^adjusted_exponent`
    #[inline]
    pub fn adjusted_exponent(&self) -> i64 {
        self.precision() as i64 - 1 - self.scale
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.unscaled.is_positive()
    }

    /// True when the value has no fractional part
    pub fn is_integer(&self) -> bool {
        self.scale <= 0 || (&self.unscaled % pow10(self.scale as u64)).is_zero()
    }

    /// Exact integer value, if the decimal is integral
    pub fn to_bigint(&self) -> Option<BigInt> {
        if self.scale <= 0 {
            Some(&self.unscaled * pow10(self.scale.unsigned_abs()))
        } else {
            let divisor = pow10(self.scale as u64);
            let (q, r) = self.unscaled.div_rem(&divisor);
            if r.is_zero() {
                Some(q)
            } else {
                None
            }
        }
    }

    /// Integer part, truncated toward zero
    pub fn trunc(&self) -> BigInt {
        let (truncated, _) = self.round_to_scale(0, RoundingRule::Down);
        truncated
            .to_bigint()
            .unwrap_or_else(|| truncated.unscaled.clone())
    }

    /// Lossy conversion, intended for seeding iterations and display only
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.unscaled, -self.scale)
            .parse()
            .unwrap_or(f64::NAN)
    }

    // ========================================================================
    // Exact Arithmetic
    // ========================================================================

    /// Bring both operands to the larger scale
    fn aligned(&self, other: &Self) -> (BigInt, BigInt, i64) {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => (self.unscaled.clone(), other.unscaled.clone(), self.scale),
            Ordering::Greater => {
                let shift = pow10((self.scale - other.scale) as u64);
                (self.unscaled.clone(), &other.unscaled * shift, self.scale)
            },
            Ordering::Less => {
                let shift = pow10((other.scale - self.scale) as u64);
                (&self.unscaled * shift, other.unscaled.clone(), other.scale)
            },
        }
    }

    pub fn abs(&self) -> Self {
        Self::new(self.unscaled.abs(), self.scale)
    }

    /// Multiply by 10^k without touching the digits
    pub fn mul_pow10(&self, k: i64) -> Self {
        Self::new(self.unscaled.clone(), self.scale - k)
    }

    /// Exact division by 2^k (1/2^k = 5^k / 10^k)
    pub fn div_pow2(&self, k: u32) -> Self {
        let five_k = num_traits::pow(BigInt::from(5u8), k as usize);
        Self::new(&self.unscaled * five_k, self.scale + k as i64)
    }

    /// Exact integer power
    pub fn pow_exact(&self, n: u32) -> Self {
        Self::new(
            num_traits::pow(self.unscaled.clone(), n as usize),
            self.scale * n as i64,
        )
    }

    /// Strip trailing zeros from the unscaled value
    pub fn normalized(&self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let ten = BigInt::from(10u8);
        let mut unscaled = self.unscaled.clone();
        let mut scale = self.scale;
        loop {
            let (q, r) = unscaled.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            unscaled = q;
            scale -= 1;
        }
        Self::new(unscaled, scale)
    }

    // ========================================================================
    // Rounding
    // ========================================================================

    /// Drop `drop` low-order digits under a rounding rule
    fn drop_digits(&self, drop: u64, rule: RoundingRule) -> (BigInt, bool) {
        let divisor = pow10(drop);
        let (q, r) = self.unscaled.div_rem(&divisor);
        let inexact = !r.is_zero();
        let q = round_quotient(q, &r, &divisor, self.unscaled.is_negative(), rule);
        (q, inexact)
    }

    /// Round to at most `digits` significant digits (0 = leave untouched).
    ///
    /// Returns the rounded value and whether any non-zero digit was discarded.
    pub fn round_to_precision(&self, digits: u32, rule: RoundingRule) -> (Self, bool) {
        if digits == 0 {
            return (self.clone(), false);
        }
        let precision = self.precision();
        if precision <= digits as u64 {
            return (self.clone(), false);
        }

        let drop = precision - digits as u64;
        let (mut q, inexact) = self.drop_digits(drop, rule);
        let mut scale = self.scale - drop as i64;

        // Carry out of the top digit (e.g. 999 -> 1000)
        if digit_count(&q) > digits as u64 {
            q /= BigInt::from(10u8);
            scale -= 1;
        }

        (Self::new(q, scale), inexact)
    }

    /// Round to a fixed number of fractional digits
    pub fn round_to_scale(&self, scale: i64, rule: RoundingRule) -> (Self, bool) {
        if scale >= self.scale {
            let shift = pow10((scale - self.scale) as u64);
            return (Self::new(&self.unscaled * shift, scale), false);
        }
        let (q, inexact) = self.drop_digits((self.scale - scale) as u64, rule);
        (Self::new(q, scale), inexact)
    }

    // ========================================================================
    // Division and Roots
    // ========================================================================

    /// Divide, rounding to `digits` significant digits.
    ///
    /// With `digits == 0` the quotient is exact when it terminates and is
    /// otherwise rounded half-even to [`UNLIMITED_DIVISION_DIGITS`].
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    pub fn checked_div(
        &self,
        rhs: &Self,
        digits: u32,
        rule: RoundingRule,
    ) -> TowerResult<(Self, bool)> {
        if rhs.is_zero() {
            return Err(TowerError::DivisionByZero);
        }
        Ok(self.div_by_nonzero(rhs, digits, rule))
    }

    /// Quotient for a divisor already known to be non-zero, such as the
    /// denominator of a reduced fraction. Same rounding as `checked_div`.
    pub(crate) fn div_by_nonzero(&self, rhs: &Self, digits: u32, rule: RoundingRule) -> (Self, bool) {
        debug_assert!(!rhs.is_zero());
        if self.is_zero() {
            return (Self::zero(), false);
        }
        if digits == 0 {
            return match self.terminating_div(rhs) {
                Some(q) => (q, false),
                None => self.div_by_nonzero(rhs, UNLIMITED_DIVISION_DIGITS, RoundingRule::HalfEven),
            };
        }

        // Enough leading digits that the quotient has at least digits + 1
        let lhs_digits = self.precision() as i64;
        let rhs_digits = rhs.precision() as i64;
        let extra = (digits as i64 + rhs_digits - lhs_digits + 2).max(0) as u64;

        let numerator = &self.unscaled * pow10(extra);
        let (q, r) = numerator.div_rem(&rhs.unscaled);
        let mut scale = self.scale - rhs.scale + extra as i64;

        // Sticky digit keeps half-way decisions honest
        let (q, sticky) = if r.is_zero() {
            (q, false)
        } else {
            scale += 1;
            let tail = if q.is_negative() {
                -BigInt::one()
            } else {
                BigInt::one()
            };
            (q * BigInt::from(10u8) + tail, true)
        };

        let (rounded, inexact) = Self::new(q, scale).round_to_precision(digits, rule);
        (rounded, inexact || sticky)
    }

    /// Exact quotient if it has a finite decimal expansion
    fn terminating_div(&self, rhs: &Self) -> Option<Self> {
        let g = self.unscaled.gcd(&rhs.unscaled);
        let numerator = &self.unscaled / &g;
        let denominator = &rhs.unscaled / &g;

        let two = BigInt::from(2u8);
        let five = BigInt::from(5u8);
        let mut rest = denominator.abs();
        let mut twos = 0u64;
        let mut fives = 0u64;
        while (&rest % &two).is_zero() {
            rest /= &two;
            twos += 1;
        }
        while (&rest % &five).is_zero() {
            rest /= &five;
            fives += 1;
        }
        if !rest.is_one() {
            return None;
        }

        let k = twos.max(fives);
        let factor = pow10(k) / denominator.abs();
        let mut q = numerator * factor;
        if denominator.is_negative() {
            q = -q;
        }
        Some(Self::new(q, self.scale - rhs.scale + k as i64))
    }

    /// Square root rounded to `digits` significant digits.
    ///
    /// # Errors
    /// Returns a `Domain` error for negative arguments.
    pub fn sqrt(&self, digits: u32, rule: RoundingRule) -> TowerResult<(Self, bool)> {
        if self.is_negative() {
            return Err(TowerError::Domain {
                operation: "sqrt",
                reason: "negative argument",
            });
        }
        if self.is_zero() {
            return Ok((Self::zero(), false));
        }
        if digits == 0 {
            return match self.nth_root_exact(2) {
                Some(root) => Ok((root, false)),
                None => self.sqrt(UNLIMITED_DIVISION_DIGITS, RoundingRule::HalfEven),
            };
        }

        let mut unscaled = self.unscaled.clone();
        let mut scale = self.scale;
        if scale.rem_euclid(2) == 1 {
            unscaled *= BigInt::from(10u8);
            scale += 1;
        }

        let wanted = 2 * (digits as u64 + 2);
        let have = digit_count(&unscaled);
        let mut shift = wanted.saturating_sub(have);
        if shift % 2 == 1 {
            shift += 1;
        }
        unscaled *= pow10(shift);
        scale += shift as i64;

        let root = unscaled.sqrt();
        let exact = &root * &root == unscaled;
        let mut root_scale = scale / 2;
        let (root, sticky) = if exact {
            (root, false)
        } else {
            root_scale += 1;
            (root * BigInt::from(10u8) + BigInt::one(), true)
        };

        let (rounded, inexact) = Self::new(root, root_scale).round_to_precision(digits, rule);
        Ok((rounded, inexact || sticky))
    }

    /// Exact n-th root if the value is a perfect n-th power of a decimal.
    pub fn nth_root_exact(&self, n: u32) -> Option<Self> {
        if n == 0 {
            return None;
        }
        if self.is_zero() {
            return Some(Self::zero());
        }
        let negative = self.is_negative();
        if negative && n % 2 == 0 {
            return None;
        }

        let normalized = self.normalized();
        let mut magnitude = normalized.unscaled.abs();
        let mut scale = normalized.scale;
        let rem = scale.rem_euclid(n as i64);
        if rem != 0 {
            let pad = n as i64 - rem;
            magnitude *= pow10(pad as u64);
            scale += pad;
        }

        let root = magnitude.nth_root(n);
        if num_traits::pow(root.clone(), n as usize) != magnitude {
            return None;
        }
        let root = if negative { -root } else { root };
        Some(Self::new(root, scale / n as i64))
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for BigDecimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigDecimal {}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.unscaled.sign(), other.unscaled.sign()) {
            (a, b) if a != b => a.cmp(&b),
            _ => {
                let (lhs, rhs, _) = self.aligned(other);
                lhs.cmp(&rhs)
            },
        }
    }
}

impl Neg for BigDecimal {
    type Output = BigDecimal;

    fn neg(self) -> Self::Output {
        BigDecimal::new(-self.unscaled, self.scale)
    }
}

impl Neg for &BigDecimal {
    type Output = BigDecimal;

    fn neg(self) -> Self::Output {
        BigDecimal::new(-&self.unscaled, self.scale)
    }
}

impl Add for &BigDecimal {
    type Output = BigDecimal;

    fn add(self, rhs: Self) -> Self::Output {
        let (lhs, rhs, scale) = self.aligned(rhs);
        BigDecimal::new(lhs + rhs, scale)
    }
}

impl Sub for &BigDecimal {
    type Output = BigDecimal;

    fn sub(self, rhs: Self) -> Self::Output {
        let (lhs, rhs, scale) = self.aligned(rhs);
        BigDecimal::new(lhs - rhs, scale)
    }
}

impl Mul for &BigDecimal {
    type Output = BigDecimal;

    fn mul(self, rhs: Self) -> Self::Output {
        BigDecimal::new(&self.unscaled * &rhs.unscaled, self.scale + rhs.scale)
    }
}

impl From<i64> for BigDecimal {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<BigInt> for BigDecimal {
    fn from(value: BigInt) -> Self {
        Self::from_bigint(value)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Debug for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BigDecimal({}, unscaled={}, scale={})",
            self, self.unscaled, self.scale
        )
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale <= 0 {
            let integral = &self.unscaled * pow10(self.scale.unsigned_abs());
            return write!(f, "{}", integral);
        }

        let digits = self.unscaled.magnitude().to_str_radix(10);
        let scale = self.scale as usize;
        let sign = if self.is_negative() { "-" } else { "" };

        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        } else {
            let padding = "0".repeat(scale - digits.len());
            write!(f, "{}0.{}{}", sign, padding, digits)
        }
    }
}

// ============================================================================
// Conversion from rust_decimal (for API boundaries)
// ============================================================================

impl BigDecimal {
    /// Convert from rust_decimal::Decimal (always exact).
    pub fn from_decimal(d: rust_decimal::Decimal) -> Self {
        Self::new(BigInt::from(d.mantissa()), d.scale() as i64)
    }

    /// Convert to rust_decimal::Decimal, rounding half-even to 28 digits.
    ///
    /// # Errors
    /// Returns `Overflow` if the magnitude is beyond rust_decimal's range.
    pub fn to_decimal(&self) -> TowerResult<rust_decimal::Decimal> {
        const MAX_SCALE: i64 = 28;

        let (mut rounded, _) = self.round_to_precision(28, RoundingRule::HalfEven);
        if rounded.scale < 0 {
            rounded = rounded.round_to_scale(0, RoundingRule::HalfEven).0;
        } else if rounded.scale > MAX_SCALE {
            rounded = rounded.round_to_scale(MAX_SCALE, RoundingRule::HalfEven).0;
        }

        let mantissa = rounded.unscaled.to_i128().ok_or(TowerError::Overflow)?;
        rust_decimal::Decimal::try_from_i128_with_scale(mantissa, rounded.scale as u32)
            .map_err(|_| TowerError::Overflow)
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl std::str::FromStr for BigDecimal {
    type Err = TowerError;

    /// Parse a decimal literal.
    ///
    /// # Examples
    /// - "123" -> 123
    /// - "-0.001" -> -0.001
    /// - "1.5e3" -> 1500
    ///
    /// Literals whose scale would exceed `MAX_LITERAL_SCALE` in either
    /// direction are rejected with `Overflow`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TowerError::InvalidInput);
        }

        let (negative, body) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (false, rest)
        } else {
            (false, s)
        };

        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(pos) => {
                let exponent: i64 = body[pos + 1..]
                    .parse()
                    .map_err(|_| TowerError::InvalidInput)?;
                (&body[..pos], exponent)
            },
            None => (body, 0),
        };

        let (int_str, frac_str) = match mantissa.find('.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, ""),
        };

        if int_str.is_empty() && frac_str.is_empty() {
            return Err(TowerError::InvalidInput);
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_str) || !all_digits(frac_str) {
            return Err(TowerError::InvalidInput);
        }

        let digits = format!("{}{}", int_str, frac_str);
        let mut unscaled =
            BigInt::parse_bytes(digits.as_bytes(), 10).ok_or(TowerError::InvalidInput)?;
        if negative {
            unscaled = -unscaled;
        }

        let scale = (frac_str.len() as i64)
            .checked_sub(exponent)
            .ok_or(TowerError::Overflow)?;
        if scale.unsigned_abs() > MAX_LITERAL_SCALE as u64 {
            return Err(TowerError::Overflow);
        }

        Ok(Self::new(unscaled, scale))
    }
}

// ============================================================================
// Tests
// ============================================================================
