use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Decimal

/// An arbitrary-precision decimal number.
///
/// The value keeps the JSON number text it was built from (so rendering is
/// lossless) next to a normalized `digits * 10^exponent` form used for
/// comparison and conversion. `1.50`, `1.5` and `15e-1` compare equal but
/// render as written.
///
/// # Examples
///
/// ```
/// use vc_json::Decimal;
///
/// let a: Decimal = "5.0".parse().unwrap();
/// let b = Decimal::from(5_i32);
/// assert_eq!(a, b);
/// assert!(a.is_integral());
/// assert_eq!(a.to_i128(), Some(5));
/// assert_eq!(a.as_str(), "5.0");
/// ```
#[derive(Clone)]
pub struct Decimal {
    text: Box<str>,
    parts: Parts,
}

/// Normalized form: no leading or trailing zeros in `digits`.
///
/// Zero is represented by empty `digits`, `negative == false`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct Parts {
    negative: bool,
    digits: Box<str>,
    exponent: i64,
}

/// The text is not a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a valid JSON number")]
pub struct ParseDecimalError(Box<str>);

// Beyond this many digits a value cannot fit in `u128`.
const MAX_U128_DIGITS: i128 = 39;

impl Decimal {
    /// Parses JSON number text (`-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`).
    pub fn parse(text: &str) -> Result<Self, ParseDecimalError> {
        let parts = parse_parts(text).ok_or_else(|| ParseDecimalError(text.into()))?;
        Ok(Self {
            text: text.into(),
            parts,
        })
    }

    /// Builds a decimal from a finite `f64`, using its shortest round-trip text.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Self::parse(&alloc::format!("{value:?}")).ok()
    }

    /// Builds a decimal from a finite `f32`, using its shortest round-trip text.
    pub fn from_f32(value: f32) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Self::parse(&alloc::format!("{value:?}")).ok()
    }

    fn from_integer(negative: bool, magnitude: u128) -> Self {
        let mut text = String::new();
        if negative && magnitude != 0 {
            text.push('-');
        }
        text.push_str(&magnitude.to_string());

        let raw = magnitude.to_string();
        let trimmed = raw.trim_end_matches('0');
        let parts = if magnitude == 0 {
            Parts::zero()
        } else {
            Parts {
                negative,
                digits: trimmed.into(),
                exponent: (raw.len() - trimmed.len()) as i64,
            }
        };

        Self {
            text: text.into_boxed_str(),
            parts,
        }
    }

    /// The number as written.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.parts.digits.is_empty()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.parts.negative
    }

    /// Returns `true` if the value has no fractional part.
    #[inline]
    pub fn is_integral(&self) -> bool {
        self.is_zero() || self.parts.exponent >= 0
    }

    fn magnitude(&self) -> Option<u128> {
        if !self.is_integral() {
            return None;
        }
        if self.is_zero() {
            return Some(0);
        }
        if self.adjusted() > MAX_U128_DIGITS {
            return None;
        }
        let mut acc: u128 = 0;
        for byte in self.parts.digits.bytes() {
            acc = acc.checked_mul(10)?.checked_add((byte - b'0') as u128)?;
        }
        for _ in 0..self.parts.exponent {
            acc = acc.checked_mul(10)?;
        }
        Some(acc)
    }

    /// Converts an integral value that fits `i128`.
    pub fn to_i128(&self) -> Option<i128> {
        let magnitude = self.magnitude()?;
        if self.parts.negative {
            if magnitude == i128::MIN.unsigned_abs() {
                Some(i128::MIN)
            } else {
                i128::try_from(magnitude).ok().map(|v| -v)
            }
        } else {
            i128::try_from(magnitude).ok()
        }
    }

    /// Converts a non-negative integral value that fits `u128`.
    pub fn to_u128(&self) -> Option<u128> {
        if self.parts.negative {
            return None;
        }
        self.magnitude()
    }

    /// Nearest `f64`; may be infinite for huge exponents.
    pub fn to_f64(&self) -> f64 {
        self.text.parse().unwrap_or(f64::NAN)
    }

    /// Position of the most significant digit, `digits.len() + exponent`.
    ///
    /// Computed in `i128`: the sum leaves the `i64` range for extreme exponents.
    #[inline]
    fn adjusted(&self) -> i128 {
        self.parts.digits.len() as i128 + self.parts.exponent as i128
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .adjusted()
                .cmp(&other.adjusted())
                .then_with(|| self.parts.digits.cmp(&other.parts.digits)),
        }
    }
}

impl Parts {
    #[inline]
    fn zero() -> Self {
        Self {
            negative: false,
            digits: "".into(),
            exponent: 0,
        }
    }
}

fn parse_parts(text: &str) -> Option<Parts> {
    let bytes = text.as_bytes();
    let mut i = 0;

    let negative = bytes.first() == Some(&b'-');
    if negative {
        i += 1;
    }

    let int_start = i;
    match bytes.get(i)? {
        b'0' => i += 1,
        b'1'..=b'9' => {
            while matches!(bytes.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return None,
    }
    let int_digits = &text[int_start..i];

    let mut frac_digits = "";
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let start = i;
        while matches!(bytes.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if start == i {
            return None;
        }
        frac_digits = &text[start..i];
    }

    let mut exponent: i64 = 0;
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        let sign_negative = match bytes.get(i) {
            Some(b'-') => {
                i += 1;
                true
            }
            Some(b'+') => {
                i += 1;
                false
            }
            _ => false,
        };
        let start = i;
        while matches!(bytes.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if start == i {
            return None;
        }
        let value: i64 = text[start..i].parse().ok()?;
        exponent = if sign_negative { -value } else { value };
    }

    if i != bytes.len() {
        return None;
    }

    let mut digits = String::with_capacity(int_digits.len() + frac_digits.len());
    digits.push_str(int_digits);
    digits.push_str(frac_digits);
    exponent = exponent.checked_sub(frac_digits.len() as i64)?;

    let leading = digits.len() - digits.trim_start_matches('0').len();
    digits.drain(..leading);
    let trimmed = digits.trim_end_matches('0').len();
    exponent = exponent.checked_add((digits.len() - trimmed) as i64)?;
    digits.truncate(trimmed);

    if digits.is_empty() {
        return Some(Parts::zero());
    }

    Some(Parts {
        negative,
        digits: digits.into_boxed_str(),
        exponent,
    })
}

// -----------------------------------------------------------------------------
// Traits

impl PartialEq for Decimal {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for Decimal {}

impl Hash for Decimal {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts.hash(state);
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.parts.negative, other.parts.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for Decimal {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Decimal {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self.text)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Decimal {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::from_integer(value < 0, value.unsigned_abs() as u128)
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Decimal {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::from_integer(false, value as u128)
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64, i128, isize);
impl_from_unsigned!(u8, u16, u32, u64, u128, usize);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Decimal;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn parse_rejects_non_json_numbers() {
        for bad in ["", "-", "01", "1.", ".5", "1e", "+1", "1.5e+", "NaN", "1 "] {
            assert!(Decimal::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(dec("5.0"), dec("5"));
        assert_eq!(dec("15e-1"), dec("1.50"));
        assert_eq!(dec("-0.0"), dec("0"));
        assert_ne!(dec("1.5"), dec("1.05"));
        assert_eq!(dec("5.0").as_str(), "5.0");
    }

    #[test]
    fn ordering() {
        assert!(dec("-2") < dec("-1.5"));
        assert!(dec("0") < dec("0.001"));
        assert!(dec("12") < dec("12.3"));
        assert!(dec("9.99") < dec("10"));
        assert!(dec("1e3") > dec("999.999"));
    }

    #[test]
    fn extreme_exponents_compare() {
        assert!(dec("1e9223372036854775807") < dec("12e9223372036854775806"));
        assert!(dec("-1e9223372036854775807") > dec("-12e9223372036854775806"));
        assert!(dec("1e-9223372036854775807") > dec("0"));
        assert!(dec("1e-9223372036854775807") < dec("1e-9223372036854775806"));
    }

    #[test]
    fn integral_conversions() {
        assert!(dec("2.0").is_integral());
        assert!(!dec("2.5").is_integral());
        assert_eq!(dec("1e2").to_i128(), Some(100));
        assert_eq!(dec("-170141183460469231731687303715884105728").to_i128(), Some(i128::MIN));
        assert_eq!(dec("18446744073709551615").to_u128(), Some(u64::MAX as u128));
        assert_eq!(dec("-1").to_u128(), None);
        assert_eq!(dec("1e40").to_u128(), None);
        assert_eq!(dec("1e999999").to_i128(), None);
        assert_eq!(dec("1e9223372036854775807").to_u128(), None);
        assert_eq!(dec("-12e9223372036854775806").to_i128(), None);
    }

    #[test]
    fn from_primitives() {
        assert_eq!(Decimal::from(u64::MAX).as_str(), "18446744073709551615");
        assert_eq!(Decimal::from(i64::MIN).to_i128(), Some(i64::MIN as i128));
        assert_eq!(Decimal::from(1200_u32), dec("1.2e3"));
        assert_eq!(Decimal::from_f64(2.0).unwrap().as_str(), "2.0");
        assert_eq!(Decimal::from_f32(0.1).unwrap().as_str(), "0.1");
        assert!(Decimal::from_f64(f64::NAN).is_none());
    }
}
