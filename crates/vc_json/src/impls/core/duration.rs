//! `Duration` as an ISO-8601 duration: `PT1.5S`, `PT2H30M`, `P1DT4S`.
//!
//! Only day, hour, minute and second designators are read, since longer
//! units have no fixed length. Output always uses seconds alone.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::fmt::Write;
use core::time::Duration;

use crate::impls::{cast, impl_scalar};
use crate::info::{BuildError, ScalarClass};
use crate::value::JsonValue;

impl_scalar!(
    Duration,
    ScalarClass::Temporal,
    |value| {
        let text = value.as_str().ok_or(Cow::Borrowed("expected a string"))?;
        Ok(Box::new(parse_iso(text)?))
    },
    |value, _| Ok(JsonValue::String(format_iso(*cast::<Duration>(value)?))),
);

fn format_iso(duration: Duration) -> String {
    let mut out = String::from("PT");
    let _ = write!(out, "{}", duration.as_secs());
    let nanos = duration.subsec_nanos();
    if nanos != 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push('S');
    out
}

fn parse_iso(text: &str) -> Result<Duration, BuildError> {
    let invalid = || Cow::Owned(format!("`{text}` is not an ISO-8601 duration"));

    let rest = text.strip_prefix('P').ok_or_else(invalid)?;
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) if !time.is_empty() => (date, time),
        Some(_) => return Err(invalid()),
        None => (rest, ""),
    };
    if date.is_empty() && time.is_empty() {
        return Err(invalid());
    }

    let mut total = Duration::ZERO;
    let mut add = |amount: Duration| -> Result<(), BuildError> {
        total = total.checked_add(amount).ok_or(Cow::Borrowed("duration overflow"))?;
        Ok(())
    };

    if !date.is_empty() {
        let days = date.strip_suffix('D').ok_or_else(invalid)?;
        let days: u64 = days.parse().map_err(|_| invalid())?;
        add(Duration::from_secs(days.checked_mul(86_400).ok_or_else(invalid)?))?;
    }

    let mut units = ['H', 'M', 'S'].iter();
    let mut remaining = time;
    while !remaining.is_empty() {
        let end = remaining
            .find(|ch: char| ch.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (number, tail) = remaining.split_at(end);
        let unit = tail.chars().next().ok_or_else(invalid)?;
        // Designators must appear in order, each at most once.
        if !units.any(|expected| *expected == unit) {
            return Err(invalid());
        }
        let amount = match unit {
            'S' => seconds(number).ok_or_else(invalid)?,
            'M' => Duration::from_secs(whole(number).ok_or_else(invalid)?.checked_mul(60).ok_or_else(invalid)?),
            _ => Duration::from_secs(whole(number).ok_or_else(invalid)?.checked_mul(3_600).ok_or_else(invalid)?),
        };
        add(amount)?;
        remaining = &tail[1..];
    }
    Ok(total)
}

fn whole(number: &str) -> Option<u64> {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

fn seconds(number: &str) -> Option<Duration> {
    let (secs, fraction) = match number.split_once('.') {
        Some((secs, fraction)) => (secs, fraction),
        None => (number, ""),
    };
    let secs = whole(secs)?;
    if fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut nanos = 0_u32;
    for (index, digit) in fraction.bytes().enumerate() {
        nanos += u32::from(digit - b'0') * 10_u32.pow(8 - index as u32);
    }
    Some(Duration::new(secs, nanos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format() {
        assert_eq!(format_iso(Duration::ZERO), "PT0S");
        assert_eq!(format_iso(Duration::from_millis(1500)), "PT1.5S");
        assert_eq!(format_iso(Duration::new(3, 7)), "PT3.000000007S");
    }

    #[test]
    fn parse() {
        assert_eq!(parse_iso("PT1.5S"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_iso("PT2H30M"), Ok(Duration::from_secs(9_000)));
        assert_eq!(parse_iso("P1DT4S"), Ok(Duration::from_secs(86_404)));
        assert_eq!(parse_iso("P2D"), Ok(Duration::from_secs(172_800)));
        assert!(parse_iso("PT").is_err());
        assert!(parse_iso("PT1S2M").is_err());
        assert!(parse_iso("1S").is_err());
        assert!(parse_iso("PT-1S").is_err());
    }
}
