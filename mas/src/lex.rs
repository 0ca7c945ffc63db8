//! Token classification and integer parsing for operand text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Error;

static POSITIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)(?:\d+|0x[0-9a-f]+)$").unwrap());
static SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.$]+$").unwrap());
static MEMORY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\S+)\((\S+)\)\s*$").unwrap());

/// Unsigned decimal or `0x` hexadecimal literal.
pub fn is_positive(s: &str) -> bool {
    POSITIVE.is_match(s)
}

/// [`is_positive`] with an optional leading `-`.
pub fn is_number(s: &str) -> bool {
    is_positive(s.strip_prefix('-').unwrap_or(s))
}

/// Decimal-only variant of [`is_number`].
pub fn is_decimal(s: &str) -> bool {
    let t = s.strip_prefix('-').unwrap_or(s);
    !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit())
}

fn radix_of(body: &str) -> (u32, &str) {
    match body.get(..2) {
        Some(p) if p.eq_ignore_ascii_case("0x") => (16, &body[2..]),
        _ => (10, body),
    }
}

/// Parses a signed 32-bit literal. A value that overflows `i32` is
/// retried as `u32` and reinterpreted bitwise, so `0xFFFFFFFF` reads as
/// -1; anything larger fails with *number out of range*.
pub fn to_number(s: &str, hex: bool) -> Result<i32, Error> {
    if !is_number(s) || (!hex && !is_decimal(s)) {
        return Err(Error::ExpectNumber(s.to_string()));
    }
    let (radix, text) = match s.strip_prefix('-') {
        Some(body) => {
            let (radix, digits) = radix_of(body);
            (radix, format!("-{digits}"))
        }
        None => {
            let (radix, digits) = radix_of(s);
            (radix, digits.to_string())
        }
    };
    i32::from_str_radix(&text, radix)
        .or_else(|_| u32::from_str_radix(&text, radix).map(|v| v as i32))
        .map_err(|_| Error::NumberOutOfRange(s.to_string()))
}

/// Parses an unsigned 32-bit literal. A negative input is reinterpreted
/// as its two's-complement bits, matching [`to_number`]'s policy.
pub fn to_unumber(s: &str, hex: bool) -> Result<u32, Error> {
    if !is_number(s) || (!hex && !is_decimal(s)) {
        return Err(Error::ExpectNumber(s.to_string()));
    }
    if s.starts_with('-') {
        return to_number(s, hex).map(|v| v as u32);
    }
    let (radix, digits) = radix_of(s);
    u32::from_str_radix(digits, radix).map_err(|_| Error::NumberOutOfRange(s.to_string()))
}

/// Label-reference identifier: `[A-Za-z0-9_.$]+`, not starting with a
/// digit, and not a number or register.
pub fn is_symbol(s: &str) -> bool {
    !s.is_empty()
        && SYMBOL.is_match(s)
        && !s.as_bytes()[0].is_ascii_digit()
        && !arch::reg::is_register(s)
}

/// Splits an `offset(base)` memory operand. `offset` must be a number
/// or symbol and `base` a register, else the form is rejected.
pub fn split_memory(s: &str) -> Option<(String, String)> {
    let caps = MEMORY.captures(s)?;
    let offset = caps[1].to_string();
    let base = caps[2].to_string();
    if (is_number(&offset) || is_symbol(&offset)) && arch::reg::is_register(&base) {
        Some((offset, base))
    } else {
        None
    }
}

pub fn is_memory(s: &str) -> bool {
    split_memory(s).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert!(is_positive("123"));
        assert!(is_positive("0x1f2A"));
        assert!(!is_positive("-1"));
        assert!(!is_positive("12ab"));
        assert!(is_number("-123"));
        assert!(is_number("-0x2a"));
        assert!(!is_number("$t0"));
        assert!(is_decimal("-42"));
        assert!(!is_decimal("0x42"));
    }

    #[test]
    fn parse_signed() {
        assert_eq!(to_number("5", true).unwrap(), 5);
        assert_eq!(to_number("-4", true).unwrap(), -4);
        assert_eq!(to_number("0x10", true).unwrap(), 16);
        assert_eq!(to_number("-0x10", true).unwrap(), -16);
        assert_eq!(to_number("0xFFFFFFFF", true).unwrap(), -1);
        assert_eq!(to_number("4294967295", true).unwrap(), -1);
        assert!(to_number("4294967296", true).is_err());
        assert!(to_number("0x10", false).is_err());
        assert!(to_number("abc", true).is_err());
    }

    #[test]
    fn parse_unsigned() {
        assert_eq!(to_unumber("0x12345678", true).unwrap(), 0x1234_5678);
        assert_eq!(to_unumber("-5", true).unwrap(), 0xffff_fffb);
        assert!(to_unumber("99999999999", true).is_err());
    }

    #[test]
    fn symbols() {
        assert!(is_symbol("LOOP"));
        assert!(is_symbol("main.entry"));
        assert!(is_symbol("_x$1"));
        assert!(!is_symbol("1abc"));
        assert!(!is_symbol("123"));
        assert!(!is_symbol("0x12"));
        assert!(!is_symbol("$t0"));
        assert!(!is_symbol(""));
        assert!(!is_symbol("a-b"));
    }

    #[test]
    fn memory() {
        assert_eq!(
            split_memory("4($t0)"),
            Some(("4".to_string(), "$t0".to_string()))
        );
        assert_eq!(
            split_memory("-16($sp)"),
            Some(("-16".to_string(), "$sp".to_string()))
        );
        assert_eq!(
            split_memory("VAR($s1)"),
            Some(("VAR".to_string(), "$s1".to_string()))
        );
        assert!(!is_memory("4(t0)"));
        assert!(!is_memory("($sp)"));
        assert!(!is_memory("$t0"));
    }
}
