//! `.byte` / `.half` / `.word` data encoding.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Error;
use crate::lex;
use crate::parser;

// Items are `value` or `value:repeat`; the body arrives uppercased.
static DIRECTIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.(BYTE|HALF|WORD)\s+(.+)$").unwrap());

/// Serializes one data directive little-endian into `out`. Values are
/// truncated to the item size; a repeat count replicates the item.
pub fn encode(body: &str, out: &mut Vec<u8>) -> Result<(), Error> {
    let caps = DIRECTIVE
        .captures(body)
        .ok_or_else(|| Error::UnknownDirective(parser::mnemonic(body).to_string()))?;
    let size = match &caps[1] {
        "BYTE" => 1,
        "HALF" => 2,
        _ => 4,
    };

    for item in caps[2].split(',') {
        let item = item.trim();
        let (value, repeat) = match item.split_once(':') {
            Some((value, repeat)) => {
                let repeat = repeat.trim();
                if !lex::is_positive(repeat) {
                    return Err(Error::ExpectPositive(repeat.to_string()));
                }
                (value.trim(), lex::to_unumber(repeat, true)?)
            }
            None => (item, 1),
        };
        if !lex::is_number(value) {
            return Err(Error::ExpectNumber(value.to_string()));
        }
        let value = lex::to_number(value, true)? as u32;
        for _ in 0..repeat {
            out.extend_from_slice(&value.to_le_bytes()[..size]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(body: &str) -> Result<Vec<u8>, Error> {
        let mut out = vec![];
        encode(body, &mut out)?;
        Ok(out)
    }

    #[test]
    fn words_little_endian() {
        assert_eq!(
            bytes(".WORD 1, 2, 3").unwrap(),
            vec![1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]
        );
        assert_eq!(
            bytes(".WORD 0x11223344").unwrap(),
            vec![0x44, 0x33, 0x22, 0x11]
        );
    }

    #[test]
    fn halves_and_bytes() {
        assert_eq!(bytes(".HALF 0x1234").unwrap(), vec![0x34, 0x12]);
        assert_eq!(bytes(".BYTE 1, 2").unwrap(), vec![1, 2]);
    }

    #[test]
    fn repeat_syntax() {
        assert_eq!(
            bytes(".BYTE 0xAA:3, 0xBB").unwrap(),
            vec![0xaa, 0xaa, 0xaa, 0xbb]
        );
        assert_eq!(bytes(".HALF 7:0").unwrap(), vec![]);
        assert_eq!(bytes(".WORD 1 : 2").unwrap(), vec![1, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn negative_values_wrap() {
        assert_eq!(bytes(".WORD -1").unwrap(), vec![0xff, 0xff, 0xff, 0xff]);
        assert_eq!(bytes(".BYTE -2").unwrap(), vec![0xfe]);
    }

    #[test]
    fn truncation() {
        assert_eq!(bytes(".BYTE 0x1FF").unwrap(), vec![0xff]);
        assert_eq!(bytes(".HALF 0x12345").unwrap(), vec![0x45, 0x23]);
    }

    #[test]
    fn errors() {
        assert!(matches!(
            bytes(".WORD X"),
            Err(Error::ExpectNumber(_))
        ));
        assert!(matches!(
            bytes(".BYTE 1:-2"),
            Err(Error::ExpectPositive(_))
        ));
        assert!(matches!(
            bytes(".STRING \"AB\""),
            Err(Error::UnknownDirective(_))
        ));
        assert!(matches!(bytes("ADD $1,$2,$3"), Err(Error::UnknownDirective(_))));
    }
}
