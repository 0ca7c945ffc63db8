use num_enum::{FromPrimitive, IntoPrimitive};
use strum::{Display, EnumString};
use thiserror::Error;

/// The 32 general-purpose registers, numbered as encoded in RS/RT/RD.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, FromPrimitive, IntoPrimitive, EnumString, Display,
)]
#[repr(u8)]
pub enum Reg {
    #[default]
    ZERO = 0,
    AT,
    V0,
    V1,
    A0,
    A1,
    A2,
    A3,
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
    T7,
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    T8,
    T9,
    #[strum(serialize = "K0", serialize = "I0")]
    K0,
    #[strum(serialize = "K1", serialize = "I1")]
    K1,
    #[strum(serialize = "GP", serialize = "S9")]
    GP,
    SP,
    #[strum(serialize = "FP", serialize = "S8")]
    FP,
    RA,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0} is not a register.")]
pub struct RegError(pub String);

impl Reg {
    /// Parses `$N` (decimal, 0-31) or an aliased name such as `$t0`, `$sp`.
    pub fn parse(s: &str) -> Result<Self, RegError> {
        let name = s.strip_prefix('$').ok_or_else(|| RegError(s.to_string()))?;
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            return match name.parse::<u32>() {
                Ok(n) if n < 32 => Ok(Reg::from(n as u8)),
                _ => Err(RegError(s.to_string())),
            };
        }
        name.to_ascii_uppercase()
            .parse::<Self>()
            .map_err(|_| RegError(s.to_string()))
    }

    /// Register number as used in machine-word fields.
    pub fn index(self) -> u32 {
        u8::from(self) as u32
    }
}

pub fn is_register(s: &str) -> bool {
    Reg::parse(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered() {
        assert_eq!(Reg::parse("$0"), Ok(Reg::ZERO));
        assert_eq!(Reg::parse("$8"), Ok(Reg::T0));
        assert_eq!(Reg::parse("$29"), Ok(Reg::SP));
        assert_eq!(Reg::parse("$31"), Ok(Reg::RA));
        assert!(Reg::parse("$32").is_err());
    }

    #[test]
    fn aliases() {
        assert_eq!(Reg::parse("$zero"), Ok(Reg::ZERO));
        assert_eq!(Reg::parse("$T5"), Ok(Reg::T5));
        assert_eq!(Reg::parse("$sp").map(Reg::index), Ok(29));
        assert_eq!(Reg::parse("$ra").map(Reg::index), Ok(31));
    }

    #[test]
    fn synonyms() {
        assert_eq!(Reg::parse("$k0"), Reg::parse("$i0"));
        assert_eq!(Reg::parse("$k1"), Reg::parse("$i1"));
        assert_eq!(Reg::parse("$gp"), Reg::parse("$s9"));
        assert_eq!(Reg::parse("$fp"), Reg::parse("$s8"));
        assert_eq!(Reg::parse("$gp").map(Reg::index), Ok(28));
        assert_eq!(Reg::parse("$fp").map(Reg::index), Ok(30));
    }

    #[test]
    fn rejects() {
        assert!(Reg::parse("t0").is_err());
        assert!(Reg::parse("$hoge").is_err());
        assert!(Reg::parse("$").is_err());
        assert!(Reg::parse("$0x3").is_err());
        assert!(!is_register("loop"));
        assert!(is_register("$a3"));
    }
}
