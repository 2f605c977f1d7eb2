//! Encoding CLI Helpers

use crate::Encoding;
use crate::error::Error;
use std::str::FromStr;

/// Shape of an optional-value flag such as `--encoding[=ENCODING]`.
pub type Flag = Option<Option<String>>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Preference {
    /// Encoding was specified on the command-line
    Explicit(Encoding),
    /// Encoding flag was given on the command-line, but no encoding was specified
    Implicit,
    /// Encoding was omitted from the command-line
    NotSpecified,
}
impl TryFrom<Flag> for Preference {
    type Error = Error;
    fn try_from(value: Flag) -> Result<Self, Self::Error> {
        match value {
            Some(Some(s)) if s.is_empty() => Ok(Self::Implicit),
            Some(Some(s)) => Ok(Self::Explicit(Encoding::from_str(&s)?)),
            Some(None) => Ok(Self::Implicit),
            None => Ok(Self::NotSpecified),
        }
    }
}
impl Preference {
    /// A bare flag means "the configured encoding"; no flag at all means
    /// `fallback`.
    pub fn resolve(&self, configured: &Encoding, fallback: Encoding) -> Encoding {
        match self {
            Self::Explicit(e) => *e,
            Self::Implicit => *configured,
            Self::NotSpecified => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Preference::NotSpecified)]
    #[case(Some(None), Preference::Implicit)]
    #[case(Some(Some(String::new())), Preference::Implicit)]
    #[case(Some(Some("lossless".to_string())), Preference::Explicit(Encoding::Lossless))]
    #[case(Some(Some("lossy:40".to_string())), Preference::Explicit(Encoding::Lossy { quality: 40 }))]
    fn test_construct(#[case] flag: Flag, #[case] expected: Preference) {
        let preference: Preference = flag.try_into().unwrap();
        assert_eq!(preference, expected);
    }

    #[test]
    fn test_construct_invalid() {
        let flag: Flag = Some(Some("avif".to_string()));
        assert!(Preference::try_from(flag).is_err());
    }

    #[rstest]
    #[case(Preference::Explicit(Encoding::Lossy { quality: 10 }), Encoding::Lossy { quality: 10 })]
    #[case(Preference::Implicit, Encoding::Lossy { quality: 90 })]
    #[case(Preference::NotSpecified, Encoding::Lossless)]
    fn test_resolve(#[case] preference: Preference, #[case] expected: Encoding) {
        let configured = Encoding::Lossy { quality: 90 };
        assert_eq!(preference.resolve(&configured, Encoding::Lossless), expected);
    }
}
