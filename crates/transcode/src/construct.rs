use crate::Encoding;
use crate::error::{Error, ErrorKind, Result};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

impl FromStr for Encoding {
    type Err = Error;

    /// Accepts `lossless`, `lossy` (default quality) or `lossy:<quality>`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.split_once(':') {
            None if s == "lossless" => Ok(Encoding::Lossless),
            None if s == "lossy" => Ok(Encoding::default()),
            Some(("lossy", quality)) => match quality.trim().parse::<u8>() {
                Ok(quality) => Encoding::lossy(quality),
                Err(_) => exn::bail!(ErrorKind::UnsupportedEncoding(s.to_string())),
            },
            _ => exn::bail!(ErrorKind::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Encoding::Lossy { quality } => write!(f, "lossy:{quality}"),
            Encoding::Lossless => write!(f, "lossless"),
        }
    }
}

impl Encoding {
    /// Lossy encoding, rejecting qualities above 100.
    pub fn lossy(quality: u8) -> Result<Self> {
        if quality > 100 {
            exn::bail!(ErrorKind::InvalidQuality(quality));
        }
        Ok(Encoding::Lossy { quality })
    }

    /// Builds the encoding from the two configuration knobs.
    pub fn from_settings(lossless: bool, quality: u8) -> Result<Self> {
        match lossless {
            true => Ok(Encoding::Lossless),
            false => Encoding::lossy(quality),
        }
    }

    /// File extension of encoded output, without the leading dot.
    #[inline]
    #[must_use]
    pub fn extension(&self) -> &'static str {
        "webp"
    }

    /// MIME type of encoded output, for consumers serving covers over HTTP.
    #[inline]
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        "image/webp"
    }

    #[inline]
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        matches!(self, Encoding::Lossless)
    }
}

#[cfg(test)]
mod tests {
    use crate::{DEFAULT_QUALITY, Encoding};
    use rstest::rstest;

    #[rstest]
    #[case("lossless", Encoding::Lossless)]
    #[case("LOSSLESS", Encoding::Lossless)]
    #[case("lossy", Encoding::Lossy { quality: DEFAULT_QUALITY })]
    #[case("lossy:80", Encoding::Lossy { quality: 80 })]
    #[case(" lossy: 0 ", Encoding::Lossy { quality: 0 })]
    #[case("lossy:100", Encoding::Lossy { quality: 100 })]
    fn test_from_str(#[case] test: &str, #[case] expected: Encoding) {
        assert_eq!(test.parse::<Encoding>().unwrap(), expected);
    }

    #[rstest]
    #[case("png")]
    #[case("lossy:101")]
    #[case("lossy:-1")]
    #[case("lossy:high")]
    #[case("lossless:50")]
    #[case("")]
    fn test_from_str_invalid(#[case] test: &str) {
        assert!(test.parse::<Encoding>().is_err());
    }

    #[rstest]
    #[case(Encoding::Lossless)]
    #[case(Encoding::Lossy { quality: 42 })]
    fn test_display_parses_back(#[case] encoding: Encoding) {
        assert_eq!(encoding.to_string().parse::<Encoding>().unwrap(), encoding);
    }

    #[test]
    fn test_from_settings() {
        assert_eq!(Encoding::from_settings(true, 200).unwrap(), Encoding::Lossless);
        assert_eq!(Encoding::from_settings(false, 60).unwrap(), Encoding::Lossy { quality: 60 });
        assert!(Encoding::from_settings(false, 200).is_err());
    }
}
