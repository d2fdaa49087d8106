use std::fmt::{Display, Formatter};
use thiserror::Error;

/// MD5 digest of a firmware binary as 32 lowercase hexadecimal characters, the form the
/// ESP8266 httpUpdate client reports and expects back.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SketchHash(String);

impl SketchHash {
    pub fn parse(value: &str) -> Result<SketchHash, MalformedHash> {
        let normalized = value.to_lowercase();
        if normalized.len() == 32 && normalized.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(SketchHash(normalized))
        } else {
            Err(MalformedHash)
        }
    }

    pub fn from_digest(digest: md5::Digest) -> SketchHash {
        SketchHash(format!("{:x}", digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SketchHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Clone, PartialEq, Eq, Debug)]
#[error("Header: sketch md5")]
pub struct MalformedHash;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::lowercase("834feae744c43369c32b2cdbf2ada1e6", "834feae744c43369c32b2cdbf2ada1e6")]
    #[case::uppercase("834FEAE744C43369C32B2CDBF2ADA1E6", "834feae744c43369c32b2cdbf2ada1e6")]
    fn parse_normalizes_to_lowercase(#[case] value: &str, #[case] expected: &str) -> Result<(), MalformedHash> {
        assert_eq!(SketchHash::parse(value)?.as_str(), expected);
        Ok(())
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_short("834feae744c43369c32b2cdbf2ada1e")]
    #[case::too_long("834feae744c43369c32b2cdbf2ada1e60")]
    #[case::non_hex("834feae744c43369c32b2cdbf2ada1ez")]
    fn parse_rejects_anything_but_32_hex_characters(#[case] value: &str) {
        assert_eq!(SketchHash::parse(value), Err(MalformedHash));
    }

    #[test]
    fn from_digest_matches_the_reported_format() {
        let hash = SketchHash::from_digest(md5::compute(b"sketch"));

        assert_eq!(hash.as_str(), "834feae744c43369c32b2cdbf2ada1e6");
    }
}
