use serde::{Serialize, Deserialize};

/// Game build version stored in the local version file and
/// served by the remote version marker
///
/// Versions are only compared for equality. There's no "newer than",
/// any difference between local and remote versions means the game
/// should be reinstalled
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16
}

impl Version {
    /// `0.0.0`, used when the game is not installed or the version string is malformed
    pub const ZERO: Version = Version::new(0, 0, 0);

    #[inline]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch
        }
    }

    /// Parse `major.minor.patch` string
    ///
    /// Never fails: wrong numbers count or a non-numeric field
    /// give `Version::ZERO`. Surrounding whitespace is ignored
    /// so the version file may end with a newline
    pub fn parse(version: impl AsRef<str>) -> Self {
        let version = version.as_ref().trim();

        let numbers = version.split('.')
            .map(|number| number.parse::<u16>())
            .collect::<Vec<_>>();

        match numbers.as_slice() {
            [Ok(major), Ok(minor), Ok(patch)] => Self::new(*major, *minor, *patch),

            _ => {
                tracing::debug!(?version, "Malformed version string, falling back to 0.0.0");

                Self::ZERO
            }
        }
    }

    /// Check if any of the version numbers differ from the other version's
    #[inline]
    pub fn differs(&self, other: &Version) -> bool {
        self.major != other.major ||
        self.minor != other.minor ||
        self.patch != other.patch
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        !self.differs(&Self::ZERO)
    }
}

impl std::str::FromStr for Version {
    type Err = std::convert::Infallible;

    #[inline]
    fn from_str(version: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(version))
    }
}

impl std::fmt::Display for Version {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl PartialEq<&str> for Version {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<String> for Version {
    #[inline]
    fn eq(&self, other: &String) -> bool {
        &self.to_string() == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(Version::parse("0.0.0"), Version::new(0, 0, 0));
        assert_eq!(Version::parse("1.2.3"), Version::new(1, 2, 3));
        assert_eq!(Version::parse("1.2.3\n"), Version::new(1, 2, 3));
        assert_eq!(Version::parse("  10.20.30 "), Version::new(10, 20, 30));
        assert_eq!(Version::parse("65535.65535.65535"), Version::new(65535, 65535, 65535));

        assert_eq!("4.5.6".parse(), Ok(Version::new(4, 5, 6)));
    }

    #[test]
    fn parse_fallback() {
        assert_eq!(Version::parse(""), Version::ZERO);
        assert_eq!(Version::parse("1"), Version::ZERO);
        assert_eq!(Version::parse("1.2"), Version::ZERO);
        assert_eq!(Version::parse("1.2.3.4"), Version::ZERO);
        assert_eq!(Version::parse("1..3"), Version::ZERO);
        assert_eq!(Version::parse("a.b.c"), Version::ZERO);
        assert_eq!(Version::parse("1.2.x"), Version::ZERO);
        assert_eq!(Version::parse("-1.2.3"), Version::ZERO);
        assert_eq!(Version::parse("65536.0.0"), Version::ZERO);
        assert_eq!(Version::parse("<html>404</html>"), Version::ZERO);
    }

    #[test]
    fn round_trip() {
        for version in ["0.0.0", "1.2.3", "1.3.0", "100.0.255", "7.65535.12"] {
            assert_eq!(Version::parse(version).to_string(), version);
            assert_eq!(Version::parse(version), version);
        }
    }

    #[test]
    fn differs() {
        let base = Version::new(1, 2, 3);

        assert!(!base.differs(&Version::new(1, 2, 3)));

        assert!(base.differs(&Version::new(2, 2, 3)));
        assert!(base.differs(&Version::new(1, 3, 3)));
        assert!(base.differs(&Version::new(1, 2, 4)));

        // Equality only, lower versions differ too
        assert!(base.differs(&Version::new(1, 2, 2)));
        assert!(base.differs(&Version::ZERO));

        assert!(Version::ZERO.is_zero());
        assert!(!base.is_zero());
    }
}
