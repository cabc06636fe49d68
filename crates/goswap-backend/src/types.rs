use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A Go release identifier such as `1.21`, `1.21.3` or `1.22rc1`.
///
/// Parsing through [`FromStr`] enforces the release grammar
/// `1[.MINOR][.PATCH][(rc|beta)N]`, where every number is positive and has no
/// leading zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GoVersion {
    pub major: u32,
    pub minor: Option<u32>,
    pub patch: Option<u32>,
    pub pre: Option<PreRelease>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PreReleaseKind {
    Beta,
    Rc,
}

impl PreReleaseKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beta => "beta",
            Self::Rc => "rc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreRelease {
    pub kind: PreReleaseKind,
    pub number: u32,
}

impl Ord for PreRelease {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then(self.number.cmp(&other.number))
    }
}

impl PartialOrd for PreRelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("Expected 1[.MINOR][.PATCH][(rc|beta)N], got: {input}")]
    InvalidFormat { input: String },
    #[error("Invalid {component} in version {input}")]
    InvalidComponent {
        component: &'static str,
        input: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Strict,
    Lenient,
}

impl GoVersion {
    fn parse(input: &str, mode: Mode) -> Result<Self, VersionParseError> {
        let invalid = || VersionParseError::InvalidFormat {
            input: input.to_string(),
        };

        let (numeric, suffix) = match input.find(|c: char| c.is_ascii_alphabetic()) {
            Some(idx) => (&input[..idx], Some(&input[idx..])),
            None => (input, None),
        };

        let mut parts = numeric.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let minor_str = parts.next();
        let patch_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        let major = parse_number(major_str, "major", input, mode)?;
        if mode == Mode::Strict && major_str != "1" {
            return Err(VersionParseError::InvalidComponent {
                component: "major",
                input: input.to_string(),
            });
        }
        let minor = minor_str
            .map(|s| parse_number(s, "minor", input, mode))
            .transpose()?;
        let patch = patch_str
            .map(|s| parse_number(s, "patch", input, mode))
            .transpose()?;

        let pre = suffix
            .map(|suffix| {
                let (kind, number) = if let Some(rest) = suffix.strip_prefix("rc") {
                    (PreReleaseKind::Rc, rest)
                } else if let Some(rest) = suffix.strip_prefix("beta") {
                    (PreReleaseKind::Beta, rest)
                } else {
                    return Err(invalid());
                };
                Ok(PreRelease {
                    kind,
                    number: parse_number(number, kind.as_str(), input, mode)?,
                })
            })
            .transpose()?;

        Ok(Self {
            major,
            minor,
            patch,
            pre,
        })
    }
}

fn parse_number(
    s: &str,
    component: &'static str,
    input: &str,
    mode: Mode,
) -> Result<u32, VersionParseError> {
    let invalid = || VersionParseError::InvalidComponent {
        component,
        input: input.to_string(),
    };

    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if mode == Mode::Strict && s.starts_with('0') {
        return Err(invalid());
    }
    s.parse().map_err(|_| invalid())
}

impl FromStr for GoVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, Mode::Strict)
    }
}

impl Ord for GoVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.unwrap_or(0).cmp(&other.minor.unwrap_or(0)))
            .then(self.patch.unwrap_or(0).cmp(&other.patch.unwrap_or(0)))
            .then(match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
            // `1.21` and `1.21.0` only meet here when parsed leniently.
            .then(self.minor.is_some().cmp(&other.minor.is_some()))
            .then(self.patch.is_some().cmp(&other.patch.is_some()))
    }
}

impl PartialOrd for GoVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{minor}")?;
        }
        if let Some(patch) = self.patch {
            write!(f, ".{patch}")?;
        }
        if let Some(pre) = self.pre {
            write!(f, "{}{}", pre.kind.as_str(), pre.number)?;
        }
        Ok(())
    }
}

#[must_use]
pub fn is_valid_version(s: &str) -> bool {
    s.parse::<GoVersion>().is_ok()
}

/// Strict total order over version strings, used to sort the local list.
///
/// Does not validate. Strings that cannot be read as versions at all sort after
/// every readable one and are ordered lexically among themselves.
#[must_use]
pub fn less(a: &str, b: &str) -> bool {
    match (
        GoVersion::parse(a, Mode::Lenient),
        GoVersion::parse(b, Mode::Lenient),
    ) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)) == Ordering::Less,
        (Ok(_), Err(_)) => true,
        (Err(_), Ok(_)) => false,
        (Err(_), Err(_)) => a < b,
    }
}

/// One entry of the published release catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRelease {
    pub version: String,
    #[serde(default)]
    pub stable: bool,
}
