//! Java language levels used by `compileOptions` and `kotlinOptions`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A Java language/bytecode level, stored as its feature release number
/// (8 for `VERSION_1_8`, 11 for `VERSION_11`).
///
/// Any level can be parsed; whether it is supported by the Android
/// toolchain is a validation concern, see [`JavaVersion::is_supported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JavaVersion(u8);

impl JavaVersion {
    pub const VERSION_1_8: JavaVersion = JavaVersion(8);
    pub const VERSION_11: JavaVersion = JavaVersion(11);
    pub const VERSION_17: JavaVersion = JavaVersion(17);
    pub const VERSION_21: JavaVersion = JavaVersion(21);

    /// Levels accepted by current Android Gradle tooling.
    pub const SUPPORTED: [JavaVersion; 4] = [
        Self::VERSION_1_8,
        Self::VERSION_11,
        Self::VERSION_17,
        Self::VERSION_21,
    ];

    pub fn feature(&self) -> u8 {
        self.0
    }

    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }

    /// The `jvmTarget` spelling: `1.8` for 8 and below, `11` and up otherwise.
    pub fn jvm_target(&self) -> String {
        if self.0 <= 8 {
            format!("1.{}", self.0)
        } else {
            self.0.to_string()
        }
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 <= 8 {
            write!(f, "VERSION_1_{}", self.0)
        } else {
            write!(f, "VERSION_{}", self.0)
        }
    }
}

impl FromStr for JavaVersion {
    type Err = Error;

    /// Accepts `VERSION_1_8`, `VERSION_11`, `JavaVersion.VERSION_17`, `1.8` and `21`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.strip_prefix("JavaVersion.").unwrap_or(raw);
        let digits = match raw.strip_prefix("VERSION_") {
            Some(rest) => rest.replace('_', "."),
            None => raw.to_string(),
        };
        let feature = match digits.strip_prefix("1.") {
            Some(legacy) => legacy,
            None => digits.as_str(),
        };

        feature
            .parse::<u8>()
            .ok()
            .filter(|n| *n > 0)
            .map(JavaVersion)
            .ok_or_else(|| Error::InvalidInput(format!("unrecognized Java version: {}", s)))
    }
}

impl TryFrom<String> for JavaVersion {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JavaVersion> for String {
    fn from(version: JavaVersion) -> Self {
        version.to_string()
    }
}
