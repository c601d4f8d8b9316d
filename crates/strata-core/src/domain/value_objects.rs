//! Domain value objects: Layer and MigrationVersion.
//!
//! # Design
//!
//! Both are `Copy` value types compared by value.
//! Layer applicability rules live in `layers.rs`; this file only defines the
//! types, their string representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Layer ────────────────────────────────────────────────────────────────────

/// One tier of the SDK product line.
///
/// Visibility is inherited upwards: `sdk ⊆ framework ⊆ react` and
/// `framework ⊆ app`. `react` and `app` are siblings and see nothing of each
/// other. Command variants are a separate matter, see [`Layer::lineage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Sdk,
    Framework,
    React,
    App,
}

impl Layer {
    /// Every layer, base tier first.
    pub const ALL: [Layer; 4] = [Self::Sdk, Self::Framework, Self::React, Self::App];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sdk => "sdk",
            Self::Framework => "framework",
            Self::React => "react",
            Self::App => "app",
        }
    }

    /// Variant-suffix fallback order, most specific first.
    ///
    /// `app` ships no command variants of its own, so it falls back through
    /// the react chain. This is not the visibility relation; use
    /// [`Layer::inherits`] for that.
    pub const fn lineage(self) -> &'static [Layer] {
        match self {
            Self::Sdk => &[Self::Sdk],
            Self::Framework => &[Self::Framework, Self::Sdk],
            Self::React | Self::App => &[Self::React, Self::Framework, Self::Sdk],
        }
    }

    /// Tiers whose material this layer also sees, itself included.
    const fn tiers(self) -> &'static [Layer] {
        match self {
            Self::Sdk => &[Self::Sdk],
            Self::Framework => &[Self::Framework, Self::Sdk],
            Self::React => &[Self::React, Self::Framework, Self::Sdk],
            Self::App => &[Self::App, Self::Framework, Self::Sdk],
        }
    }

    /// Whether everything visible to `other` is also visible to `self`.
    pub fn inherits(self, other: Layer) -> bool {
        self.tiers().contains(&other)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sdk" => Ok(Self::Sdk),
            "framework" => Ok(Self::Framework),
            "react" => Ok(Self::React),
            "app" => Ok(Self::App),
            other => Err(DomainError::InvalidLayer(other.to_string())),
        }
    }
}

// ── MigrationVersion ─────────────────────────────────────────────────────────

/// Semantic version identifying a migration.
///
/// Ordering is numeric by `(major, minor, patch)`, so `0.10.0 > 0.9.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MigrationVersion {
    major: u64,
    minor: u64,
    patch: u64,
}

impl MigrationVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub const fn major(&self) -> u64 {
        self.major
    }
    pub const fn minor(&self) -> u64 {
        self.minor
    }
    pub const fn patch(&self) -> u64 {
        self.patch
    }
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for MigrationVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidVersion {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid("expected three dot-separated components"));
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("components must be unsigned integers"));
            }
            *slot = part
                .parse()
                .map_err(|_| invalid("component does not fit in 64 bits"))?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl TryFrom<String> for MigrationVersion {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MigrationVersion> for String {
    fn from(version: MigrationVersion) -> Self {
        version.to_string()
    }
}
