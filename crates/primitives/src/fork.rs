//! Named protocol versions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A named fork of the consensus protocol.
///
/// The derived `Ord` follows the canonical activation order, which is what
/// fork-at-epoch queries sort by when several forks share an epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ForkName {
    #[default]
    Phase0,
    Altair,
    Bellatrix,
    Capella,
    Deneb,
    Electra,
    Fulu,
}

impl ForkName {
    /// All known forks in canonical activation order.
    pub const ALL: [ForkName; 7] = [
        ForkName::Phase0,
        ForkName::Altair,
        ForkName::Bellatrix,
        ForkName::Capella,
        ForkName::Deneb,
        ForkName::Electra,
        ForkName::Fulu,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ForkName::Phase0 => "phase0",
            ForkName::Altair => "altair",
            ForkName::Bellatrix => "bellatrix",
            ForkName::Capella => "capella",
            ForkName::Deneb => "deneb",
            ForkName::Electra => "electra",
            ForkName::Fulu => "fulu",
        }
    }
}

impl fmt::Display for ForkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a fork name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fork name: {0}")]
pub struct UnknownForkName(pub String);

impl FromStr for ForkName {
    type Err = UnknownForkName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Spec config keys name the genesis fork "GENESIS"; it is phase0.
        match s.to_ascii_lowercase().as_str() {
            "phase0" | "genesis" => Ok(ForkName::Phase0),
            "altair" => Ok(ForkName::Altair),
            "bellatrix" => Ok(ForkName::Bellatrix),
            "capella" => Ok(ForkName::Capella),
            "deneb" => Ok(ForkName::Deneb),
            "electra" => Ok(ForkName::Electra),
            "fulu" => Ok(ForkName::Fulu),
            other => Err(UnknownForkName(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_activation_history() {
        let mut sorted = ForkName::ALL;
        sorted.sort();
        assert_eq!(sorted, ForkName::ALL);
        assert!(ForkName::Phase0 < ForkName::Altair);
        assert!(ForkName::Electra < ForkName::Fulu);
    }

    #[test]
    fn parses_config_key_spellings() {
        assert_eq!("ALTAIR".parse::<ForkName>().unwrap(), ForkName::Altair);
        assert_eq!("GENESIS".parse::<ForkName>().unwrap(), ForkName::Phase0);
        assert!("osaka".parse::<ForkName>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ForkName::Capella).unwrap(),
            "\"capella\""
        );
        assert_eq!(
            serde_json::from_str::<ForkName>("\"deneb\"").unwrap(),
            ForkName::Deneb
        );
    }
}
