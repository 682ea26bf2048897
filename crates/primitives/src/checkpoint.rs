//! Finality checkpoints.

use serde::{Deserialize, Serialize};

use crate::{quantities::Epoch, Root};

/// An `(epoch, root)` pair identifying a point of the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub root: Root,
}

/// The finality state reported by `/eth/v1/beacon/states/{id}/finality_checkpoints`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finality {
    pub previous_justified: Checkpoint,
    #[serde(rename = "current_justified")]
    pub justified: Checkpoint,
    pub finalized: Checkpoint,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::b256;

    use super::*;

    #[test]
    fn finality_round_trips() {
        let finality = Finality {
            previous_justified: Checkpoint {
                epoch: Epoch::new(98),
                root: b256!("1111111111111111111111111111111111111111111111111111111111111111"),
            },
            justified: Checkpoint {
                epoch: Epoch::new(99),
                root: b256!("2222222222222222222222222222222222222222222222222222222222222222"),
            },
            finalized: Checkpoint {
                epoch: Epoch::new(100),
                root: b256!("3333333333333333333333333333333333333333333333333333333333333333"),
            },
        };

        let json = serde_json::to_string(&finality).unwrap();
        assert!(json.contains("\"current_justified\""));
        assert_eq!(serde_json::from_str::<Finality>(&json).unwrap(), finality);
    }
}
