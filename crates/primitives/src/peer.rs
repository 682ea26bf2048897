//! Peers reported by the upstream node, with client-agent classification.

use serde::{Deserialize, Serialize};

use crate::quantities::quoted_u64;

/// A known consensus client implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agent {
    Unknown,
    Lighthouse,
    Nimbus,
    Teku,
    Prysm,
    Lodestar,
    Grandine,
}

impl Agent {
    /// All known agents.
    pub const ALL: [Agent; 7] = [
        Agent::Unknown,
        Agent::Lighthouse,
        Agent::Nimbus,
        Agent::Teku,
        Agent::Prysm,
        Agent::Lodestar,
        Agent::Grandine,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Agent::Unknown => "unknown",
            Agent::Lighthouse => "lighthouse",
            Agent::Nimbus => "nimbus",
            Agent::Teku => "teku",
            Agent::Prysm => "prysm",
            Agent::Lodestar => "lodestar",
            Agent::Grandine => "grandine",
        }
    }

    /// Classify an agent string by case-insensitive substring match.
    pub fn from_agent_string(agent: &str) -> Agent {
        let lower = agent.to_ascii_lowercase();

        for candidate in [
            Agent::Lighthouse,
            Agent::Nimbus,
            Agent::Teku,
            Agent::Prysm,
            Agent::Lodestar,
            Agent::Grandine,
        ] {
            if lower.contains(candidate.as_str()) {
                return candidate;
            }
        }

        Agent::Unknown
    }
}

/// Connection state of a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerState {
    Disconnected,
    Connected,
    Connecting,
    Disconnecting,
}

impl PeerState {
    /// All possible peer states.
    pub const ALL: [PeerState; 4] = [
        PeerState::Disconnected,
        PeerState::Connected,
        PeerState::Connecting,
        PeerState::Disconnecting,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PeerState::Disconnected => "disconnected",
            PeerState::Connected => "connected",
            PeerState::Connecting => "connecting",
            PeerState::Disconnecting => "disconnecting",
        }
    }
}

/// Direction of a peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerDirection {
    Inbound,
    Outbound,
}

impl PeerDirection {
    /// All possible peer directions.
    pub const ALL: [PeerDirection; 2] = [PeerDirection::Inbound, PeerDirection::Outbound];

    pub const fn as_str(self) -> &'static str {
        match self {
            PeerDirection::Inbound => "inbound",
            PeerDirection::Outbound => "outbound",
        }
    }
}

/// A single entry of `/eth/v1/node/peers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub peer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_p2p_address: Option<String>,
    pub state: PeerState,
    pub direction: PeerDirection,
    /// The raw agent string advertised by the peer, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl Peer {
    /// The classified agent of this peer.
    pub fn derive_agent(&self) -> Agent {
        self.agent
            .as_deref()
            .map(Agent::from_agent_string)
            .unwrap_or(Agent::Unknown)
    }
}

/// The peer list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Peers(pub Vec<Peer>);

impl Peers {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Peer> {
        self.0.iter()
    }

    pub fn by_state(&self, state: PeerState) -> Peers {
        Peers(self.iter().filter(|p| p.state == state).cloned().collect())
    }

    pub fn by_direction(&self, direction: PeerDirection) -> Peers {
        Peers(
            self.iter()
                .filter(|p| p.direction == direction)
                .cloned()
                .collect(),
        )
    }

    pub fn by_state_and_direction(&self, state: PeerState, direction: PeerDirection) -> Peers {
        Peers(
            self.iter()
                .filter(|p| p.state == state && p.direction == direction)
                .cloned()
                .collect(),
        )
    }

    pub fn by_agent(&self, agent: Agent) -> Peers {
        Peers(
            self.iter()
                .filter(|p| p.derive_agent() == agent)
                .cloned()
                .collect(),
        )
    }

    /// The number of peers per classified agent.
    pub fn agent_count(&self) -> Vec<(Agent, usize)> {
        Agent::ALL
            .iter()
            .map(|agent| (*agent, self.by_agent(*agent).len()))
            .collect()
    }
}

impl IntoIterator for Peers {
    type Item = Peer;
    type IntoIter = std::vec::IntoIter<Peer>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The payload of `/eth/v1/node/peer_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerCount {
    #[serde(with = "quoted_u64")]
    pub disconnected: u64,
    #[serde(with = "quoted_u64")]
    pub connected: u64,
    #[serde(with = "quoted_u64")]
    pub connecting: u64,
    #[serde(with = "quoted_u64")]
    pub disconnecting: u64,
}
