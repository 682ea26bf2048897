//! End-user configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration for one upstream beacon node. This is the part end users
/// drive; code-level tunables live in [`crate::Options`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Human-readable name of the node, used as a metrics label.
    pub name: String,
    /// Address of the node, e.g. `http://localhost:5052`.
    pub addr: String,
    /// Extra headers to send with every upstream request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Config {
    pub fn new(name: impl Into<String>, addr: impl Into<String>) -> Config {
        Config {
            name: name.into(),
            addr: addr.into(),
            headers: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_optional_headers() {
        let config: Config = serde_json::from_str(
            r#"{"name": "local", "addr": "http://localhost:5052"}"#,
        )
        .unwrap();

        assert_eq!(config.name, "local");
        assert!(config.headers.is_empty());

        let config: Config = serde_json::from_str(
            r#"{"name": "local", "addr": "http://localhost:5052", "headers": {"Authorization": "Bearer x"}}"#,
        )
        .unwrap();
        assert_eq!(config.headers.len(), 1);
    }
}
