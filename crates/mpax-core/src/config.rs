use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Size of the in-flight instance window.
    pub max_instances: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self { max_instances: 1024 }
    }
}
