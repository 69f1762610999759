use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of the cluster a reconciliation run targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub runtime_id: String,
}

/// A component configured for reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "component")]
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub configuration: BTreeMap<String, serde_json::Value>,
}

impl Component {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            version: None,
            url: None,
            configuration: BTreeMap::new(),
        }
    }
}

/// Target component configuration of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfiguration {
    pub config_id: i64,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl ClusterConfiguration {
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Read-only snapshot of a cluster and its configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterState {
    pub cluster: Cluster,
    pub configuration: ClusterConfiguration,
}

impl ClusterState {
    pub fn runtime_id(&self) -> &str {
        &self.cluster.runtime_id
    }

    /// Look up a configured component by name
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.configuration.component(name)
    }
}
