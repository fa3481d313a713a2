use crate::utils::null_as_default;
use getset::Getters;
use serde::Deserialize;

/// Cluster topology document of KafkaOffsetMonitor.
#[derive(Debug, Clone, Default, Deserialize, Getters)]
#[serde(default)]
#[getset(get = "pub")]
pub struct ClusterList {
    #[serde(rename = "Name", alias = "name", deserialize_with = "null_as_default")]
    name: String,
    #[serde(rename = "Children", alias = "children", deserialize_with = "null_as_default")]
    children: Vec<ClusterNode>,
}

#[derive(Debug, Clone, Default, Deserialize, Getters)]
#[serde(default)]
#[getset(get = "pub")]
pub struct ClusterNode {
    #[serde(rename = "Name", alias = "name", deserialize_with = "null_as_default")]
    name: String,
    #[serde(rename = "Children", alias = "children", deserialize_with = "null_as_default")]
    children: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAddress<'a> {
    pub host: &'a str,
    pub port: &'a str,
}

impl ClusterNode {
    /// Splits `host:port`. Names with any other number of colon separated
    /// tokens are not broker addresses.
    pub fn address(&self) -> Option<NodeAddress<'_>> {
        let mut tokens = self.name.split(':');
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(host), Some(port), None) => Some(NodeAddress { host, port }),
            _ => None,
        }
    }
}
