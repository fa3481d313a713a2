use crate::utils::null_as_default;
use getset::{CopyGetters, Getters};
use serde::Deserialize;

/// Offsets of one consumer group as reported by KafkaOffsetMonitor.
///
/// Field names are accepted both in PascalCase and in the camelCase the
/// monitor emits. Missing or `null` fields default to zero/empty.
#[derive(Debug, Clone, Default, Deserialize, Getters)]
#[serde(default)]
#[getset(get = "pub")]
pub struct GroupOffsetReport {
    #[serde(rename = "Brokers", alias = "brokers", deserialize_with = "null_as_default")]
    brokers: Vec<BrokerInfo>,
    #[serde(rename = "Offsets", alias = "offsets", deserialize_with = "null_as_default")]
    offsets: Vec<OffsetRecord>,
}

/// Parsed for completeness, never exported.
#[derive(Debug, Clone, Default, Deserialize, Getters, CopyGetters)]
#[serde(default)]
pub struct BrokerInfo {
    #[serde(rename = "Id", alias = "id", deserialize_with = "null_as_default")]
    #[getset(get_copy = "pub")]
    id: i32,
    #[serde(rename = "Host", alias = "host", deserialize_with = "null_as_default")]
    #[getset(get = "pub")]
    host: String,
    #[serde(rename = "Port", alias = "port", deserialize_with = "null_as_default")]
    #[getset(get_copy = "pub")]
    port: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Getters, CopyGetters)]
#[serde(default)]
pub struct OffsetRecord {
    #[serde(rename = "Group", alias = "group", deserialize_with = "null_as_default")]
    #[getset(get = "pub")]
    group: String,
    #[serde(rename = "Topic", alias = "topic", deserialize_with = "null_as_default")]
    #[getset(get = "pub")]
    topic: String,
    #[serde(rename = "Partition", alias = "partition", deserialize_with = "null_as_default")]
    #[getset(get_copy = "pub")]
    partition: i32,
    #[serde(rename = "Offset", alias = "offset", deserialize_with = "null_as_default")]
    #[getset(get_copy = "pub")]
    offset: i64,
    #[serde(rename = "LogSize", alias = "logSize", deserialize_with = "null_as_default")]
    #[getset(get_copy = "pub")]
    log_size: i64,
    #[serde(rename = "Owner", alias = "owner", deserialize_with = "null_as_default")]
    #[getset(get = "pub")]
    owner: String,
    #[serde(rename = "Creation", alias = "creation", deserialize_with = "null_as_default")]
    #[getset(get_copy = "pub")]
    creation: i64,
    #[serde(rename = "Modified", alias = "modified", deserialize_with = "null_as_default")]
    #[getset(get_copy = "pub")]
    modified: i64,
}

impl OffsetRecord {
    /// Log end offset minus committed offset. Negative when the monitor's data
    /// is stale; never clamped.
    pub fn lag(&self) -> i64 {
        self.log_size.saturating_sub(self.offset)
    }
}
