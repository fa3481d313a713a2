//! Text exposition of the collected offsets.

use crate::queries::get_cluster_list::ClusterNode;
use crate::queries::get_group_offsets::OffsetRecord;

pub const NAMESPACE: &str = "kafka";

/// Decimal exponents at or above this are written in exponent form.
const GENERAL_FORMAT_PRECISION: i32 = 6;

/// Appends the offset, log size and lag lines of one partition.
pub fn write_offset_record(exposition: &mut String, record: &OffsetRecord) {
    let labels = format!(
        "group=\"{}\",topic=\"{}\",partition=\"{}\"",
        record.group(),
        record.topic(),
        record.partition()
    );

    let samples = [
        ("offset", record.offset() as f64),
        ("log_size", record.log_size() as f64),
        ("lag", record.lag() as f64),
    ];
    for (metric, value) in samples {
        exposition.push_str(&format!(
            "{NAMESPACE}_{metric}{{{labels}}} {}\n",
            format_general(value)
        ));
    }
}

/// Appends the presence line of one broker node. Nodes without a
/// `host:port` name are skipped and reported as `false`.
pub fn write_cluster_node(exposition: &mut String, node: &ClusterNode) -> bool {
    let Some(address) = node.address() else {
        return false;
    };

    exposition.push_str(&format!(
        "{NAMESPACE}_node{{addr=\"{}\",kafakaip=\"{}\",port=\"{}\"}} 1\n",
        node.name(),
        address.host,
        address.port
    ));
    true
}

/// Shortest representation of `value`, switching to `d.ddde+XX` when the
/// decimal exponent is below -4 or at least 6.
pub fn format_general(value: f64) -> String {
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if (-4..GENERAL_FORMAT_PRECISION).contains(&exponent) {
        return format!("{value}");
    }

    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}
