use crate::queries::get_group_offsets::GroupOffsetReport;
use crate::upstream::Upstream;
use anyhow::Context;

pub fn group_path(group: &str) -> String {
    format!("/group/{group}")
}

pub async fn get_group_offsets<U: Upstream>(
    upstream: &U,
    group: &str,
) -> Result<GroupOffsetReport, anyhow::Error> {
    let body = upstream
        .fetch(&group_path(group))
        .await
        .with_context(|| format!("While fetching offsets of group {group}"))?;

    let report = serde_json::from_str(&body)
        .with_context(|| format!("While parsing offsets of group {group}"))?;

    Ok(report)
}
