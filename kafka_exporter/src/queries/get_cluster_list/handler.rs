use crate::queries::get_cluster_list::ClusterList;
use crate::upstream::Upstream;
use anyhow::Context;

pub const CLUSTER_LIST_PATH: &str = "/clusterlist";

pub async fn get_cluster_list<U: Upstream>(upstream: &U) -> Result<ClusterList, anyhow::Error> {
    let body = upstream
        .fetch(CLUSTER_LIST_PATH)
        .await
        .context("While fetching cluster list")?;

    let cluster = serde_json::from_str(&body).context("While parsing cluster list")?;

    Ok(cluster)
}
