use crate::exposition::{write_cluster_node, write_offset_record};
use crate::queries::get_cluster_list::get_cluster_list;
use crate::queries::get_group_offsets::get_group_offsets;
use crate::queries::list_groups::list_groups;
use crate::upstream::Upstream;
use tracing::{info, warn};

/// Collects one exposition from the monitor: group list, offsets of every
/// group, then the cluster topology.
pub struct Aggregator<U> {
    upstream: U,
}

impl<U: Upstream> Aggregator<U> {
    pub fn new(upstream: U) -> Self {
        Self { upstream }
    }

    /// Never fails. Failed groups and a failed cluster list are left out; a
    /// failed group list yields an empty exposition without asking for the
    /// cluster list.
    #[tracing::instrument(skip_all)]
    pub async fn collect(&self) -> String {
        let mut exposition = String::new();

        let groups = match list_groups(&self.upstream).await {
            Ok(groups) => groups,
            Err(e) => {
                warn!("Group discovery failed, exposition will be empty\n{e:?}");
                return exposition;
            }
        };

        let mut collected_groups = 0;
        for group in &groups {
            let report = match get_group_offsets(&self.upstream, group).await {
                Ok(report) => report,
                Err(e) => {
                    warn!("Skipping group {group}\n{e:?}");
                    continue;
                }
            };

            for record in report.offsets() {
                write_offset_record(&mut exposition, record);
            }
            collected_groups += 1;
        }

        let mut nodes = 0;
        match get_cluster_list(&self.upstream).await {
            Ok(cluster) => {
                nodes = cluster
                    .children()
                    .iter()
                    .filter(|node| write_cluster_node(&mut exposition, node))
                    .count();
            }
            Err(e) => warn!("Skipping cluster topology\n{e:?}"),
        }

        info!(
            "Collected {collected_groups} of {} groups and {nodes} cluster nodes",
            groups.len()
        );
        exposition
    }
}
