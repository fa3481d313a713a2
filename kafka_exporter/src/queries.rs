pub mod get_cluster_list;
pub mod get_group_offsets;
pub mod list_groups;
