//! Workspaces, mappings and mapping reconciliation

pub mod model;
pub mod reconcile;

pub use model::{Mapping, Workspace};
pub use reconcile::{
    are_mappings_different, is_one_level_mapping, mappings_by_server_path, mappings_to_change,
    mappings_to_remove, normalized_server_path, one_level_server_path, plan_update,
    server_path_key, WorkspaceUpdate, ONE_LEVEL_MAPPING_SUFFIX,
};
