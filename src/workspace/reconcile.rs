//! Mapping reconciliation
//!
//! Compares the mappings a workspace has against the mappings it should
//! have, and produces the remove/apply lists the update routine issues as
//! VCS commands. Mappings occupy the same slot when their server paths are
//! equal ignoring case.
//!
//! Server paths come in two flavours: recursive (`$/proj`) and one-level
//! (`$/proj/*`, the folder without its subfolders). The two are distinct
//! slots.

use crate::error::{CacheError, CacheResult};
use crate::workspace::model::{Mapping, Workspace};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

/// Suffix marking a one-level mapping
pub const ONE_LEVEL_MAPPING_SUFFIX: &str = "/*";

/// Slot key for a server path
pub fn server_path_key(server_path: &str) -> String {
    server_path.to_lowercase()
}

/// Index mappings by their slot key
///
/// When two mappings share a slot the later one wins.
pub fn mappings_by_server_path(mappings: &[Mapping]) -> HashMap<String, &Mapping> {
    mappings
        .iter()
        .map(|m| (server_path_key(&m.server_path), m))
        .collect()
}

/// Check whether two mapping lists describe different mappings
///
/// `None` stands for a list that was never loaded. The comparison is
/// order-insensitive; local and server paths must match exactly.
///
/// Each list is expected to hold at most one mapping per slot. When a list
/// repeats a slot, only its last mapping for that slot is compared and the
/// result can depend on argument order.
pub fn are_mappings_different(a: Option<&[Mapping]>, b: Option<&[Mapping]>) -> bool {
    let (a, b) = match (a, b) {
        (None, None) => return false,
        (Some(a), Some(b)) => (a, b),
        _ => return true,
    };

    if std::ptr::eq(a, b) {
        return false;
    }
    if a.len() != b.len() {
        return true;
    }

    let index = mappings_by_server_path(a);
    b.iter().any(|theirs| match index.get(&server_path_key(&theirs.server_path)) {
        None => true,
        Some(ours) => {
            ours.cloaked != theirs.cloaked
                || ours.local_path.as_os_str() != theirs.local_path.as_os_str()
                || ours.server_path != theirs.server_path
        }
    })
}

/// Mappings in `current` whose slot does not exist in `desired`
pub fn mappings_to_remove(current: &[Mapping], desired: &[Mapping]) -> Vec<Mapping> {
    let index = mappings_by_server_path(desired);
    current
        .iter()
        .filter(|m| !index.contains_key(&server_path_key(&m.server_path)))
        .cloned()
        .collect()
}

/// Mappings to apply to turn `current` into `desired`
///
/// Every desired mapping is applied, even one identical to an existing
/// mapping; the apply step is idempotent per mapping.
pub fn mappings_to_change(_current: &[Mapping], desired: &[Mapping]) -> Vec<Mapping> {
    desired.to_vec()
}

/// Whether the server path is a one-level mapping
pub fn is_one_level_mapping(server_path: &str) -> bool {
    server_path.ends_with(ONE_LEVEL_MAPPING_SUFFIX)
}

/// Turn a server path into its one-level form
///
/// Returns the input itself (borrowed) when it is already one-level.
pub fn one_level_server_path(server_path: &str) -> Cow<'_, str> {
    if server_path.is_empty() {
        return Cow::Borrowed(ONE_LEVEL_MAPPING_SUFFIX);
    }
    if is_one_level_mapping(server_path) {
        return Cow::Borrowed(server_path);
    }

    let mut path = server_path.trim_end_matches('/').to_string();
    path.push_str(ONE_LEVEL_MAPPING_SUFFIX);
    Cow::Owned(path)
}

/// Lower-case a server path, turning a trailing `/*` into `/`
pub fn normalized_server_path(server_path: &str) -> CacheResult<String> {
    if server_path.is_empty() {
        return Err(CacheError::EmptyArgument("server_path"));
    }

    let path = if is_one_level_mapping(server_path) {
        &server_path[..server_path.len() - 1]
    } else {
        server_path
    };
    Ok(path.to_lowercase())
}

/// Commands needed to bring a workspace from its current to its desired state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceUpdate {
    /// Name the workspace is currently registered under
    pub workspace: String,

    /// Mappings to delete, issued first
    pub to_remove: Vec<Mapping>,

    /// Mappings to set, issued after the removals
    pub to_change: Vec<Mapping>,

    /// Name after the update
    pub new_name: String,

    /// Comment after the update
    pub new_comment: String,
}

impl WorkspaceUpdate {
    /// Whether the plan leaves mappings alone
    pub fn leaves_mappings(&self) -> bool {
        self.to_remove.is_empty() && self.to_change.is_empty()
    }
}

/// Plan the update from `current` to `desired`
///
/// Mapping commands are only planned when the mapping sets differ. The
/// property update (name and comment) is always part of the plan.
pub fn plan_update(current: &Workspace, desired: &Workspace) -> WorkspaceUpdate {
    let (to_remove, to_change) = if current.mappings_differ(desired) {
        (
            mappings_to_remove(&current.mappings, &desired.mappings),
            mappings_to_change(&current.mappings, &desired.mappings),
        )
    } else {
        (vec![], vec![])
    };

    debug!(
        "Planned update of workspace {}: {} removal(s), {} change(s)",
        current.name,
        to_remove.len(),
        to_change.len()
    );

    WorkspaceUpdate {
        workspace: current.name.clone(),
        to_remove,
        to_change,
        new_name: desired.name.clone(),
        new_comment: desired.comment.clone(),
    }
}

impl Workspace {
    /// Check whether this workspace's mappings differ from another's
    pub fn mappings_differ(&self, other: &Workspace) -> bool {
        are_mappings_different(
            Some(self.mappings.as_slice()),
            Some(other.mappings.as_slice()),
        )
    }
}
