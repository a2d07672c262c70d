//! Workspace and mapping records
//!
//! These are the shapes the command layer hands us after parsing the VCS
//! client's output. They serialize to TOML so workspaces can be described in
//! files for the CLI.

use crate::error::{CacheError, CacheResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// A binding of a server path to a local directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Server path, optionally ending in `/*` for a one-level mapping
    pub server_path: String,

    /// Local directory the server path is bound to
    pub local_path: PathBuf,

    /// Excluded from sync even though an enclosing mapping covers it
    #[serde(default)]
    pub cloaked: bool,
}

impl Mapping {
    /// Create a new mapping
    pub fn new(server_path: impl Into<String>, local_path: impl Into<PathBuf>, cloaked: bool) -> Self {
        Self {
            server_path: server_path.into(),
            local_path: local_path.into(),
            cloaked,
        }
    }
}

/// A named collection of mappings plus identity metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    /// Server URL the workspace lives on
    pub server: String,

    /// Workspace name
    pub name: String,

    /// Computer the workspace is registered to
    pub computer: String,

    /// Workspace owner
    pub owner: String,

    /// Free-form comment
    pub comment: String,

    /// Mappings in server order
    pub mappings: Vec<Mapping>,
}

impl Workspace {
    /// Create a new workspace
    pub fn new(
        server: impl Into<String>,
        name: impl Into<String>,
        computer: impl Into<String>,
        owner: impl Into<String>,
        comment: impl Into<String>,
        mappings: Vec<Mapping>,
    ) -> Self {
        Self {
            server: server.into(),
            name: name.into(),
            computer: computer.into(),
            owner: owner.into(),
            comment: comment.into(),
            mappings,
        }
    }

    /// Check that the workspace can be saved
    pub fn validate(&self) -> CacheResult<()> {
        if self.name.is_empty() {
            return Err(CacheError::WorkspaceInvalid {
                field: "name",
                reason: "name must not be empty".to_string(),
            });
        }
        if self.mappings.is_empty() {
            return Err(CacheError::WorkspaceInvalid {
                field: "mappings",
                reason: "at least one mapping is required".to_string(),
            });
        }
        Ok(())
    }

    /// Parse a workspace from TOML
    pub fn from_toml_str(content: &str) -> CacheResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a workspace description from a TOML file
    pub async fn load(path: &Path) -> CacheResult<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            CacheError::io(format!("reading workspace file {}", path.display()), e)
        })?;

        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
        server = "https://dev.example.com/tfs"
        name = "ws1"
        owner = "alice"

        [[mappings]]
        server_path = "$/proj"
        local_path = "/ws/proj"

        [[mappings]]
        server_path = "$/proj/bin"
        local_path = "/ws/proj/bin"
        cloaked = true
    "#;

    #[test]
    fn workspace_parses_partial_toml() {
        let ws = Workspace::from_toml_str(SAMPLE).unwrap();

        assert_eq!(ws.name, "ws1");
        assert_eq!(ws.computer, "");
        assert_eq!(ws.mappings.len(), 2);
        assert!(!ws.mappings[0].cloaked);
        assert!(ws.mappings[1].cloaked);
        assert_eq!(ws.mappings[1].local_path, PathBuf::from("/ws/proj/bin"));
    }

    #[test]
    fn validate_requires_name() {
        let ws = Workspace::new("s", "", "c", "o", "", vec![Mapping::new("$/a", "/a", false)]);
        let err = ws.validate().unwrap_err();
        assert!(matches!(err, CacheError::WorkspaceInvalid { field: "name", .. }));
    }

    #[test]
    fn validate_requires_mappings() {
        let ws = Workspace::new("s", "ws", "c", "o", "", vec![]);
        let err = ws.validate().unwrap_err();
        assert!(matches!(err, CacheError::WorkspaceInvalid { field: "mappings", .. }));
    }

    #[test]
    fn validate_accepts_complete_workspace() {
        let ws = Workspace::from_toml_str(SAMPLE).unwrap();
        assert!(ws.validate().is_ok());
    }

    #[test]
    fn invalid_toml_is_reported() {
        let err = Workspace::from_toml_str("mappings = 3").unwrap_err();
        assert!(matches!(err, CacheError::TomlParse(_)));
    }

    #[tokio::test]
    async fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ws.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let ws = Workspace::load(&path).await.unwrap();
        assert_eq!(ws.owner, "alice");
    }

    #[tokio::test]
    async fn load_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = Workspace::load(&temp.path().join("missing.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }
}
