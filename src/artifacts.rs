use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::TicketError;
use crate::model::task::Operation;

/// The artifacts tree: `<root>/responses/` holds one JSON file per ticket call.
#[derive(Debug, Clone)]
pub struct ArtifactFolders {
    root: PathBuf,
    responses: PathBuf,
}

impl ArtifactFolders {
    /// Create the folder tree. Called once, at process start.
    pub fn prepare(root: impl Into<PathBuf>) -> Result<Self, TicketError> {
        let root = root.into();
        let responses = root.join("responses");
        std::fs::create_dir_all(&responses)?;
        tracing::debug!(root = %root.display(), "artifact folders ready");
        Ok(Self { root, responses })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn responses(&self) -> &Path {
        &self.responses
    }

    /// Where the response for `task_id` goes. The id ends up in a file name, so
    /// anything that could leave `responses/` is refused.
    pub fn response_path(
        &self,
        operation: Operation,
        task_id: &str,
    ) -> Result<PathBuf, TicketError> {
        if task_id.is_empty()
            || task_id == "."
            || task_id == ".."
            || task_id.contains(['/', '\\', '\0'])
        {
            return Err(TicketError::InvalidTaskId(task_id.to_string()));
        }
        Ok(self
            .responses
            .join(format!("{operation}_ticket_{task_id}_response.json")))
    }

    pub fn write_response(
        &self,
        operation: Operation,
        task_id: &str,
        response: &Value,
    ) -> Result<PathBuf, TicketError> {
        let path = self.response_path(operation, task_id)?;
        let json = serde_json::to_string_pretty(response)?;
        std::fs::write(&path, json)?;
        tracing::info!(path = %path.display(), "saved ticket response");
        Ok(path)
    }
}
