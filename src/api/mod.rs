pub mod clickup;

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TicketError;
use crate::model::member::Member;
use crate::model::task::{TaskRequest, TaskUpdate};
use crate::translate::resolve_member_ids;

pub const DEFAULT_API_BASE: &str = "https://api.clickup.com/api/v2";

const BODY_PREVIEW_LIMIT: usize = 512;

/// The ClickUp calls a ticket command needs. Every call is a single request.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn create_task(&self, list_id: &str, request: &TaskRequest) -> Result<Value, TicketError>;
    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Value, TicketError>;
    async fn list_members(&self, list_id: &str) -> Result<Vec<Member>, TicketError>;
    async fn upload_attachment(&self, task_id: &str, path: &Path) -> Result<Value, TicketError>;
}

/// Look up the roster of `list_id` and keep the IDs of members named in `names`.
pub async fn get_member_ids_from_names(
    api: &dyn TaskApi,
    list_id: &str,
    names: &[String],
) -> Result<Vec<Value>, TicketError> {
    let roster = api.list_members(list_id).await?;
    let ids = resolve_member_ids(&roster, names);
    if ids.len() < names.len() {
        tracing::warn!(
            list_id,
            requested = names.len(),
            resolved = ids.len(),
            "some assignee names did not match a list member and were skipped"
        );
    }
    Ok(ids)
}

/// Map a ClickUp answer onto the error taxonomy. Only 200 counts as success.
pub fn classify(status: u16, body: &str, target: &str) -> Result<Value, TicketError> {
    match status {
        200 => Ok(serde_json::from_str(body)?),
        401 => Err(TicketError::InvalidCredentials {
            target: target.to_string(),
        }),
        400 => Err(TicketError::BadRequest {
            body: preview_body(body),
        }),
        other => Err(TicketError::UnknownError {
            status: other,
            body: preview_body(body),
        }),
    }
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().count() > BODY_PREVIEW_LIMIT {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
pub mod tests;
