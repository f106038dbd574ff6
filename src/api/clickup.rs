use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, info};

use super::{classify, TaskApi};
use crate::error::TicketError;
use crate::model::member::{Member, Roster};
use crate::model::task::{TaskRequest, TaskUpdate};

pub struct ClickUpClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl ClickUpClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn finish(&self, resp: reqwest::Response, target: &str) -> Result<Value, TicketError> {
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        debug!(status, scope = target, bytes = body.len(), "ClickUp response");
        classify(status, &body, target)
    }
}

#[async_trait]
impl TaskApi for ClickUpClient {
    async fn create_task(&self, list_id: &str, request: &TaskRequest) -> Result<Value, TicketError> {
        let url = format!("{}/list/{list_id}/task", self.base_url);
        debug!(%url, "creating task");
        let resp = self
            .client
            .post(&url)
            .header("Authorization", &self.token)
            .json(request)
            .send()
            .await?;
        let task = self.finish(resp, &format!("list {list_id}")).await?;
        info!(list_id, task_id = ?task.get("id"), "task created");
        Ok(task)
    }

    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Value, TicketError> {
        let url = format!("{}/task/{task_id}", self.base_url);
        debug!(%url, "updating task");
        let resp = self
            .client
            .put(&url)
            .header("Authorization", &self.token)
            .json(update)
            .send()
            .await?;
        let task = self.finish(resp, &format!("task {task_id}")).await?;
        info!(task_id, "task updated");
        Ok(task)
    }

    async fn list_members(&self, list_id: &str) -> Result<Vec<Member>, TicketError> {
        let url = format!("{}/list/{list_id}/member", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", &self.token)
            .send()
            .await?;
        let body = self.finish(resp, &format!("list {list_id}")).await?;
        let roster: Roster = serde_json::from_value(body)?;
        Ok(roster.into_members())
    }

    async fn upload_attachment(&self, task_id: &str, path: &Path) -> Result<Value, TicketError> {
        let url = format!("{}/task/{task_id}/attachment", self.base_url);
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        let form = Form::new().part("attachment", Part::bytes(bytes).file_name(file_name));

        let resp = self
            .client
            .post(&url)
            .header("Authorization", &self.token)
            .multipart(form)
            .send()
            .await?;
        let body = self.finish(resp, &format!("task {task_id}")).await?;
        info!(task_id, path = %path.display(), "attachment uploaded");
        Ok(body)
    }
}
