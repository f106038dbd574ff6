use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockito::{Matcher, Server};
use serde_json::{json, Value};

use super::clickup::ClickUpClient;
use super::{classify, get_member_ids_from_names, TaskApi};
use crate::error::TicketError;
use crate::model::member::Member;
use crate::model::task::{TaskRequest, TaskUpdate};

/// In-memory `TaskApi` that records every call and answers with canned values.
#[derive(Default)]
pub struct FakeApi {
    pub created: Arc<Mutex<Vec<(String, TaskRequest)>>>,
    pub updated: Arc<Mutex<Vec<(String, TaskUpdate)>>>,
    pub uploads: Arc<Mutex<Vec<(String, PathBuf)>>>,
    pub roster: Vec<Member>,
    pub response: Option<Value>,
    pub fail_with_status: Option<u16>,
    pub fail_upload_number: Option<usize>,
    pub fail_roster_with_status: Option<u16>,
}

impl FakeApi {
    pub fn answering(response: Value) -> Self {
        Self {
            response: Some(response),
            ..Default::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_roster(mut self, roster: Vec<Member>) -> Self {
        self.roster = roster;
        self
    }

    pub fn roster_failing(mut self, status: u16) -> Self {
        self.fail_roster_with_status = Some(status);
        self
    }

    pub fn upload_paths(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
    }

    fn answer(&self) -> Result<Value, TicketError> {
        match self.fail_with_status {
            Some(status) => classify(status, "{\"err\":\"nope\"}", "fake"),
            None => Ok(self.response.clone().unwrap_or_else(|| json!({"id": "fake"}))),
        }
    }
}

#[async_trait]
impl TaskApi for FakeApi {
    async fn create_task(&self, list_id: &str, request: &TaskRequest) -> Result<Value, TicketError> {
        self.created
            .lock()
            .unwrap()
            .push((list_id.to_string(), request.clone()));
        self.answer()
    }

    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Value, TicketError> {
        self.updated
            .lock()
            .unwrap()
            .push((task_id.to_string(), update.clone()));
        self.answer()
    }

    async fn list_members(&self, _list_id: &str) -> Result<Vec<Member>, TicketError> {
        match self.fail_roster_with_status {
            Some(status) => classify(status, "{\"err\":\"Team not authorized\"}", "fake")
                .map(|_| Vec::new()),
            None => Ok(self.roster.clone()),
        }
    }

    async fn upload_attachment(&self, task_id: &str, path: &Path) -> Result<Value, TicketError> {
        let count = {
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push((task_id.to_string(), path.to_path_buf()));
            uploads.len()
        };
        if self.fail_upload_number == Some(count) {
            return classify(500, "upload rejected", "fake");
        }
        Ok(json!({"id": format!("att-{count}")}))
    }
}

fn member(id: Value, name: &str) -> Member {
    Member {
        id,
        name: Some(name.to_string()),
    }
}

fn sample_request() -> TaskRequest {
    TaskRequest {
        name: "Vendor feed late".into(),
        description: "Feed arrived after 6am".into(),
        assignees: vec![json!(12)],
        tags: vec!["feeds".into()],
        status: Some("open".into()),
        priority: Some(3),
        due_date: None,
        time_estimate: None,
        start_date: None,
        notify_all: true,
        check_required_custom_fields: None,
        custom_fields: None,
    }
}

#[test]
fn classify_success_returns_body_unchanged() {
    let value = classify(200, r#"{"id":"abc123","name":"x"}"#, "list 1").unwrap();
    assert_eq!(value, json!({"id": "abc123", "name": "x"}));
}

#[test]
fn classify_maps_status_codes() {
    assert!(matches!(
        classify(401, "", "list 1"),
        Err(TicketError::InvalidCredentials { ref target }) if target == "list 1"
    ));
    assert!(matches!(
        classify(400, "missing name", "list 1"),
        Err(TicketError::BadRequest { ref body }) if body == "missing name"
    ));
    assert!(matches!(
        classify(201, "{}", "list 1"),
        Err(TicketError::UnknownError { status: 201, .. })
    ));
    assert!(matches!(
        classify(500, "   ", "list 1"),
        Err(TicketError::UnknownError { ref body, .. }) if body == "<empty body>"
    ));
}

#[test]
fn classify_truncates_long_bodies() {
    let body = "x".repeat(2_000);
    match classify(502, &body, "task t") {
        Err(TicketError::UnknownError { body, .. }) => {
            assert!(body.ends_with("..."));
            assert!(body.len() < 600);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn classify_rejects_non_json_success() {
    assert!(matches!(classify(200, "ok", "t"), Err(TicketError::Json(_))));
}

#[tokio::test]
async fn member_lookup_drops_unknown_names() {
    let api = FakeApi::default().with_roster(vec![
        member(json!(1), "Ada"),
        member(json!(2), "Grace"),
    ]);
    let names = vec!["Grace".to_string(), "Nobody".to_string()];
    let ids = get_member_ids_from_names(&api, "L1", &names).await.unwrap();
    assert_eq!(ids, vec![json!(2)]);

    let none = get_member_ids_from_names(&api, "L1", &["Zed".to_string()]).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn create_task_posts_payload_with_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/list/L1/task")
        .match_header("authorization", "pk_secret")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "name": "Vendor feed late",
            "assignees": [12],
            "tags": ["feeds"],
            "priority": 3,
            "notify_all": true,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"abc123","name":"Vendor feed late"}"#)
        .create_async()
        .await;

    let client = ClickUpClient::new(server.url(), "pk_secret");
    let task = client.create_task("L1", &sample_request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(task, json!({"id": "abc123", "name": "Vendor feed late"}));
}

#[tokio::test]
async fn create_task_unauthorized() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/list/L1/task")
        .with_status(401)
        .with_body(r#"{"err":"Token invalid"}"#)
        .create_async()
        .await;

    let client = ClickUpClient::new(server.url(), "bad");
    let err = client.create_task("L1", &sample_request()).await.unwrap_err();
    assert!(matches!(err, TicketError::InvalidCredentials { .. }));
}

#[tokio::test]
async fn update_task_puts_sparse_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/task/t-9")
        .match_body(Matcher::Json(json!({"description": "done now", "archived": true})))
        .with_status(200)
        .with_body(r#"{"id":"t-9"}"#)
        .create_async()
        .await;

    let client = ClickUpClient::new(format!("{}/", server.url()), "pk");
    let update = TaskUpdate {
        description: Some("done now".into()),
        archived: Some(true),
        ..Default::default()
    };
    let task = client.update_task("t-9", &update).await.unwrap();

    mock.assert_async().await;
    assert_eq!(task["id"], json!("t-9"));
}

#[tokio::test]
async fn update_task_bad_request_keeps_body() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("PUT", "/task/t-9")
        .with_status(400)
        .with_body("Status does not exist")
        .create_async()
        .await;

    let client = ClickUpClient::new(server.url(), "pk");
    let err = client
        .update_task("t-9", &TaskUpdate::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Status does not exist"));
}

#[tokio::test]
async fn list_members_reads_wrapped_roster() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/list/L7/member")
        .match_header("authorization", "pk")
        .with_status(200)
        .with_body(r#"{"members":[{"id":5,"name":"Ada"},{"id":6,"name":"Linus"}]}"#)
        .create_async()
        .await;

    let client = ClickUpClient::new(server.url(), "pk");
    let ids = get_member_ids_from_names(&client, "L7", &["Linus".to_string()])
        .await
        .unwrap();
    assert_eq!(ids, vec![json!(6)]);
}

#[tokio::test]
async fn list_members_unauthorized() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/list/L7/member")
        .with_status(401)
        .with_body(r#"{"err":"Token invalid","ECODE":"OAUTH_025"}"#)
        .create_async()
        .await;

    let client = ClickUpClient::new(server.url(), "bad");
    let err = get_member_ids_from_names(&client, "L7", &["Ada".to_string()])
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, TicketError::InvalidCredentials { .. }));
}

#[tokio::test]
async fn upload_sends_multipart_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    std::fs::write(&path, "a,b\n1,2\n").unwrap();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/task/abc123/attachment")
        .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="attachment"; filename="report.csv""#.into()),
            Matcher::Regex("1,2".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"id":"att-1","title":"report.csv"}"#)
        .create_async()
        .await;

    let client = ClickUpClient::new(server.url(), "pk");
    let body = client.upload_attachment("abc123", &path).await.unwrap();

    mock.assert_async().await;
    assert_eq!(body["title"], json!("report.csv"));
}

#[tokio::test]
async fn upload_of_missing_file_is_io_error() {
    let server = Server::new_async().await;
    let client = ClickUpClient::new(server.url(), "pk");
    let err = client
        .upload_attachment("abc123", Path::new("/definitely/not/here.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, TicketError::Io(_)));
}
