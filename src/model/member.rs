use serde::Deserialize;
use serde_json::Value;

/// An entry of a list's member roster. The id is kept exactly as ClickUp sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Member {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /list/{list_id}/member` has been seen both wrapped and bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Roster {
    Wrapped { members: Vec<Member> },
    Bare(Vec<Member>),
}

impl Roster {
    pub fn into_members(self) -> Vec<Member> {
        match self {
            Roster::Wrapped { members } => members,
            Roster::Bare(members) => members,
        }
    }
}
