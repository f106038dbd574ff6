use chrono::{Local, NaiveDate, TimeZone};
use serde_json::Value;

use crate::error::TicketError;
use crate::model::member::Member;
use crate::model::task::{CustomField, TaskRequest, TaskUpdate};
use crate::util::literal::parse_literal;

/// Fields of a create call after CLI parsing, before translation.
#[derive(Debug, Clone, Default)]
pub struct CreateFields {
    pub name: String,
    pub description: String,
    pub status: Option<String>,
    pub priority: Option<u8>,
    pub due_date: Option<String>,
    pub start_date: Option<String>,
    pub time_estimate: Option<u64>,
    pub tags: Option<String>,
    pub custom_json: Option<String>,
}

/// Fields of an update call after CLI parsing, before translation.
#[derive(Debug, Clone, Default)]
pub struct UpdateFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<u8>,
    pub due_date: Option<String>,
    pub time_estimate: Option<u64>,
    pub custom_json: Option<String>,
    pub archived: Option<bool>,
}

/// Convert a `month/day/year` date to epoch seconds at local midnight.
pub fn date_to_epoch_time(text: &str) -> Result<i64, TicketError> {
    let invalid = || TicketError::InvalidDateFormat(text.to_string());
    let trimmed = text.trim();
    // chrono's %Y also takes short years; require all four digits
    let year = trimmed.rsplit('/').next().unwrap_or_default();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").map_err(|_| invalid())?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(invalid)
}

/// Parse a literal list of strings such as `['Jane Doe', 'John Smith']`.
/// A lone string literal counts as a one-element list.
pub fn parse_string_list(flag: &str, input: &str) -> Result<Vec<String>, TicketError> {
    let value = parse_literal(input).map_err(|e| TicketError::malformed(flag, e.to_string()))?;
    let items = match value {
        Value::String(s) => return Ok(vec![s]),
        Value::Array(items) => items,
        other => {
            return Err(TicketError::malformed(
                flag,
                format!("expected a list of strings, got {}", kind_of(&other)),
            ))
        }
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(TicketError::malformed(
                flag,
                format!("list entries must be strings, got {}", kind_of(&other)),
            )),
        })
        .collect()
}

/// Tags are a set: duplicates are dropped, first occurrence wins.
pub fn parse_tags(input: &str) -> Result<Vec<String>, TicketError> {
    let mut tags: Vec<String> = Vec::new();
    for tag in parse_string_list("--tags", input)? {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

/// Accepts `[{'id': ..., 'value': ...}, ...]` or `{'<field id>': <value>, ...}`.
pub fn parse_custom_fields(input: &str) -> Result<Vec<CustomField>, TicketError> {
    const FLAG: &str = "--custom-json";
    let value = parse_literal(input).map_err(|e| TicketError::malformed(FLAG, e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(id, value)| CustomField { id, value })
            .collect()),
        Value::Array(entries) => entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value::<CustomField>(entry).map_err(|e| {
                    TicketError::malformed(FLAG, format!("each entry needs 'id' and 'value': {e}"))
                })
            })
            .collect(),
        other => Err(TicketError::malformed(
            FLAG,
            format!("expected a list or mapping, got {}", kind_of(&other)),
        )),
    }
}

/// IDs of the roster entries whose name is one of `names`, in roster order.
/// Names without a match are dropped.
pub fn resolve_member_ids(roster: &[Member], names: &[String]) -> Vec<Value> {
    roster
        .iter()
        .filter(|m| m.name.as_ref().is_some_and(|n| names.contains(n)))
        .map(|m| m.id.clone())
        .collect()
}

pub fn build_create_request(
    fields: &CreateFields,
    assignees: Vec<Value>,
) -> Result<TaskRequest, TicketError> {
    let custom_fields = fields
        .custom_json
        .as_deref()
        .map(parse_custom_fields)
        .transpose()?
        .filter(|cf| !cf.is_empty());

    Ok(TaskRequest {
        name: fields.name.clone(),
        description: fields.description.clone(),
        assignees,
        tags: fields.tags.as_deref().map(parse_tags).transpose()?.unwrap_or_default(),
        status: fields.status.clone(),
        priority: fields.priority,
        due_date: fields.due_date.as_deref().map(date_to_epoch_time).transpose()?,
        time_estimate: fields.time_estimate,
        start_date: fields.start_date.as_deref().map(date_to_epoch_time).transpose()?,
        notify_all: true,
        check_required_custom_fields: custom_fields.as_ref().map(|_| true),
        custom_fields,
    })
}

pub fn build_update_request(
    fields: &UpdateFields,
    assignees: Option<Vec<Value>>,
) -> Result<TaskUpdate, TicketError> {
    let custom_fields = fields
        .custom_json
        .as_deref()
        .map(parse_custom_fields)
        .transpose()?
        .filter(|cf| !cf.is_empty());

    Ok(TaskUpdate {
        name: fields.name.clone(),
        description: fields.description.clone(),
        assignees,
        status: fields.status.clone(),
        priority: fields.priority,
        due_date: fields.due_date.as_deref().map(date_to_epoch_time).transpose()?,
        time_estimate: fields.time_estimate,
        archived: fields.archived,
        check_required_custom_fields: custom_fields.as_ref().map(|_| true),
        custom_fields,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "None",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
