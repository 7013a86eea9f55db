//! Domain types exchanged with the users backend.
//!
//! A [`Record`] is the single entity this client manages. The list endpoint is
//! tolerated in several shapes, see [`ListPayload`].

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Backend-assigned identifier.
pub type RecordId = i64;

/// A user record as served by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
}

impl Record {
    /// Uppercased first letter of the name, `U` when the name is empty.
    pub fn initial(&self) -> char {
        self.name
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
    }
}

/// The editable subset of a record, as sent on create and update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    pub name: String,
    pub email: String,
    pub phone: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response body of the list endpoint.
///
/// Accepts a bare array, a paged envelope (`{"content": [...]}`) and the
/// backend's response wrapper (`{"data": ...}`), where `data` may itself be
/// either of the former. Anything else normalizes to an empty list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload {
    Records(Vec<Record>),
    Page { content: Vec<Record> },
    Envelope { data: Box<ListPayload> },
    Unrecognized(IgnoredAny),
}

impl ListPayload {
    /// Flatten into the ordered record sequence.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            ListPayload::Records(records) => records,
            ListPayload::Page { content } => content,
            ListPayload::Envelope { data } => data.into_records(),
            ListPayload::Unrecognized(_) => Vec::new(),
        }
    }
}

/// Single-record response body: bare record or wrapped under `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordPayload {
    Envelope { data: Record },
    Bare(Record),
}

/// Decode a create/update response body. Returns `None` for empty bodies and
/// bodies that carry no persisted record.
pub fn decode_record(body: &[u8]) -> Option<Record> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    let record = match serde_json::from_slice::<RecordPayload>(body).ok()? {
        RecordPayload::Envelope { data } => data,
        RecordPayload::Bare(record) => record,
    };
    record.id.is_some().then_some(record)
}
