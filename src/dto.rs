use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Todo;

/// A todo item as it travels over the wire.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct TodoDto {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Body accepted by create and update. Any `id` or `created_at` sent by the
/// client is dropped here.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TodoPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Serialize, Deserialize)]
pub struct TodoList {
    pub data: Vec<TodoDto>,
}

#[derive(Serialize, Deserialize)]
pub struct TodoCreated {
    pub message: String,
    pub todo_id: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
    pub error: String,
}

impl From<&Todo> for TodoDto {
    fn from(value: &Todo) -> Self {
        Self {
            id: value.id.to_hex(),
            title: value.title.clone(),
            completed: value.completed,
            created_at: value.created_at,
        }
    }
}

/// Accepts a 24 character hex id, ignoring surrounding whitespace.
pub fn parse_todo_id(raw: &str) -> Option<ObjectId> {
    ObjectId::parse_str(raw.trim()).ok()
}
