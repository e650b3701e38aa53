use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A todo item as it is stored in the `todo` collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "createdAt", with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Builds a fresh, not yet completed item. The creation time is taken at
    /// millisecond precision, which is what a BSON date can hold.
    pub fn new(title: String) -> Self {
        Self {
            id: ObjectId::new(),
            title,
            completed: false,
            created_at: bson::DateTime::now().to_chrono(),
        }
    }
}
