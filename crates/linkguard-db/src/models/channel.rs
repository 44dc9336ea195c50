//! Channel document model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Channel configuration as stored in the `document` column.
///
/// Field names follow the stored documents. Documents written by older
/// versions may lack fields; those take the defaults a new channel gets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDocument {
    pub name: String,
    #[serde(default = "default_true")]
    pub slash: bool,
    #[serde(default = "default_true")]
    pub dot: bool,
    #[serde(default = "default_true")]
    pub subdomains: bool,
    #[serde(default = "default_userlevel")]
    pub userlevel: String,
    #[serde(default = "default_reply")]
    pub reply: String,
    #[serde(default)]
    pub allow_list: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_userlevel() -> String {
    "VIP".to_string()
}

fn default_reply() -> String {
    "default".to_string()
}

/// Database row for the channels table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelRow {
    pub name: String,
    pub document: Json<ChannelDocument>,
    pub updated_at: DateTime<Utc>,
}
