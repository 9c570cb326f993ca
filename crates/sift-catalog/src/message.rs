//! Message inbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sift::{Dir, Record, Sentinels, ViewConfig};

/// A message in the inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[field(id)]
    pub id: String,

    #[field(Text)]
    pub sender: String,

    #[field(Text)]
    pub subject: String,

    #[field(Text)]
    #[serde(default)]
    pub preview: String,

    #[field(Enum)]
    pub folder: String,

    #[field(Enum)]
    #[serde(default)]
    pub labels: Vec<String>,

    #[field(Enum)]
    pub read: bool,

    #[field(Date, rename = "receivedAt")]
    pub received_at: DateTime<Utc>,

    #[serde(default)]
    pub attachments: Vec<String>,
}

/// The inbox: newest first.
pub fn view_config() -> ViewConfig {
    ViewConfig::default()
        .with_searchable([Message::SENDER, Message::SUBJECT, Message::PREVIEW])
        .with_facets([Message::FOLDER, Message::LABELS, Message::READ])
        .with_sentinels(Sentinels::new(["all", "All Messages", "All Folders"]))
        .with_page_size(25)
        .with_default_sort(Message::RECEIVED_AT, Dir::Desc)
}
