use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// Which half of the résumé history table an entry belongs to.
///
/// Serialised with the labels the résumé form itself uses so that bundles
/// exported by earlier versions of the app import unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryKind {
    #[serde(rename = "学歴", alias = "education", alias = "EDUCATION")]
    Education,
    #[serde(rename = "職歴", alias = "work", alias = "WORK")]
    Work,
}

/// One education or work row on the résumé.
///
/// `year == 0` and `month == 0` mean "unset" and print as blank cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub year: i32,
    #[serde(default, deserialize_with = "lenient::int")]
    pub month: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    /// Position within the entry's type group. Unique per group, not necessarily contiguous.
    #[serde(default, deserialize_with = "lenient::int")]
    pub order: i32,
}
