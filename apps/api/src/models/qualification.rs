use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// A licence or certification, listed on both documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualificationEntry {
    #[serde(default, deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub year: i32,
    #[serde(default, deserialize_with = "lenient::int")]
    pub month: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub order: i32,
}
