//! Content blocks: the smallest units the paginator places on a page.
//!
//! A block carries everything needed to render it on its own. Blocks are
//! rebuilt for every paginate call and identified by a `BlockId` that is unique
//! within one document and stable across calls with the same input, so a
//! renderer can report geometry per block and Mode A stays idempotent.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(family: &str, index: usize) -> Self {
        Self(format!("{family}-{index}"))
    }

    pub fn named(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a history-table row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRole {
    Entry,
    Header,
    Separator,
    /// "現在に至る": the applicant is still employed.
    PresentMarker,
    /// "以上": closes the table.
    EndMarker,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryRow {
    pub year: String,
    pub month: String,
    pub content: String,
    pub role: RowRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualificationRow {
    pub year: String,
    pub month: String,
    pub content: String,
    /// "取得" (obtained) or "修了" (completed), shown on the career document.
    pub status: String,
}

/// One employer's complete sub-layout on the career document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CareerBlock {
    /// "2019年04月～現在"
    pub period: String,
    /// Company name, or the dispatch agency / destination pair.
    pub heading: String,
    /// Business, capital/revenue and headcount/listing lines; empty lines omitted.
    pub company_details: Vec<String>,
    pub position: String,
    pub employment_type: String,
    pub department: String,
    pub duties: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextBlock {
    pub label: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillBlock {
    pub marker: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockBody {
    HistoryRow(HistoryRow),
    QualificationRow(QualificationRow),
    CareerBlock(CareerBlock),
    Text(TextBlock),
    Skill(SkillBlock),
    /// Closing "以上" of the career document.
    Closing { label: String },
    /// Blank padding row; never counted as content.
    Filler,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: BlockId,
    #[serde(flatten)]
    pub body: BlockBody,
}

impl ContentBlock {
    pub fn new(id: BlockId, body: BlockBody) -> Self {
        Self { id, body }
    }

    pub fn filler(family: &str, index: usize) -> Self {
        Self::new(BlockId::new(family, index), BlockBody::Filler)
    }

    pub fn is_filler(&self) -> bool {
        matches!(self.body, BlockBody::Filler)
    }

    /// True for history/qualification rows that carry applicant data (not headers or markers).
    pub fn is_data_row(&self) -> bool {
        match &self.body {
            BlockBody::HistoryRow(row) => row.role == RowRole::Entry,
            BlockBody::QualificationRow(_) => true,
            _ => false,
        }
    }
}
