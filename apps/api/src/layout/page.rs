//! Pages and sections: the paginator's output shape.

use serde::{Deserialize, Serialize};

use crate::document::blocks::{BlockId, ContentBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    ResumeFirst,
    ResumeSecond,
    CareerFirst,
    /// Inserted only to host career blocks displaced by overflow.
    CareerContinuation,
    /// The career document's closing template page (qualifications, skills, motivation).
    CareerFixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    History,
    Qualifications,
    Motivation,
    PersonalRequest,
    CareerSummary,
    /// The only growable section: career blocks, one per employer.
    CareerHistory,
    Skills,
    CareerMotivation,
    Closing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub blocks: Vec<ContentBlock>,
}

impl Section {
    pub fn new(kind: SectionKind, title: &str, blocks: Vec<ContentBlock>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            blocks,
        }
    }
}

/// 1-based position of a page within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageNumber {
    pub index: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub kind: PageKind,
    pub sections: Vec<Section>,
    pub number: PageNumber,
    pub label: String,
}

impl Page {
    /// An unnumbered page; `renumber` assigns the position.
    pub fn new(kind: PageKind, sections: Vec<Section>) -> Self {
        Self {
            kind,
            sections,
            number: PageNumber::default(),
            label: String::new(),
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.sections.iter().flat_map(|s| s.blocks.iter())
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.blocks().any(|b| &b.id == id)
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.kind == kind)
    }
}

/// `"{index}/{total}"`
pub fn page_label(index: usize, total: usize) -> String {
    format!("{index}/{total}")
}

/// Recomputes every page's position and label from its place in the slice.
pub fn renumber(pages: &mut [Page]) {
    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        page.number = PageNumber {
            index: i + 1,
            total,
        };
        page.label = page_label(i + 1, total);
    }
}
