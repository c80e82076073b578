//! Mode A pagination: fixed / grow-to-fit row capacities, no measurement.
//!
//! Pure and synchronous. The same input always yields the same pages, so the
//! preview endpoint can call it on every edit and the export pipeline can use
//! it as the first pass before overflow correction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::blocks::ContentBlock;
use crate::document::builder::{
    build_career_blocks, build_career_motivation, build_career_summary, build_closing,
    build_history_rows, build_motivation_blocks, build_personal_request,
    build_qualification_rows, build_skill_blocks,
};
use crate::document::header::{career_header, resume_header, submission_date, DocumentHeader};
use crate::document::labels::{
    CAREER_HISTORY_TITLE, CAREER_MOTIVATION_TITLE, CAREER_SUMMARY_TITLE, HISTORY_TABLE_TITLE,
    MOTIVATION_TITLE, PERSONAL_REQUEST_TITLE, QUALIFICATIONS_TITLE, QUALIFICATION_TABLE_TITLE,
    SKILLS_TITLE,
};
use crate::layout::capacity::{CapacityPlan, RowCapacityStrategy};
use crate::layout::page::{renumber, Page, PageKind, Section, SectionKind};
use crate::models::{
    ApplicationProfile, CareerEntry, HistoryEntry, PaginationOptions, Profile, QualificationEntry,
};

const HISTORY_FILLER: &str = "history-filler";
const QUALIFICATION_FILLER: &str = "qualification-filler";

/// A read-only snapshot of everything one document set is built from.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub profile: Profile,
    pub history: Vec<HistoryEntry>,
    pub career: Vec<CareerEntry>,
    pub qualifications: Vec<QualificationEntry>,
    pub application: Option<ApplicationProfile>,
    pub options: PaginationOptions,
    /// Fallback for the submission date when the application has none.
    pub today: NaiveDate,
}

impl DocumentInput {
    pub fn as_of(&self) -> NaiveDate {
        submission_date(self.application.as_ref(), self.today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedDocument {
    pub header: DocumentHeader,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedDocuments {
    pub resume: PaginatedDocument,
    pub career: PaginatedDocument,
}

/// Paginates both documents. Each is numbered on its own (`1/2`, `2/2`).
pub fn paginate(input: &DocumentInput) -> PaginatedDocuments {
    PaginatedDocuments {
        resume: paginate_resume(input),
        career: paginate_career(input),
    }
}

/// Two résumé pages: the history table split across both, then qualifications,
/// motivation and the personal-request box on page 2.
pub fn paginate_resume(input: &DocumentInput) -> PaginatedDocument {
    let plan = CapacityPlan::from_options(&input.options);
    let history = build_history_rows(&input.history, input.options.auto_markers);
    let qualifications = build_qualification_rows(&input.qualifications);
    let app = input.application.as_ref();

    let (page1_rows, page2_rows) = split_history(history, &plan);

    let qualification_rows = pad_to_capacity(
        qualifications,
        plan.qualifications.as_ref(),
        QUALIFICATION_FILLER,
        &mut 0,
    );

    let mut pages = vec![
        Page::new(
            PageKind::ResumeFirst,
            vec![Section::new(SectionKind::History, HISTORY_TABLE_TITLE, page1_rows)],
        ),
        Page::new(
            PageKind::ResumeSecond,
            vec![
                Section::new(SectionKind::History, HISTORY_TABLE_TITLE, page2_rows),
                Section::new(
                    SectionKind::Qualifications,
                    QUALIFICATION_TABLE_TITLE,
                    qualification_rows,
                ),
                Section::new(
                    SectionKind::Motivation,
                    MOTIVATION_TITLE,
                    build_motivation_blocks(app),
                ),
                Section::new(
                    SectionKind::PersonalRequest,
                    PERSONAL_REQUEST_TITLE,
                    vec![build_personal_request(app)],
                ),
            ],
        ),
    ];
    renumber(&mut pages);

    PaginatedDocument {
        header: resume_header(&input.profile, input.as_of()),
        pages,
    }
}

/// Two career pages: every career block on page 1, the fixed template on page 2.
pub fn paginate_career(input: &DocumentInput) -> PaginatedDocument {
    let app = input.application.as_ref();

    let first = Page::new(
        PageKind::CareerFirst,
        vec![
            Section::new(
                SectionKind::CareerSummary,
                CAREER_SUMMARY_TITLE,
                vec![build_career_summary(app)],
            ),
            Section::new(
                SectionKind::CareerHistory,
                CAREER_HISTORY_TITLE,
                build_career_blocks(&input.career),
            ),
        ],
    );

    let mut fixed_sections = vec![Section::new(
        SectionKind::Qualifications,
        QUALIFICATIONS_TITLE,
        build_qualification_rows(&input.qualifications),
    )];
    let skills = build_skill_blocks(app);
    if !skills.is_empty() {
        fixed_sections.push(Section::new(SectionKind::Skills, SKILLS_TITLE, skills));
    }
    if let Some(motivation) = build_career_motivation(app) {
        fixed_sections.push(Section::new(
            SectionKind::CareerMotivation,
            CAREER_MOTIVATION_TITLE,
            vec![motivation],
        ));
    }
    fixed_sections.push(Section::new(SectionKind::Closing, "", vec![build_closing()]));

    let mut pages = vec![first, Page::new(PageKind::CareerFixed, fixed_sections)];
    renumber(&mut pages);

    PaginatedDocument {
        header: career_header(&input.profile, input.as_of()),
        pages,
    }
}

/// Page 1 takes up to its capacity; page 2 takes everything left, so no row is dropped.
fn split_history(
    mut rows: Vec<ContentBlock>,
    plan: &CapacityPlan,
) -> (Vec<ContentBlock>, Vec<ContentBlock>) {
    let total = rows.len();
    let page1_capacity = plan.page1_history.capacity(total);
    let rest = rows.split_off(page1_capacity.min(total));

    debug!(
        total,
        page1_capacity,
        spilled = rest.len(),
        "Splitting history rows"
    );

    let mut fillers = 0;
    let page1 = pad_to(rows, page1_capacity, HISTORY_FILLER, &mut fillers);
    let page2 = pad_to_capacity(rest, plan.page2_history.as_ref(), HISTORY_FILLER, &mut fillers);
    (page1, page2)
}

fn pad_to_capacity(
    blocks: Vec<ContentBlock>,
    strategy: &dyn RowCapacityStrategy,
    family: &str,
    next_filler: &mut usize,
) -> Vec<ContentBlock> {
    let capacity = strategy.capacity(blocks.len());
    pad_to(blocks, capacity, family, next_filler)
}

/// Appends blank rows up to `capacity`. Filler ids keep counting across calls
/// that share `next_filler`, so they stay unique within a document.
fn pad_to(
    mut blocks: Vec<ContentBlock>,
    capacity: usize,
    family: &str,
    next_filler: &mut usize,
) -> Vec<ContentBlock> {
    while blocks.len() < capacity {
        blocks.push(ContentBlock::filler(family, *next_filler));
        *next_filler += 1;
    }
    blocks
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
