use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::document::labels::{
    age_on, format_date_compact, format_date_for_file, format_date_spaced, CAREER_TITLE,
    RESUME_TITLE,
};
use crate::models::{ApplicationProfile, Profile};

/// Which documents an export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    Career,
    /// Résumé followed by the career history document.
    Both,
}

impl DocumentKind {
    pub fn includes_resume(self) -> bool {
        matches!(self, DocumentKind::Resume | DocumentKind::Both)
    }

    pub fn includes_career(self) -> bool {
        matches!(self, DocumentKind::Career | DocumentKind::Both)
    }

    fn file_suffix(self) -> &'static str {
        match self {
            DocumentKind::Resume => "履歴書",
            DocumentKind::Career => "職務経歴書",
            DocumentKind::Both => "履歴書_職務経歴書",
        }
    }

    /// Stands in for the applicant's name when the profile has none.
    fn fallback_name(self) -> &'static str {
        match self {
            DocumentKind::Resume => "履歴書",
            DocumentKind::Career => "職務経歴書",
            DocumentKind::Both => "書類",
        }
    }
}

/// Everything printed above the first section of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHeader {
    pub title: String,
    /// "2024年 04月 01日現在"
    pub date_label: String,
    pub name: String,
    pub name_kana: String,
    /// Age on the submission date; `None` without a birth date.
    pub age: Option<u32>,
    pub photo: Option<String>,
}

/// The date a document set is "as of": the application's submission date, else `today`.
pub fn submission_date(application: Option<&ApplicationProfile>, today: NaiveDate) -> NaiveDate {
    application
        .and_then(|a| a.submission_date)
        .unwrap_or(today)
}

pub fn resume_header(profile: &Profile, on: NaiveDate) -> DocumentHeader {
    DocumentHeader {
        title: RESUME_TITLE.to_string(),
        date_label: format!("{}現在", format_date_spaced(on)),
        name: profile.name.clone(),
        name_kana: profile.name_kana.clone(),
        age: profile.birth_date.map(|birth| age_on(birth, on)),
        photo: profile.visible_photo().map(str::to_string),
    }
}

/// The career document prints no photo and no age.
pub fn career_header(profile: &Profile, on: NaiveDate) -> DocumentHeader {
    DocumentHeader {
        title: CAREER_TITLE.to_string(),
        date_label: format!("{}現在", format_date_compact(on)),
        name: profile.name.clone(),
        name_kana: String::new(),
        age: None,
        photo: None,
    }
}

/// `YYMMDD_{name}_{kind}.pdf`
pub fn export_file_name(kind: DocumentKind, name: &str, on: NaiveDate) -> String {
    let name = name.trim();
    let name = if name.is_empty() {
        kind.fallback_name()
    } else {
        name
    };
    format!(
        "{}_{}_{}.pdf",
        format_date_for_file(on),
        name,
        kind.file_suffix()
    )
}
