//! Export pipeline: Mode A for both documents, then measured overflow
//! correction for the career history document.

use serde::Serialize;
use tracing::info;

use crate::document::builder::{build_history_rows, build_qualification_rows};
use crate::document::header::{export_file_name, DocumentKind};
use crate::layout::{
    check_overflow, paginate, resolve_overflow, DocumentInput, LayoutWarning, PageRenderer,
    PaginatedDocument, RenderError, SafeZone, SettlePolicy,
};

/// Mode A output, as shown while the user is editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPreview {
    pub resume: Option<PaginatedDocument>,
    pub career: Option<PaginatedDocument>,
    pub warnings: Vec<LayoutWarning>,
}

/// Final pages handed to the exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedDocuments {
    pub file_name: String,
    pub resume: Option<PaginatedDocument>,
    pub career: Option<PaginatedDocument>,
    pub continuation_pages: usize,
    pub compacted: bool,
    pub warnings: Vec<LayoutWarning>,
}

pub fn preview_documents(input: &DocumentInput, kind: DocumentKind) -> DocumentPreview {
    let documents = paginate(input);
    let warnings = if kind.includes_resume() {
        advisor_warnings(input)
    } else {
        Vec::new()
    };

    DocumentPreview {
        resume: kind.includes_resume().then_some(documents.resume),
        career: kind.includes_career().then_some(documents.career),
        warnings,
    }
}

/// Runs the full pipeline. The résumé keeps its Mode A pages; the career
/// document goes through overflow correction against `renderer`.
pub async fn export_documents(
    input: &DocumentInput,
    kind: DocumentKind,
    renderer: &dyn PageRenderer,
    zone: &SafeZone,
    settle: &SettlePolicy,
) -> Result<ExportedDocuments, RenderError> {
    let preview = preview_documents(input, kind);
    let mut warnings = preview.warnings;
    let mut continuation_pages = 0;
    let mut compacted = false;

    let career = match preview.career {
        Some(mut doc) => {
            let resolution =
                resolve_overflow(std::mem::take(&mut doc.pages), renderer, zone, settle).await?;
            doc.pages = resolution.pages;
            continuation_pages = resolution.continuation_pages;
            compacted = resolution.compacted;
            warnings.extend(resolution.warnings);
            Some(doc)
        }
        None => None,
    };

    let file_name = export_file_name(kind, &input.profile.name, input.as_of());
    info!(
        file_name = %file_name,
        warnings = warnings.len(),
        "Documents ready for export"
    );

    Ok(ExportedDocuments {
        file_name,
        resume: preview.resume,
        career,
        continuation_pages,
        compacted,
        warnings,
    })
}

fn advisor_warnings(input: &DocumentInput) -> Vec<LayoutWarning> {
    let history = build_history_rows(&input.history, input.options.auto_markers);
    let qualifications = build_qualification_rows(&input.qualifications);
    check_overflow(&history, &qualifications, &input.options)
}
