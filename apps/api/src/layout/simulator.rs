//! Simulated renderer: estimates page geometry from static font metrics.
//!
//! # Architecture
//! - Blocks stack top-down from the safe zone's top margin; nothing floats.
//! - Row-style blocks (history, qualification, filler) have a fixed height.
//! - Free-text blocks wrap character by character at the page's text width.
//! - Layout is CPU-bound, so `render_page` runs it inside `tokio::task::spawn_blocking`
//!   on an owned copy of the page.
//!
//! Geometry is reported in millimetres, with `page_height` = 297.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::document::blocks::{BlockBody, BlockId, CareerBlock, ContentBlock};
use crate::layout::font_metrics::{get_metrics, FontMetricTable, PageConfig};
use crate::layout::page::{Page, PageKind};
use crate::layout::renderer::{
    PageRenderer, RenderError, RenderedPage, SafeZone, SettlePolicy, A4_HEIGHT_MM, A4_WIDTH_MM,
};

/// Header area above the first section (title, date, name, photo, address tables).
fn preamble_mm(kind: PageKind) -> f32 {
    match kind {
        PageKind::ResumeFirst => 95.0,
        PageKind::CareerFirst => 24.0,
        PageKind::ResumeSecond | PageKind::CareerContinuation | PageKind::CareerFixed => 0.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SimulatedRenderer {
    config: PageConfig,
    zone: SafeZone,
}

impl SimulatedRenderer {
    pub fn new(config: PageConfig, zone: SafeZone) -> Self {
        Self { config, zone }
    }
}

/// Block bottoms of one simulated page.
#[derive(Debug, Clone)]
pub struct SimulatedPage {
    bottoms: HashMap<BlockId, f32>,
    /// Bottom edge of the last thing on the page.
    pub content_bottom: f32,
}

impl RenderedPage for SimulatedPage {
    fn page_height(&self) -> Option<f32> {
        Some(A4_HEIGHT_MM)
    }

    fn measure_bottom(&self, id: &BlockId) -> Option<f32> {
        self.bottoms.get(id).copied()
    }
}

#[async_trait]
impl PageRenderer for SimulatedRenderer {
    async fn render_page(&self, page: &Page) -> Result<Box<dyn RenderedPage>, RenderError> {
        let page = page.clone();
        let config = self.config.clone();
        let zone = self.zone;

        let simulated = tokio::task::spawn_blocking(move || {
            let metrics = get_metrics(&config.font);
            layout_page(&page, metrics, &config, &zone)
        })
        .await
        .map_err(|e| RenderError::Failed(format!("spawn_blocking failed in layout: {e}")))?;

        Ok(Box::new(simulated))
    }

    /// Simulated layout is complete as soon as `render_page` returns.
    async fn layout_settled(&self, _policy: &SettlePolicy) {}
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Stacks every section and block of `page`. Pure; used directly in tests.
pub fn layout_page(
    page: &Page,
    metrics: &FontMetricTable,
    config: &PageConfig,
    zone: &SafeZone,
) -> SimulatedPage {
    let width_em = config.text_width_em(A4_WIDTH_MM);
    let mut y = zone.content_top(A4_HEIGHT_MM) + preamble_mm(page.kind);
    let mut bottoms = HashMap::new();

    for section in &page.sections {
        if !section.title.is_empty() {
            y += config.section_title_mm;
        }
        for block in &section.blocks {
            y += block_height(block, metrics, config, width_em);
            bottoms.insert(block.id.clone(), y);
        }
    }

    SimulatedPage {
        bottoms,
        content_bottom: y,
    }
}

pub fn block_height(
    block: &ContentBlock,
    metrics: &FontMetricTable,
    config: &PageConfig,
    width_em: f32,
) -> f32 {
    let line = config.line_height_mm;
    match &block.body {
        BlockBody::HistoryRow(_) | BlockBody::QualificationRow(_) | BlockBody::Filler => {
            config.table_row_mm
        }
        BlockBody::CareerBlock(career) => career_height(career, metrics, config, width_em),
        BlockBody::Text(text) => {
            let label_lines = if text.label.is_some() { 1.0 } else { 0.0 };
            let body_lines = metrics.wrapped_lines(&text.text, width_em) as f32;
            (label_lines + body_lines) * line + config.block_padding_mm
        }
        BlockBody::Skill(skill) => {
            let title = format!("{} {}", skill.marker, skill.title);
            let lines = metrics.wrapped_lines(&title, width_em)
                + metrics.wrapped_lines(&skill.description, width_em - 1.0);
            lines as f32 * line + config.block_padding_mm / 2.0
        }
        BlockBody::Closing { .. } => line + config.block_padding_mm,
    }
}

/// Period/heading band, company detail lines, a position table row, then
/// each bulleted list with its label.
fn career_height(
    career: &CareerBlock,
    metrics: &FontMetricTable,
    config: &PageConfig,
    width_em: f32,
) -> f32 {
    let line = config.line_height_mm;
    let bullet_width = width_em - 2.0;

    let mut lines = 0u32;
    for detail in &career.company_details {
        lines += metrics.wrapped_lines(detail, width_em) as u32;
    }
    for list in [&career.duties, &career.achievements] {
        if list.is_empty() {
            continue;
        }
        lines += 1;
        for item in list {
            lines += metrics.wrapped_lines(item, bullet_width) as u32;
        }
    }

    config.table_row_mm * 2.0 + lines as f32 * line + config.block_padding_mm
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
