//! Mode B: measured overflow correction for the career history document.
//!
//! # Passes
//! 1. Measure career page 1. The first career block that ends below the safe
//!    zone, and every block after it, overflow.
//! 2. Move the overflowing blocks one at a time onto continuation pages
//!    inserted before the fixed page, measuring after every move. A block that
//!    overflows a continuation page that already holds blocks opens the next
//!    continuation page. A block alone on its page stays there.
//! 3. Renumber.
//! 4. Try to fold the fixed page into the page before it. Both pages are
//!    snapshotted first and restored if the merged page overflows.
//! 5. Renumber, and warn when the document still has 3 or more pages.
//!
//! Every decision depends only on the geometry the renderer reports, so the
//! same geometry always produces the same pages.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::document::blocks::{BlockId, ContentBlock};
use crate::document::labels::CAREER_CONTINUED_TITLE;
use crate::layout::page::{renumber, Page, PageKind, Section, SectionKind};
use crate::layout::renderer::{PageRenderer, RenderError, RenderedPage, SafeZone, SettlePolicy};
use crate::layout::warnings::LayoutWarning;

/// Career documents at or above this many pages get a warning.
pub const CAREER_PAGE_WARNING_THRESHOLD: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowResolution {
    pub pages: Vec<Page>,
    pub continuation_pages: usize,
    /// True when the fixed page was folded into its predecessor.
    pub compacted: bool,
    pub warnings: Vec<LayoutWarning>,
}

/// Runs overflow correction over one career document's pages.
///
/// Only `RenderError::Failed` is returned as an error. Missing geometry is
/// retried per the settle policy and then skipped with a warning.
pub async fn resolve_overflow(
    mut pages: Vec<Page>,
    renderer: &dyn PageRenderer,
    zone: &SafeZone,
    settle: &SettlePolicy,
) -> Result<OverflowResolution, RenderError> {
    let mut pass = OverflowPass {
        renderer,
        zone,
        settle,
        warnings: Vec::new(),
    };

    let continuation_pages = pass.redistribute(&mut pages).await?;
    renumber(&mut pages);

    let compacted = pass.compact(&mut pages).await?;
    renumber(&mut pages);

    let mut warnings = pass.warnings;
    if pages.len() >= CAREER_PAGE_WARNING_THRESHOLD {
        warn!(pages = pages.len(), "Career history runs to 3 or more pages");
        warnings.push(LayoutWarning::career_page_count(pages.len()));
    }

    info!(
        pages = pages.len(),
        continuation_pages, compacted, "Overflow correction complete"
    );

    Ok(OverflowResolution {
        pages,
        continuation_pages,
        compacted,
        warnings,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Measurement
// ────────────────────────────────────────────────────────────────────────────

struct Measured {
    rendered: Box<dyn RenderedPage>,
    height: f32,
}

impl Measured {
    /// `None` when the renderer has no bottom edge for the block.
    fn overflows(&self, id: &BlockId, zone: &SafeZone) -> Option<bool> {
        self.rendered
            .measure_bottom(id)
            .map(|bottom| zone.overflows(bottom, self.height))
    }
}

struct OverflowPass<'a> {
    renderer: &'a dyn PageRenderer,
    zone: &'a SafeZone,
    settle: &'a SettlePolicy,
    warnings: Vec<LayoutWarning>,
}

impl OverflowPass<'_> {
    /// Waits for layout, renders, and retries while the page height is missing.
    async fn measure(&mut self, page: &Page, step: &str) -> Result<Option<Measured>, RenderError> {
        for attempt in 0..=self.settle.retries {
            self.renderer.layout_settled(self.settle).await;
            match self.renderer.render_page(page).await {
                Ok(rendered) => {
                    if let Some(height) = rendered.page_height().filter(|h| *h > 0.0) {
                        return Ok(Some(Measured { rendered, height }));
                    }
                }
                Err(RenderError::MeasurementUnavailable) => {}
                Err(e) => return Err(e),
            }
            debug!(attempt, step, "Page geometry not ready");
        }

        warn!(step, "Page geometry unavailable; continuing without it");
        let warning = LayoutWarning::measurement_unavailable(step);
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
        Ok(None)
    }

    // ── redistribution ──────────────────────────────────────────────────────

    /// Moves overflowing career blocks to continuation pages. Returns how many were created.
    async fn redistribute(&mut self, pages: &mut Vec<Page>) -> Result<usize, RenderError> {
        let Some(first) = pages.iter().position(|p| p.kind == PageKind::CareerFirst) else {
            return Ok(0);
        };
        let Some(measured) = self.measure(&pages[first], "溢れ判定").await? else {
            return Ok(0);
        };

        let zone = self.zone;
        let Some(section) = pages[first].section_mut(SectionKind::CareerHistory) else {
            return Ok(0);
        };
        // Unmeasurable blocks count as fitting so nothing moves on missing data.
        let Some(cut) = section
            .blocks
            .iter()
            .position(|b| measured.overflows(&b.id, zone).unwrap_or(false))
        else {
            debug!("No career overflow on the first page");
            return Ok(0);
        };
        let overflow = section.blocks.split_off(cut);

        info!(
            first_overflowing = %overflow[0].id,
            moved = overflow.len(),
            "Career blocks overflow the first page"
        );

        let mut insert_at = pages
            .iter()
            .position(|p| p.kind == PageKind::CareerFixed)
            .unwrap_or(pages.len());
        let mut current: Option<usize> = None;
        let mut created = 0;

        for block in overflow {
            let target = match current {
                Some(index) => index,
                None => {
                    pages.insert(insert_at, continuation_page(Vec::new()));
                    created += 1;
                    insert_at += 1;
                    insert_at - 1
                }
            };
            current = Some(target);

            let id = block.id.clone();
            push_career_block(&mut pages[target], block);

            let fits = match self.measure(&pages[target], "続きページの溢れ判定").await? {
                Some(m) => !m.overflows(&id, self.zone).unwrap_or(false),
                None => true,
            };
            if fits || career_block_count(&pages[target]) == 1 {
                continue;
            }

            debug!(block = %id, "Continuation page full; opening another");
            if let Some(block) = pop_career_block(&mut pages[target]) {
                pages.insert(insert_at, continuation_page(vec![block]));
                created += 1;
                current = Some(insert_at);
                insert_at += 1;
            }
        }

        Ok(created)
    }

    // ── compaction ──────────────────────────────────────────────────────────

    /// Folds the fixed page into its predecessor when everything still fits.
    async fn compact(&mut self, pages: &mut Vec<Page>) -> Result<bool, RenderError> {
        let Some(fixed) = pages.iter().position(|p| p.kind == PageKind::CareerFixed) else {
            return Ok(false);
        };
        if fixed == 0 {
            return Ok(false);
        }

        let predecessor_snapshot = pages[fixed - 1].clone();
        let fixed_snapshot = pages[fixed].clone();

        let moved = std::mem::take(&mut pages[fixed].sections);
        pages[fixed - 1].sections.extend(moved);

        let measured = self.measure(&pages[fixed - 1], "末尾ページの統合").await;
        let fits = match &measured {
            // Unmeasurable blocks count as overflowing so the merge only happens on evidence.
            Ok(Some(m)) => pages[fixed - 1]
                .blocks()
                .all(|b| m.overflows(&b.id, self.zone) == Some(false)),
            Ok(None) | Err(_) => false,
        };

        if fits {
            pages.remove(fixed);
            info!("Fixed career page folded into the previous page");
            return Ok(true);
        }

        pages[fixed - 1] = predecessor_snapshot;
        pages[fixed] = fixed_snapshot;
        debug!("Fixed career page kept; merge would overflow");
        measured.map(|_| false)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page surgery helpers
// ────────────────────────────────────────────────────────────────────────────

fn continuation_page(blocks: Vec<ContentBlock>) -> Page {
    Page::new(
        PageKind::CareerContinuation,
        vec![Section::new(
            SectionKind::CareerHistory,
            CAREER_CONTINUED_TITLE,
            blocks,
        )],
    )
}

fn push_career_block(page: &mut Page, block: ContentBlock) {
    match page.section_mut(SectionKind::CareerHistory) {
        Some(section) => section.blocks.push(block),
        None => page.sections.push(Section::new(
            SectionKind::CareerHistory,
            CAREER_CONTINUED_TITLE,
            vec![block],
        )),
    }
}

fn pop_career_block(page: &mut Page) -> Option<ContentBlock> {
    page.section_mut(SectionKind::CareerHistory)
        .and_then(|s| s.blocks.pop())
}

fn career_block_count(page: &Page) -> usize {
    page.section(SectionKind::CareerHistory)
        .map_or(0, |s| s.blocks.len())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
