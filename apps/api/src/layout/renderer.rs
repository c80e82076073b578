//! The seam between the paginator and whatever lays pages out for real.
//!
//! Mode B only needs two numbers from a renderer: the height of a rendered
//! page and the bottom edge of a block on it, both in the renderer's own unit.
//! The safe zone is defined in millimetres on A4 and scaled by the reported
//! page height, so the result does not depend on zoom or unit.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::blocks::BlockId;
use crate::layout::page::Page;

pub const A4_HEIGHT_MM: f32 = 297.0;
pub const A4_WIDTH_MM: f32 = 210.0;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer has not reported stable geometry yet.
    #[error("page geometry is not available")]
    MeasurementUnavailable,

    #[error("render failed: {0}")]
    Failed(String),
}

/// Geometry of one rendered page. Positions are measured from the page's top edge.
pub trait RenderedPage: Send + Sync {
    /// `None` while layout is still in progress.
    fn page_height(&self) -> Option<f32>;

    /// Bottom edge of `id`, or `None` when the block is not on this page or not laid out.
    fn measure_bottom(&self, id: &BlockId) -> Option<f32>;
}

#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render_page(&self, page: &Page) -> Result<Box<dyn RenderedPage>, RenderError>;

    /// Waits until geometry reflects the last mutation.
    ///
    /// The default is a fixed settle delay. Renderers with a real completion
    /// signal should override this and await it instead.
    async fn layout_settled(&self, policy: &SettlePolicy) {
        tokio::time::sleep(policy.delay).await;
    }
}

/// How long to wait for layout, and how many extra waits to allow when
/// geometry is still missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    pub delay: Duration,
    pub retries: u32,
}

impl SettlePolicy {
    pub fn new(delay_ms: u64, retries: u32) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            retries,
        }
    }
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self::new(150, 1)
    }
}

/// The vertical span of a page inside which content must end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeZone {
    pub page_height_mm: f32,
    pub top_margin_mm: f32,
    pub bottom_margin_mm: f32,
    /// Slack before a block counts as overflowing (one CSS pixel).
    pub tolerance_mm: f32,
}

impl SafeZone {
    pub fn a4() -> Self {
        Self {
            page_height_mm: A4_HEIGHT_MM,
            top_margin_mm: 18.0,
            bottom_margin_mm: 22.0,
            tolerance_mm: 0.26,
        }
    }

    fn units_per_mm(&self, page_height: f32) -> f32 {
        page_height / self.page_height_mm
    }

    /// Where content starts, in the renderer's unit.
    pub fn content_top(&self, page_height: f32) -> f32 {
        self.top_margin_mm * self.units_per_mm(page_height)
    }

    /// Lowest bottom edge that still fits, tolerance included.
    pub fn safe_bottom(&self, page_height: f32) -> f32 {
        (self.page_height_mm - self.bottom_margin_mm + self.tolerance_mm)
            * self.units_per_mm(page_height)
    }

    pub fn overflows(&self, bottom: f32, page_height: f32) -> bool {
        bottom > self.safe_bottom(page_height)
    }
}

impl Default for SafeZone {
    fn default() -> Self {
        Self::a4()
    }
}
