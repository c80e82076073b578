//! Capacity advisor: warns before rendering when fixed row counts are too small.
//!
//! Only meaningful in advanced mode: grow-to-fit capacities cannot be exceeded.
//! Fixed-capacity pagination still places every row (the extra rows run past
//! the printed table), so these warnings are advisory and never block an export.

use tracing::debug;

use crate::document::blocks::ContentBlock;
use crate::layout::warnings::LayoutWarning;
use crate::models::PaginationOptions;

/// Compares content rows against the configured capacities.
///
/// History rows count every non-filler block (headers, separator and markers
/// occupy table rows too) against page 1 + page 2 capacity.
pub fn check_overflow(
    history_blocks: &[ContentBlock],
    qualification_blocks: &[ContentBlock],
    options: &PaginationOptions,
) -> Vec<LayoutWarning> {
    if !options.advanced_mode {
        return Vec::new();
    }
    let options = options.clone().normalized();

    let history_rows = count_rows(history_blocks);
    let history_capacity = options.page1_history_rows + options.page2_history_rows;
    let qualification_rows = count_rows(qualification_blocks);

    let mut warnings = Vec::new();
    if history_rows > history_capacity {
        warnings.push(LayoutWarning::history_capacity(history_rows, history_capacity));
    }
    if qualification_rows > options.qualification_rows {
        warnings.push(LayoutWarning::qualification_capacity(
            qualification_rows,
            options.qualification_rows,
        ));
    }

    debug!(
        history_rows,
        history_capacity,
        qualification_rows,
        warnings = warnings.len(),
        "Capacity check"
    );
    warnings
}

fn count_rows(blocks: &[ContentBlock]) -> usize {
    blocks.iter().filter(|b| !b.is_filler()).count()
}
