//! Row capacity strategies for the résumé's fixed-row tables.

use crate::models::settings::{
    DEFAULT_PAGE1_HISTORY_ROWS, DEFAULT_PAGE2_HISTORY_ROWS, DEFAULT_QUALIFICATION_ROWS,
};
use crate::models::PaginationOptions;

/// Decides how many rows a table gets, given how many rows of content want to go in it.
///
/// A strategy never drops content: callers place every block and only pad up
/// to the capacity, so a capacity smaller than `needed` means overflow rows.
pub trait RowCapacityStrategy: Send + Sync {
    fn capacity(&self, needed: usize) -> usize;
}

/// Grows the table to hold everything, never shrinking below `minimum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowToFit {
    pub minimum: usize,
}

impl RowCapacityStrategy for GrowToFit {
    fn capacity(&self, needed: usize) -> usize {
        needed.max(self.minimum)
    }
}

/// A user-chosen row count, independent of the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCapacity {
    pub rows: usize,
}

impl RowCapacityStrategy for FixedCapacity {
    fn capacity(&self, _needed: usize) -> usize {
        self.rows
    }
}

/// The three table capacities of one résumé.
pub struct CapacityPlan {
    pub page1_history: Box<dyn RowCapacityStrategy>,
    pub page2_history: Box<dyn RowCapacityStrategy>,
    pub qualifications: Box<dyn RowCapacityStrategy>,
}

impl CapacityPlan {
    pub fn from_options(options: &PaginationOptions) -> Self {
        if options.advanced_mode {
            let options = options.clone().normalized();
            Self {
                page1_history: Box::new(FixedCapacity {
                    rows: options.page1_history_rows,
                }),
                page2_history: Box::new(FixedCapacity {
                    rows: options.page2_history_rows,
                }),
                qualifications: Box::new(FixedCapacity {
                    rows: options.qualification_rows,
                }),
            }
        } else {
            Self {
                page1_history: Box::new(GrowToFit {
                    minimum: DEFAULT_PAGE1_HISTORY_ROWS,
                }),
                page2_history: Box::new(GrowToFit {
                    minimum: DEFAULT_PAGE2_HISTORY_ROWS,
                }),
                qualifications: Box::new(GrowToFit {
                    minimum: DEFAULT_QUALIFICATION_ROWS,
                }),
            }
        }
    }
}
