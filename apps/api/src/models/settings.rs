use serde::{Deserialize, Serialize};

use crate::models::lenient;

pub const DEFAULT_PAGE1_HISTORY_ROWS: usize = 18;
pub const DEFAULT_PAGE2_HISTORY_ROWS: usize = 5;
pub const DEFAULT_QUALIFICATION_ROWS: usize = 6;

/// Pagination settings for the résumé.
///
/// With `advanced_mode` off, row capacities grow to fit the content and the
/// three row counts are ignored. With it on, they are fixed, user-chosen
/// capacities. Zero (unset or malformed) capacities fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOptions {
    #[serde(default)]
    pub advanced_mode: bool,
    #[serde(default, deserialize_with = "lenient::int")]
    pub page1_history_rows: usize,
    #[serde(default, deserialize_with = "lenient::int")]
    pub page2_history_rows: usize,
    #[serde(default, deserialize_with = "lenient::int")]
    pub qualification_rows: usize,
    /// Append the "現在に至る" / "以上" marker rows to the history table.
    #[serde(
        default = "lenient::default_true",
        deserialize_with = "lenient::bool_default_true"
    )]
    pub auto_markers: bool,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            advanced_mode: false,
            page1_history_rows: DEFAULT_PAGE1_HISTORY_ROWS,
            page2_history_rows: DEFAULT_PAGE2_HISTORY_ROWS,
            qualification_rows: DEFAULT_QUALIFICATION_ROWS,
            auto_markers: true,
        }
    }
}

impl PaginationOptions {
    pub fn advanced(page1: usize, page2: usize, qualifications: usize) -> Self {
        Self {
            advanced_mode: true,
            page1_history_rows: page1,
            page2_history_rows: page2,
            qualification_rows: qualifications,
            auto_markers: true,
        }
    }

    /// Replaces unset capacities with the defaults.
    pub fn normalized(mut self) -> Self {
        if self.page1_history_rows == 0 {
            self.page1_history_rows = DEFAULT_PAGE1_HISTORY_ROWS;
        }
        if self.page2_history_rows == 0 {
            self.page2_history_rows = DEFAULT_PAGE2_HISTORY_ROWS;
        }
        if self.qualification_rows == 0 {
            self.qualification_rows = DEFAULT_QUALIFICATION_ROWS;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let opts: PaginationOptions =
            serde_json::from_str(r#"{"advancedMode": true, "page1HistoryRows": "20"}"#).unwrap();
        let opts = opts.normalized();
        assert!(opts.advanced_mode);
        assert_eq!(opts.page1_history_rows, 20);
        assert_eq!(opts.page2_history_rows, DEFAULT_PAGE2_HISTORY_ROWS);
        assert_eq!(opts.qualification_rows, DEFAULT_QUALIFICATION_ROWS);
        assert!(opts.auto_markers);
    }

    #[test]
    fn test_negative_capacity_falls_back() {
        let opts: PaginationOptions =
            serde_json::from_str(r#"{"advancedMode": true, "qualificationRows": -3}"#).unwrap();
        assert_eq!(opts.normalized().qualification_rows, DEFAULT_QUALIFICATION_ROWS);
    }
}
