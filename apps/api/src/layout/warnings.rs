use serde::{Deserialize, Serialize};

/// Non-blocking notices produced by pagination. None of these stop an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    HistoryCapacityExceeded,
    QualificationCapacityExceeded,
    CareerPageCount,
    MeasurementUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutWarning {
    pub code: WarningCode,
    pub message: String,
}

impl LayoutWarning {
    pub fn history_capacity(rows: usize, capacity: usize) -> Self {
        Self {
            code: WarningCode::HistoryCapacityExceeded,
            message: format!(
                "学歴・職歴が{rows}行あり、設定された行数（{capacity}行）を超えています。"
            ),
        }
    }

    pub fn qualification_capacity(rows: usize, capacity: usize) -> Self {
        Self {
            code: WarningCode::QualificationCapacityExceeded,
            message: format!(
                "資格・免許が{rows}行あり、設定された行数（{capacity}行）を超えています。"
            ),
        }
    }

    pub fn career_page_count(pages: usize) -> Self {
        Self {
            code: WarningCode::CareerPageCount,
            message: format!(
                "職務経歴書が{pages}ページになっています。内容を簡潔にして2ページに収めることを検討してください。"
            ),
        }
    }

    pub fn measurement_unavailable(step: &str) -> Self {
        Self {
            code: WarningCode::MeasurementUnavailable,
            message: format!("ページの寸法を取得できなかったため、{step}を省略しました。"),
        }
    }
}
