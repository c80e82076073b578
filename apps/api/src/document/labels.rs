//! Fixed document wording and date formatting.

use chrono::{Datelike, NaiveDate};

use crate::models::career::PRESENT_SENTINEL;

pub const EDUCATION_HEADER: &str = "学歴";
pub const WORK_HEADER: &str = "職歴";
pub const PRESENT_MARKER: &str = "現在に至る";
pub const END_MARKER: &str = "以上";

/// Work-history wording that already says the last job ended (or is ongoing).
/// Matched as case-sensitive substrings of the last work entry.
pub const TERMINATION_KEYWORDS: &[&str] = &["退職", "退社", "現在に至る", "離職"];

pub const RESUME_TITLE: &str = "履歴書";
pub const CAREER_TITLE: &str = "職務経歴書";

pub const CAREER_SUMMARY_TITLE: &str = "■職務要約";
pub const CAREER_HISTORY_TITLE: &str = "■職務経歴";
pub const CAREER_CONTINUED_TITLE: &str = "■職務経歴（続き）";
pub const QUALIFICATIONS_TITLE: &str = "■資格";
pub const SKILLS_TITLE: &str = "■ 活かせるスキル・強み";
pub const CAREER_MOTIVATION_TITLE: &str = "■ 志望動機";

pub const HISTORY_TABLE_TITLE: &str = "学　歴 ・ 職　歴（各別にまとめて書く）";
pub const QUALIFICATION_TABLE_TITLE: &str = "資　格 ・ 免　許";
pub const MOTIVATION_TITLE: &str = "志望の動機、特技、好きな学科、アピールポイントなど";
pub const MOTIVATION_LABEL: &str = "【志望理由】";
pub const SELF_PR_LABEL: &str = "【自己PR】";
pub const PERSONAL_REQUEST_TITLE: &str =
    "本人希望記入欄（特に給料・職種・勤務時間・勤務地・その他についての希望などがあれば記入）";

pub const DUTIES_LABEL: &str = "【業務内容】";
pub const ACHIEVEMENTS_LABEL: &str = "【業務上の工夫・成果】";

const CIRCLED_NUMBERS: [&str; 10] = ["①", "②", "③", "④", "⑤", "⑥", "⑦", "⑧", "⑨", "⑩"];

/// Two-digit month, or blank for the unset / out-of-range sentinel.
pub fn pad_month(month: u32) -> String {
    if (1..=12).contains(&month) {
        format!("{month:02}")
    } else {
        String::new()
    }
}

/// Year cell, blank for the unset sentinel.
pub fn year_cell(year: i32) -> String {
    if year > 0 {
        year.to_string()
    } else {
        String::new()
    }
}

/// `2021-4` → `2021年04月`; the present sentinel and unrecognised text pass through.
pub fn format_year_month(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw == PRESENT_SENTINEL {
        return raw.to_string();
    }
    let mut parts = raw.split('-');
    match (parts.next(), parts.next()) {
        (Some(year), Some(month)) if !year.is_empty() && !month.is_empty() => {
            format!("{year}年{month:0>2}月")
        }
        _ => raw.to_string(),
    }
}

/// `2024年 04月 01日` (the résumé's spaced style).
pub fn format_date_spaced(date: NaiveDate) -> String {
    format!(
        "{}年 {:02}月 {:02}日",
        date.year(),
        date.month(),
        date.day()
    )
}

/// `2024年04月01日` (the career document's compact style).
pub fn format_date_compact(date: NaiveDate) -> String {
    format!("{}年{:02}月{:02}日", date.year(), date.month(), date.day())
}

/// `240401`: the date prefix used in export file names.
pub fn format_date_for_file(date: NaiveDate) -> String {
    format!(
        "{:02}{:02}{:02}",
        date.year().rem_euclid(100),
        date.month(),
        date.day()
    )
}

/// Full years between `birth` and `on`.
pub fn age_on(birth: NaiveDate, on: NaiveDate) -> u32 {
    let mut age = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

/// ①…⑩, then `(11)`, `(12)`, …
pub fn skill_marker(index: usize) -> String {
    CIRCLED_NUMBERS
        .get(index)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("({})", index + 1))
}
