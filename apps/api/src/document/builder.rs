//! Document Model Builder: turns raw records into ordered content blocks.
//!
//! All builders are total: malformed records have already been decoded to
//! their zero / blank sentinels, and every formatter tolerates them.

use crate::document::blocks::{
    BlockBody, BlockId, CareerBlock, ContentBlock, HistoryRow, QualificationRow, RowRole,
    SkillBlock, TextBlock,
};
use crate::document::labels::{
    format_year_month, pad_month, skill_marker, year_cell, EDUCATION_HEADER, END_MARKER,
    MOTIVATION_LABEL, PRESENT_MARKER, SELF_PR_LABEL, TERMINATION_KEYWORDS, WORK_HEADER,
};
use crate::models::{ApplicationProfile, CareerEntry, HistoryEntry, HistoryKind, QualificationEntry};

const HISTORY: &str = "history";
const QUALIFICATION: &str = "qualification";
const CAREER: &str = "career";
const SKILL: &str = "skill";

/// Builds the résumé history table.
///
/// Layout: `学歴` header, education rows, separator, `職歴` header, work rows.
/// With `markers` on, a `現在に至る` row follows when the last work entry does
/// not already say the job ended, and an `以上` row always closes the table.
pub fn build_history_rows(entries: &[HistoryEntry], markers: bool) -> Vec<ContentBlock> {
    let education = sorted_group(entries, HistoryKind::Education);
    let work = sorted_group(entries, HistoryKind::Work);

    let mut rows: Vec<HistoryRow> = Vec::with_capacity(entries.len() + 5);
    rows.push(label_row(EDUCATION_HEADER, RowRole::Header));
    rows.extend(education.iter().map(|e| entry_row(e)));
    rows.push(label_row("", RowRole::Separator));
    rows.push(label_row(WORK_HEADER, RowRole::Header));
    rows.extend(work.iter().map(|e| entry_row(e)));

    if markers {
        if let Some(last) = work.last() {
            if !indicates_termination(&last.content) {
                rows.push(label_row(PRESENT_MARKER, RowRole::PresentMarker));
            }
        }
        rows.push(label_row(END_MARKER, RowRole::EndMarker));
    }

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| ContentBlock::new(BlockId::new(HISTORY, i), BlockBody::HistoryRow(row)))
        .collect()
}

/// Builds one row per qualification, ordered by `order`.
pub fn build_qualification_rows(entries: &[QualificationEntry]) -> Vec<ContentBlock> {
    let mut sorted: Vec<&QualificationEntry> = entries.iter().collect();
    sorted.sort_by_key(|q| q.order);

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let status = if q.content.contains("修了") {
                "修了"
            } else {
                "取得"
            };
            ContentBlock::new(
                BlockId::new(QUALIFICATION, i),
                BlockBody::QualificationRow(QualificationRow {
                    year: year_cell(q.year),
                    month: pad_month(q.month),
                    content: q.content.clone(),
                    status: status.to_string(),
                }),
            )
        })
        .collect()
}

/// Builds one self-contained block per employer, ordered by `order`.
pub fn build_career_blocks(entries: &[CareerEntry]) -> Vec<ContentBlock> {
    let mut sorted: Vec<&CareerEntry> = entries.iter().collect();
    sorted.sort_by_key(|c| c.order);

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, c)| {
            ContentBlock::new(
                BlockId::new(CAREER, i),
                BlockBody::CareerBlock(career_block(c)),
            )
        })
        .collect()
}

fn career_block(entry: &CareerEntry) -> CareerBlock {
    let period = format!(
        "{}～{}",
        format_year_month(&entry.start_date),
        format_year_month(&entry.end_date)
    );

    let heading = if entry.is_dispatch() {
        format!(
            "派遣元：{}／派遣先：{}",
            entry.dispatch_agency(),
            entry.dispatch_to.trim()
        )
    } else {
        entry.company_name.clone()
    };

    let mut company_details = Vec::new();
    if !entry.business_content.trim().is_empty() {
        company_details.push(format!("事業内容：{}", entry.business_content));
    }
    let money = join_present(&[
        ("資本金：", entry.capital.as_str()),
        ("売上高：", entry.revenue.as_str()),
    ]);
    if !money.is_empty() {
        company_details.push(money);
    }
    let scale = join_present(&[
        ("従業員数：", entry.employee_count.as_str()),
        ("上場：", entry.listing.label()),
    ]);
    if !scale.is_empty() {
        company_details.push(scale);
    }

    CareerBlock {
        period,
        heading,
        company_details,
        position: entry.position.clone(),
        employment_type: entry.employment_type.label().to_string(),
        department: entry.department.clone(),
        duties: non_blank(&entry.duties),
        achievements: non_blank(&entry.achievements),
    }
}

/// The résumé's motivation box: motivation and self-PR, each only when written.
pub fn build_motivation_blocks(application: Option<&ApplicationProfile>) -> Vec<ContentBlock> {
    let Some(app) = application else {
        return Vec::new();
    };
    let mut blocks = Vec::new();
    if !app.motivation.trim().is_empty() {
        blocks.push(text_block("motivation", Some(MOTIVATION_LABEL), &app.motivation));
    }
    if !app.self_pr.trim().is_empty() {
        blocks.push(text_block("self-pr", Some(SELF_PR_LABEL), &app.self_pr));
    }
    blocks
}

pub fn build_personal_request(application: Option<&ApplicationProfile>) -> ContentBlock {
    let text = application
        .map(|a| a.personal_request_or_default())
        .unwrap_or(crate::models::application::DEFAULT_PERSONAL_REQUEST);
    text_block("personal-request", None, text)
}

pub fn build_career_summary(application: Option<&ApplicationProfile>) -> ContentBlock {
    let text = application.map(|a| a.career_summary.as_str()).unwrap_or("");
    text_block("career-summary", None, text)
}

/// `None` when there is no career motivation to print.
pub fn build_career_motivation(application: Option<&ApplicationProfile>) -> Option<ContentBlock> {
    application
        .map(|a| a.career_motivation.as_str())
        .filter(|t| !t.trim().is_empty())
        .map(|t| text_block("career-motivation", None, t))
}

pub fn build_skill_blocks(application: Option<&ApplicationProfile>) -> Vec<ContentBlock> {
    let Some(app) = application else {
        return Vec::new();
    };
    app.skills
        .iter()
        .enumerate()
        .map(|(i, s)| {
            ContentBlock::new(
                BlockId::new(SKILL, i),
                BlockBody::Skill(SkillBlock {
                    marker: skill_marker(i),
                    title: s.title.clone(),
                    description: s.description.clone(),
                }),
            )
        })
        .collect()
}

pub fn build_closing() -> ContentBlock {
    ContentBlock::new(
        BlockId::named("closing"),
        BlockBody::Closing {
            label: END_MARKER.to_string(),
        },
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// Entries of one kind, stable-sorted by `order` (ties keep input order).
fn sorted_group(entries: &[HistoryEntry], kind: HistoryKind) -> Vec<&HistoryEntry> {
    let mut group: Vec<&HistoryEntry> = entries.iter().filter(|e| e.kind == kind).collect();
    group.sort_by_key(|e| e.order);
    group
}

fn entry_row(entry: &HistoryEntry) -> HistoryRow {
    HistoryRow {
        year: year_cell(entry.year),
        month: pad_month(entry.month),
        content: entry.content.clone(),
        role: RowRole::Entry,
    }
}

fn label_row(content: &str, role: RowRole) -> HistoryRow {
    HistoryRow {
        year: String::new(),
        month: String::new(),
        content: content.to_string(),
        role,
    }
}

fn indicates_termination(content: &str) -> bool {
    TERMINATION_KEYWORDS.iter().any(|kw| content.contains(kw))
}

fn text_block(name: &str, label: Option<&str>, text: &str) -> ContentBlock {
    ContentBlock::new(
        BlockId::named(name),
        BlockBody::Text(TextBlock {
            label: label.map(str::to_string),
            text: text.to_string(),
        }),
    )
}

fn non_blank(items: &[String]) -> Vec<String> {
    items
        .iter()
        .filter(|s| !s.trim().is_empty())
        .cloned()
        .collect()
}

/// Joins `prefix + value` pairs with a full-width space, skipping blank values.
fn join_present(parts: &[(&str, &str)]) -> String {
    parts
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(prefix, value)| format!("{prefix}{value}"))
        .collect::<Vec<_>>()
        .join("　")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::career::{EmploymentType, Listing};
    use crate::models::Skill;

    pub(crate) fn history(id: i64, kind: HistoryKind, order: i32, content: &str) -> HistoryEntry {
        HistoryEntry {
            id,
            year: 2000 + id as i32,
            month: 4,
            content: content.to_string(),
            kind,
            order,
        }
    }

    fn rows(blocks: &[ContentBlock]) -> Vec<&HistoryRow> {
        blocks
            .iter()
            .map(|b| match &b.body {
                BlockBody::HistoryRow(r) => r,
                other => panic!("expected history row, got {other:?}"),
            })
            .collect()
    }

    fn career(id: i64, order: i32) -> CareerEntry {
        CareerEntry {
            id,
            company_name: format!("株式会社{id}"),
            employment_type: EmploymentType::FullTime,
            start_date: "2015-4".to_string(),
            end_date: "2019-03".to_string(),
            business_content: "ソフトウェア開発".to_string(),
            capital: "1億円".to_string(),
            revenue: String::new(),
            employee_count: "300名".to_string(),
            listing: Listing::Unlisted,
            position: "エンジニア".to_string(),
            department: "開発部".to_string(),
            dispatch_to: String::new(),
            dispatch_from: String::new(),
            duties: vec!["設計".to_string(), "  ".to_string(), "実装".to_string()],
            achievements: vec![],
            order,
        }
    }

    // ── build_history_rows ──────────────────────────────────────────────────

    #[test]
    fn test_history_layout_without_markers() {
        let entries = vec![
            history(1, HistoryKind::Education, 0, "A高校 卒業"),
            history(2, HistoryKind::Work, 0, "B社 入社"),
        ];
        let blocks = build_history_rows(&entries, false);
        let r = rows(&blocks);
        assert_eq!(blocks.len(), 2 + 2 + 1);
        assert_eq!(r[0].role, RowRole::Header);
        assert_eq!(r[0].content, EDUCATION_HEADER);
        assert_eq!(r[1].content, "A高校 卒業");
        assert_eq!(r[2].role, RowRole::Separator);
        assert_eq!(r[3].content, WORK_HEADER);
        assert_eq!(r[4].content, "B社 入社");
    }

    #[test]
    fn test_history_sorted_by_order_within_group() {
        let entries = vec![
            history(1, HistoryKind::Work, 5, "third"),
            history(2, HistoryKind::Education, 9, "edu-late"),
            history(3, HistoryKind::Work, 1, "first"),
            history(4, HistoryKind::Education, 2, "edu-early"),
            history(5, HistoryKind::Work, 3, "second 退職"),
        ];
        let blocks = build_history_rows(&entries, false);
        let contents: Vec<&str> = rows(&blocks).iter().map(|r| r.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["学歴", "edu-early", "edu-late", "", "職歴", "first", "second 退職", "third"]
        );
    }

    #[test]
    fn test_history_ties_keep_insertion_order() {
        let entries = vec![
            history(1, HistoryKind::Education, 0, "a"),
            history(2, HistoryKind::Education, 0, "b"),
            history(3, HistoryKind::Education, 0, "c"),
        ];
        let blocks = build_history_rows(&entries, false);
        let contents: Vec<&str> = rows(&blocks)[1..4].iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_present_marker_added_when_still_employed() {
        let entries = vec![history(1, HistoryKind::Work, 0, "C社 入社")];
        let blocks = build_history_rows(&entries, true);
        let r = rows(&blocks);
        assert_eq!(r[r.len() - 2].role, RowRole::PresentMarker);
        assert_eq!(r[r.len() - 2].content, PRESENT_MARKER);
        assert_eq!(r[r.len() - 1].role, RowRole::EndMarker);
        assert_eq!(r[r.len() - 1].content, END_MARKER);
    }

    #[test]
    fn test_present_marker_skipped_after_termination_keyword() {
        for content in ["C社 一身上の都合により退職", "C社 退社", "現在に至る", "離職"] {
            let entries = vec![history(1, HistoryKind::Work, 0, content)];
            let blocks = build_history_rows(&entries, true);
            let markers = rows(&blocks)
                .iter()
                .filter(|r| matches!(r.role, RowRole::PresentMarker | RowRole::EndMarker))
                .count();
            assert_eq!(markers, 1, "only the end marker for {content:?}");
        }
    }

    #[test]
    fn test_termination_checks_only_last_work_entry() {
        let entries = vec![
            history(1, HistoryKind::Work, 0, "A社 退職"),
            history(2, HistoryKind::Work, 1, "B社 入社"),
        ];
        let blocks = build_history_rows(&entries, true);
        assert!(rows(&blocks)
            .iter()
            .any(|r| r.role == RowRole::PresentMarker));
    }

    #[test]
    fn test_no_present_marker_without_work_entries() {
        let entries = vec![history(1, HistoryKind::Education, 0, "大学 卒業")];
        let blocks = build_history_rows(&entries, true);
        let r = rows(&blocks);
        assert_eq!(blocks.len(), 2 + 1 + 1 + 1);
        assert_eq!(r.last().unwrap().role, RowRole::EndMarker);
        assert!(!r.iter().any(|r| r.role == RowRole::PresentMarker));
    }

    #[test]
    fn test_history_counts_for_any_size() {
        for n in 0..30 {
            let entries: Vec<HistoryEntry> = (0..n)
                .map(|i| {
                    let kind = if i % 3 == 0 {
                        HistoryKind::Work
                    } else {
                        HistoryKind::Education
                    };
                    history(i as i64, kind, (n - i) as i32, "x")
                })
                .collect();
            let blocks = build_history_rows(&entries, true);
            let data_rows = blocks.iter().filter(|b| b.is_data_row()).count();
            let markers = blocks.len() - data_rows - 3;
            assert_eq!(data_rows, n);
            assert!(markers <= 2);
        }
    }

    #[test]
    fn test_history_month_padding_and_blank_sentinels() {
        let mut entry = history(1, HistoryKind::Education, 0, "x");
        entry.year = 0;
        entry.month = 0;
        let mut other = history(2, HistoryKind::Education, 1, "y");
        other.month = 9;
        let blocks = build_history_rows(&[entry, other], false);
        let r = rows(&blocks);
        assert_eq!(r[1].year, "");
        assert_eq!(r[1].month, "");
        assert_eq!(r[2].month, "09");
    }

    #[test]
    fn test_history_block_ids_unique_and_stable() {
        let entries = vec![
            history(1, HistoryKind::Education, 0, "a"),
            history(1, HistoryKind::Education, 0, "duplicate id"),
        ];
        let first = build_history_rows(&entries, true);
        let second = build_history_rows(&entries, true);
        assert_eq!(first, second);
        let mut ids: Vec<&BlockId> = first.iter().map(|b| &b.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), first.len());
    }

    // ── build_qualification_rows ────────────────────────────────────────────

    #[test]
    fn test_qualification_rows_sorted_with_status() {
        let quals = vec![
            QualificationEntry {
                id: 1,
                year: 2020,
                month: 10,
                content: "基本情報技術者試験 合格".to_string(),
                order: 2,
            },
            QualificationEntry {
                id: 2,
                year: 2018,
                month: 3,
                content: "研修 修了".to_string(),
                order: 1,
            },
        ];
        let blocks = build_qualification_rows(&quals);
        let rows: Vec<&QualificationRow> = blocks
            .iter()
            .map(|b| match &b.body {
                BlockBody::QualificationRow(r) => r,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(rows[0].content, "研修 修了");
        assert_eq!(rows[0].month, "03");
        assert_eq!(rows[0].status, "修了");
        assert_eq!(rows[1].status, "取得");
    }

    // ── build_career_blocks ─────────────────────────────────────────────────

    fn career_of(block: &ContentBlock) -> &CareerBlock {
        match &block.body {
            BlockBody::CareerBlock(c) => c,
            other => panic!("expected career block, got {other:?}"),
        }
    }

    #[test]
    fn test_career_blocks_sorted_by_order() {
        let blocks = build_career_blocks(&[career(1, 2), career(2, 0), career(3, 1)]);
        let headings: Vec<&str> = blocks.iter().map(|b| career_of(b).heading.as_str()).collect();
        assert_eq!(headings, vec!["株式会社2", "株式会社3", "株式会社1"]);
    }

    #[test]
    fn test_career_period_and_present_label() {
        let mut entry = career(1, 0);
        entry.end_date = "現在".to_string();
        let blocks = build_career_blocks(&[entry]);
        assert_eq!(career_of(&blocks[0]).period, "2015年04月～現在");
    }

    #[test]
    fn test_career_dispatch_heading() {
        let mut entry = career(1, 0);
        entry.dispatch_to = "C銀行".to_string();
        let blocks = build_career_blocks(&[entry.clone()]);
        assert_eq!(
            career_of(&blocks[0]).heading,
            "派遣元：株式会社1／派遣先：C銀行"
        );

        entry.dispatch_from = "Dスタッフ".to_string();
        let blocks = build_career_blocks(&[entry]);
        assert_eq!(career_of(&blocks[0]).heading, "派遣元：Dスタッフ／派遣先：C銀行");
    }

    #[test]
    fn test_career_filters_blank_bullets_and_details() {
        let blocks = build_career_blocks(&[career(1, 0)]);
        let c = career_of(&blocks[0]);
        assert_eq!(c.duties, vec!["設計", "実装"]);
        assert!(c.achievements.is_empty());
        assert_eq!(
            c.company_details,
            vec![
                "事業内容：ソフトウェア開発".to_string(),
                "資本金：1億円".to_string(),
                "従業員数：300名　上場：非上場".to_string(),
            ]
        );
    }

    // ── application text ────────────────────────────────────────────────────

    #[test]
    fn test_motivation_blocks_skip_empty_sections() {
        let mut app = ApplicationProfile::new("A", chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        app.self_pr = "粘り強い".to_string();
        let blocks = build_motivation_blocks(Some(&app));
        assert_eq!(blocks.len(), 1);
        assert!(build_motivation_blocks(None).is_empty());
    }

    #[test]
    fn test_personal_request_defaults() {
        let block = build_personal_request(None);
        match block.body {
            BlockBody::Text(t) => assert_eq!(t.text, crate::models::application::DEFAULT_PERSONAL_REQUEST),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_skill_blocks_numbered() {
        let mut app = ApplicationProfile::new("A", chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        app.skills = (0..11)
            .map(|i| Skill {
                title: format!("s{i}"),
                description: String::new(),
            })
            .collect();
        let blocks = build_skill_blocks(Some(&app));
        assert_eq!(blocks.len(), 11);
        match &blocks[10].body {
            BlockBody::Skill(s) => assert_eq!(s.marker, "(11)"),
            _ => unreachable!(),
        }
        assert!(build_career_motivation(Some(&app)).is_none());
    }
}
