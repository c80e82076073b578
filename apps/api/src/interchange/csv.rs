//! Per-collection CSV files, spreadsheet compatible (UTF-8 BOM, CRLF).
//!
//! Columns are positional: headers are written on export and skipped on
//! import. List-valued fields travel as a JSON array inside one cell.

use std::str::FromStr;

use ::csv::{ReaderBuilder, Terminator, WriterBuilder};
use serde_json::{Map, Value};
use tracing::info;

use crate::interchange::{decode_items, InterchangeError};
use crate::models::{ApplicationProfile, CareerEntry, HistoryEntry, Profile, QualificationEntry};
use crate::records::{repo, Record, RecordStore};

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Text,
    Number,
    List,
}

#[derive(Debug, Clone, Copy)]
struct Column {
    header: &'static str,
    key: &'static str,
    kind: CellKind,
}

const fn text(header: &'static str, key: &'static str) -> Column {
    Column { header, key, kind: CellKind::Text }
}

const fn number(header: &'static str, key: &'static str) -> Column {
    Column { header, key, kind: CellKind::Number }
}

const fn list(header: &'static str, key: &'static str) -> Column {
    Column { header, key, kind: CellKind::List }
}

const PROFILE_COLUMNS: &[Column] = &[
    text("氏名", "name"),
    text("ふりがな", "nameKana"),
    text("生年月日", "birthDate"),
    text("性別", "gender"),
    text("郵便番号", "postalCode"),
    text("住所", "address"),
    text("住所ふりがな", "addressKana"),
    text("電話番号", "phone"),
    text("Email", "email"),
    text("連絡先郵便番号", "contactPostalCode"),
    text("連絡先住所", "contactAddress"),
    text("連絡先住所ふりがな", "contactAddressKana"),
    text("連絡先電話", "contactPhone"),
    text("連絡先Email", "contactEmail"),
];

const EDUCATION_COLUMNS: &[Column] = &[
    number("ID", "id"),
    number("年", "year"),
    number("月", "month"),
    text("内容", "content"),
    text("種別", "type"),
    number("表示順", "order"),
];

const CAREER_COLUMNS: &[Column] = &[
    number("ID", "id"),
    text("会社名", "companyName"),
    text("雇用形態", "employmentType"),
    text("開始年月", "startDate"),
    text("終了年月", "endDate"),
    text("事業内容", "businessContent"),
    text("資本金", "capital"),
    text("売上高", "revenue"),
    text("従業員数", "employeeCount"),
    text("上場区分", "listing"),
    text("役職", "position"),
    text("配属先", "department"),
    text("派遣先", "dispatchTo"),
    text("派遣元", "dispatchFrom"),
    list("業務内容", "duties"),
    list("工夫・成果", "achievements"),
    number("表示順", "order"),
];

const QUALIFICATION_COLUMNS: &[Column] = &[
    number("ID", "id"),
    number("年", "year"),
    number("月", "month"),
    text("内容", "content"),
    number("表示順", "order"),
];

const APPLICATION_COLUMNS: &[Column] = &[
    number("ID", "id"),
    text("企業名", "companyName"),
    text("提出日", "submissionDate"),
    text("職務要約", "careerSummary"),
    text("志望動機(履歴書)", "motivation"),
    text("自己PR", "selfPR"),
    list("スキル・強み", "skills"),
    text("志望動機(経歴書)", "careerMotivation"),
    text("本人希望", "personalRequest"),
    text("作成日時", "createdAt"),
    text("更新日時", "updatedAt"),
];

/// A collection that can be exchanged as one CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvCollection {
    Profile,
    Education,
    Career,
    Qualifications,
    Applications,
}

impl CsvCollection {
    pub fn name(self) -> &'static str {
        match self {
            CsvCollection::Profile => "profile",
            CsvCollection::Education => "education",
            CsvCollection::Career => "career",
            CsvCollection::Qualifications => "qualifications",
            CsvCollection::Applications => "applications",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.csv", self.name())
    }

    fn columns(self) -> &'static [Column] {
        match self {
            CsvCollection::Profile => PROFILE_COLUMNS,
            CsvCollection::Education => EDUCATION_COLUMNS,
            CsvCollection::Career => CAREER_COLUMNS,
            CsvCollection::Qualifications => QUALIFICATION_COLUMNS,
            CsvCollection::Applications => APPLICATION_COLUMNS,
        }
    }
}

impl FromStr for CsvCollection {
    type Err = InterchangeError;

    /// Accepts the collection name with or without a `.csv` suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let base = lower.strip_suffix(".csv").unwrap_or(&lower);
        match base {
            "profile" => Ok(CsvCollection::Profile),
            "education" | "history" => Ok(CsvCollection::Education),
            "career" => Ok(CsvCollection::Career),
            "qualifications" => Ok(CsvCollection::Qualifications),
            "applications" => Ok(CsvCollection::Applications),
            _ => Err(InterchangeError::UnknownCollection(s.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Export / import against the store
// ────────────────────────────────────────────────────────────────────────────

pub async fn export_csv(
    store: &dyn RecordStore,
    collection: CsvCollection,
) -> Result<String, InterchangeError> {
    let rows = match collection {
        CsvCollection::Profile => repo::load_profile(store)
            .await?
            .map(serde_json::to_value)
            .transpose()?
            .into_iter()
            .collect(),
        CsvCollection::Education => to_values(repo::load_all::<HistoryEntry>(store).await?)?,
        CsvCollection::Career => to_values(repo::load_all::<CareerEntry>(store).await?)?,
        CsvCollection::Qualifications => {
            to_values(repo::load_all::<QualificationEntry>(store).await?)?
        }
        CsvCollection::Applications => {
            to_values(repo::load_all::<ApplicationProfile>(store).await?)?
        }
    };
    encode(collection.columns(), &rows)
}

/// Replaces `collection` with the rows of `text`, returning how many records
/// were stored. For the profile only the first row is used, and fields the
/// CSV does not carry (the photo) are kept.
pub async fn import_csv(
    store: &dyn RecordStore,
    collection: CsvCollection,
    text: &str,
) -> Result<usize, InterchangeError> {
    let rows = decode(collection.columns(), text)?;
    if rows.is_empty() {
        return Err(InterchangeError::EmptyCsv);
    }

    let count = match collection {
        CsvCollection::Profile => {
            let existing = repo::load_profile(store).await?.unwrap_or_default();
            let mut merged = serde_json::to_value(existing)?;
            if let (Value::Object(target), Some(Value::Object(first))) =
                (&mut merged, rows.into_iter().next())
            {
                target.extend(first);
            }
            let profile: Profile = serde_json::from_value(merged)?;
            repo::save_profile(store, &profile).await?;
            1
        }
        CsvCollection::Education => replace::<HistoryEntry>(store, rows).await?,
        CsvCollection::Career => replace::<CareerEntry>(store, rows).await?,
        CsvCollection::Qualifications => replace::<QualificationEntry>(store, rows).await?,
        CsvCollection::Applications => replace::<ApplicationProfile>(store, rows).await?,
    };

    info!("Imported {count} {} rows from CSV", collection.name());
    Ok(count)
}

async fn replace<T: Record>(
    store: &dyn RecordStore,
    rows: Vec<Value>,
) -> Result<usize, InterchangeError> {
    Ok(repo::replace_all(store, decode_items::<T>(rows)).await?.len())
}

fn to_values<T: Record>(records: Vec<T>) -> Result<Vec<Value>, serde_json::Error> {
    records.iter().map(serde_json::to_value).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Encoding
// ────────────────────────────────────────────────────────────────────────────

fn encode(columns: &[Column], rows: &[Value]) -> Result<String, InterchangeError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(columns.iter().map(|c| c.header))?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| cell_text(row.get(c.key), c.kind)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ::csv::Error::from(e.into_error()))?;

    let mut out = String::with_capacity(bytes.len() + BOM.len_utf8());
    out.push(BOM);
    out.push_str(&String::from_utf8_lossy(&bytes));
    Ok(out)
}

fn cell_text(value: Option<&Value>, kind: CellKind) -> String {
    match (value, kind) {
        (None | Some(Value::Null), _) => String::new(),
        (Some(v @ (Value::Array(_) | Value::Object(_))), CellKind::List) => v.to_string(),
        (Some(Value::String(s)), _) => s.clone(),
        (Some(other), _) => other.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Decoding
// ────────────────────────────────────────────────────────────────────────────

/// One JSON object per data row, keyed by column key. The header row is
/// skipped, blank lines are ignored and short rows read as empty cells.
fn decode(columns: &[Column], text: &str) -> Result<Vec<Value>, InterchangeError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut object = Map::new();
        for (i, column) in columns.iter().enumerate() {
            let raw = record.get(i).unwrap_or("");
            object.insert(column.key.to_string(), cell_value(raw, column.kind));
        }
        rows.push(Value::Object(object));
    }
    Ok(rows)
}

fn cell_value(raw: &str, kind: CellKind) -> Value {
    match kind {
        CellKind::Text => Value::String(raw.to_string()),
        CellKind::Number => Value::from(raw.trim().parse::<i64>().unwrap_or(0)),
        CellKind::List => {
            if raw.trim().is_empty() {
                Value::Array(Vec::new())
            } else {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::Array(Vec::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::HistoryKind;
    use crate::records::MemoryStore;

    #[test]
    fn test_encode_writes_bom_crlf_and_quotes() {
        let rows = vec![json!({
            "id": 1, "year": 2020, "month": 4,
            "content": "株式会社\"A\", 入社\n配属", "type": "職歴", "order": 0
        })];
        let out = encode(EDUCATION_COLUMNS, &rows).unwrap();
        assert!(out.starts_with('\u{feff}'));
        assert_eq!(
            out.trim_start_matches('\u{feff}'),
            "ID,年,月,内容,種別,表示順\r\n1,2020,4,\"株式会社\"\"A\"\", 入社\n配属\",職歴,0\r\n"
        );
    }

    #[test]
    fn test_decode_handles_quotes_short_rows_and_blank_lines() {
        let text = "ID,年,月,内容,表示順\r\n\
                    1,2019,6,\"基本情報, \"\"FE\"\"\"\r\n\
                    \r\n\
                    \"2\",2020,,\"multi\nline\",3\r\n";
        let rows = decode(QUALIFICATION_COLUMNS, text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["content"], "基本情報, \"FE\"");
        assert_eq!(rows[0]["order"], 0);
        assert_eq!(rows[1]["id"], 2);
        assert_eq!(rows[1]["month"], 0);
        assert_eq!(rows[1]["content"], "multi\nline");
        assert_eq!(rows[1]["order"], 3);
    }

    #[test]
    fn test_decode_coerces_numbers_and_lists() {
        let text = "\u{feff}ID,会社名,雇用形態,開始年月,終了年月,事業内容,資本金,売上高,従業員数,上場区分,役職,配属先,派遣先,派遣元,業務内容,工夫・成果,表示順\r\n\
                    abc,株式会社A,正社員,2018-04,現在,,,,,,,,,,\"[\"\"設計\"\",\"\"実装\"\"]\",not json,\r\n";
        let rows = decode(CAREER_COLUMNS, text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], 0);
        assert_eq!(rows[0]["order"], 0);
        assert_eq!(rows[0]["duties"], json!(["設計", "実装"]));
        assert_eq!(rows[0]["achievements"], json!([]));

        let entry: CareerEntry = serde_json::from_value(rows[0].clone()).unwrap();
        assert!(entry.is_current());
        assert_eq!(entry.duties.len(), 2);
    }

    #[test]
    fn test_collection_names() {
        assert_eq!("Career.csv".parse::<CsvCollection>().unwrap(), CsvCollection::Career);
        assert_eq!("history".parse::<CsvCollection>().unwrap(), CsvCollection::Education);
        assert!("photos".parse::<CsvCollection>().is_err());
        assert_eq!(CsvCollection::Applications.file_name(), "applications.csv");
    }

    #[tokio::test]
    async fn test_history_csv_round_trip_through_store() {
        let store = MemoryStore::new();
        for (i, content) in ["入学", "卒業"].iter().enumerate() {
            repo::save(
                &store,
                HistoryEntry {
                    id: 0,
                    year: 2010 + i as i32,
                    month: 3,
                    content: content.to_string(),
                    kind: HistoryKind::Education,
                    order: i as i32,
                },
            )
            .await
            .unwrap();
        }
        let text = export_csv(&store, CsvCollection::Education).await.unwrap();

        let target = MemoryStore::new();
        let count = import_csv(&target, CsvCollection::Education, &text)
            .await
            .unwrap();
        assert_eq!(count, 2);
        let loaded: Vec<HistoryEntry> = repo::load_all(&target).await.unwrap();
        let original: Vec<HistoryEntry> = repo::load_all(&store).await.unwrap();
        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn test_profile_import_uses_first_row_and_keeps_photo() {
        let store = MemoryStore::new();
        repo::save_profile(
            &store,
            &Profile {
                name: "旧姓".to_string(),
                photo: Some("data:image/png;base64,AAAA".to_string()),
                ..Profile::default()
            },
        )
        .await
        .unwrap();

        let text = "氏名,ふりがな,生年月日\r\n山田 太郎,やまだ たろう,1990-05-01\r\n別人,,\r\n";
        import_csv(&store, CsvCollection::Profile, text).await.unwrap();

        let profile = repo::load_profile(&store).await.unwrap().unwrap();
        assert_eq!(profile.name, "山田 太郎");
        assert_eq!(profile.name_kana, "やまだ たろう");
        assert!(profile.birth_date.is_some());
        assert_eq!(profile.photo.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[tokio::test]
    async fn test_header_only_csv_is_rejected() {
        let store = MemoryStore::new();
        let err = import_csv(&store, CsvCollection::Qualifications, "ID,年,月,内容,表示順\r\n")
            .await
            .unwrap_err();
        assert!(matches!(err, InterchangeError::EmptyCsv));
    }
}
