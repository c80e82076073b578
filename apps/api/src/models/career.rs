use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// Sentinel stored in `end_date` while the applicant still holds the position.
pub const PRESENT_SENTINEL: &str = "現在";

/// Employment type printed under the position. Unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmploymentType {
    #[default]
    Unspecified,
    FullTime,
    Contract,
    Dispatched,
    PartTime,
    Other(String),
}

impl EmploymentType {
    pub fn label(&self) -> &str {
        match self {
            EmploymentType::Unspecified => "",
            EmploymentType::FullTime => "正社員",
            EmploymentType::Contract => "契約社員",
            EmploymentType::Dispatched => "派遣社員",
            EmploymentType::PartTime => "アルバイト・パート",
            EmploymentType::Other(label) => label,
        }
    }
}

impl From<String> for EmploymentType {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "" => EmploymentType::Unspecified,
            "正社員" | "full_time" => EmploymentType::FullTime,
            "契約社員" | "contract" => EmploymentType::Contract,
            "派遣社員" | "dispatched" => EmploymentType::Dispatched,
            "アルバイト・パート" | "part_time" => EmploymentType::PartTime,
            other => EmploymentType::Other(other.to_string()),
        }
    }
}

impl From<EmploymentType> for String {
    fn from(value: EmploymentType) -> Self {
        value.label().to_string()
    }
}

/// Stock-exchange listing of the employer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Listing {
    #[default]
    Unspecified,
    Unlisted,
    Prime,
    Standard,
    Growth,
    Other(String),
}

impl Listing {
    pub fn label(&self) -> &str {
        match self {
            Listing::Unspecified => "",
            Listing::Unlisted => "非上場",
            Listing::Prime => "東証プライム",
            Listing::Standard => "東証スタンダード",
            Listing::Growth => "東証グロース",
            Listing::Other(label) => label,
        }
    }
}

impl From<String> for Listing {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "" => Listing::Unspecified,
            "非上場" | "unlisted" => Listing::Unlisted,
            "東証プライム" | "prime" => Listing::Prime,
            "東証スタンダード" | "standard" => Listing::Standard,
            "東証グロース" | "growth" => Listing::Growth,
            other => Listing::Other(other.to_string()),
        }
    }
}

impl From<Listing> for String {
    fn from(value: Listing) -> Self {
        value.label().to_string()
    }
}

/// One employer on the career history document.
///
/// `start_date` / `end_date` are kept as the raw `YYYY-MM` text the form
/// produced; formatting tolerates anything (see `document::labels`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerEntry {
    #[serde(default, deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient::label")]
    pub employment_type: EmploymentType,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end_date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub business_content: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub capital: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub revenue: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub employee_count: String,
    #[serde(default, deserialize_with = "lenient::label")]
    pub listing: Listing,
    #[serde(default, deserialize_with = "lenient::string")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub department: String,
    /// Dispatch destination. A non-blank value marks the entry as a dispatch assignment.
    #[serde(default, deserialize_with = "lenient::string")]
    pub dispatch_to: String,
    /// Dispatch agency; falls back to `company_name` when blank.
    #[serde(default, deserialize_with = "lenient::string")]
    pub dispatch_from: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub duties: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub achievements: Vec<String>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub order: i32,
}

impl CareerEntry {
    pub fn is_dispatch(&self) -> bool {
        !self.dispatch_to.trim().is_empty()
    }

    pub fn dispatch_agency(&self) -> &str {
        if self.dispatch_from.trim().is_empty() {
            &self.company_name
        } else {
            &self.dispatch_from
        }
    }

    pub fn is_current(&self) -> bool {
        self.end_date.trim() == PRESENT_SENTINEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_employment_type_is_preserved() {
        let e = EmploymentType::from("業務委託".to_string());
        assert_eq!(e, EmploymentType::Other("業務委託".to_string()));
        assert_eq!(String::from(e), "業務委託");
    }

    #[test]
    fn test_listing_round_trips_through_label() {
        assert_eq!(Listing::from("非上場".to_string()), Listing::Unlisted);
        assert_eq!(String::from(Listing::Prime), "東証プライム");
        assert_eq!(Listing::from(String::new()), Listing::Unspecified);
    }

    #[test]
    fn test_dispatch_agency_defaults_to_company() {
        let entry: CareerEntry = serde_json::from_str(
            r#"{"id":1,"companyName":"株式会社A","dispatchTo":"B商事","endDate":"現在"}"#,
        )
        .unwrap();
        assert!(entry.is_dispatch());
        assert!(entry.is_current());
        assert_eq!(entry.dispatch_agency(), "株式会社A");
    }

    #[test]
    fn test_duties_accept_csv_encoded_list() {
        let entry: CareerEntry =
            serde_json::from_str(r#"{"duties":"[\"設計\",\"\"]","achievements":null}"#).unwrap();
        assert_eq!(entry.duties, vec!["設計", ""]);
        assert!(entry.achievements.is_empty());
    }
}
