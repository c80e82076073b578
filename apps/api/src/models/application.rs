use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// Default text for the personal-request box on the résumé.
pub const DEFAULT_PERSONAL_REQUEST: &str = "勤務形態・条件等については貴社の規定に従います。";

/// Suffix appended to the company name of a copied application profile.
pub const COPY_SUFFIX: &str = "（コピー）";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

/// Per-employer free text: one profile per company the applicant sends documents to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationProfile {
    #[serde(default, deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient::date")]
    pub submission_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub career_summary: String,
    /// Motivation printed on the résumé.
    #[serde(default, deserialize_with = "lenient::string")]
    pub motivation: String,
    #[serde(rename = "selfPR", default, deserialize_with = "lenient::string")]
    pub self_pr: String,
    #[serde(default, deserialize_with = "skills")]
    pub skills: Vec<Skill>,
    /// Motivation printed on the career history document.
    #[serde(default, deserialize_with = "lenient::string")]
    pub career_motivation: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub personal_request: String,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ApplicationProfile {
    /// A fresh profile for `company_name`, dated `today`.
    pub fn new(company_name: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            id: 0,
            company_name: company_name.into(),
            submission_date: Some(today),
            career_summary: String::new(),
            motivation: String::new(),
            self_pr: String::new(),
            skills: Vec::new(),
            career_motivation: String::new(),
            personal_request: DEFAULT_PERSONAL_REQUEST.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Stamps `created_at` on first save and `updated_at` on every save.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }

    /// A deep copy with a new identity, ready to be saved as a new record.
    pub fn duplicate(&self) -> Self {
        Self {
            id: 0,
            company_name: format!("{}{}", self.company_name, COPY_SUFFIX),
            created_at: None,
            updated_at: None,
            ..self.clone()
        }
    }

    pub fn personal_request_or_default(&self) -> &str {
        if self.personal_request.trim().is_empty() {
            DEFAULT_PERSONAL_REQUEST
        } else {
            &self.personal_request
        }
    }
}

/// Skills arrive either as a list of objects or as a JSON-encoded string (CSV cells).
fn skills<'de, D>(deserializer: D) -> Result<Vec<Skill>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let value = match value {
        Some(serde_json::Value::String(s)) => {
            serde_json::from_str(&s).unwrap_or(serde_json::Value::Null)
        }
        Some(other) => other,
        None => serde_json::Value::Null,
    };
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<Skill>(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_profile_has_default_request() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let app = ApplicationProfile::new("株式会社テスト", today);
        assert_eq!(app.personal_request, DEFAULT_PERSONAL_REQUEST);
        assert_eq!(app.submission_date, Some(today));
    }

    #[test]
    fn test_touch_keeps_created_at() {
        let mut app = ApplicationProfile::new("A", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        app.touch(first);
        app.touch(second);
        assert_eq!(app.created_at, Some(first));
        assert_eq!(app.updated_at, Some(second));
    }

    #[test]
    fn test_duplicate_resets_identity() {
        let mut app = ApplicationProfile::new("A社", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        app.id = 9;
        app.skills.push(Skill {
            title: "Rust".to_string(),
            description: "d".to_string(),
        });
        let copy = app.duplicate();
        assert_eq!(copy.id, 0);
        assert_eq!(copy.company_name, "A社（コピー）");
        assert_eq!(copy.skills, app.skills);
    }

    #[test]
    fn test_skills_accept_encoded_string() {
        let app: ApplicationProfile = serde_json::from_str(
            r#"{"id":1,"skills":"[{\"title\":\"t\",\"description\":\"d\"}]","selfPR":"pr"}"#,
        )
        .unwrap();
        assert_eq!(app.skills.len(), 1);
        assert_eq!(app.self_pr, "pr");
    }
}
