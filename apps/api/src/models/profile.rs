use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// The applicant's personal details. A singleton record: it is created once,
/// updated in place, and cleared (never deleted) on reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name_kana: String,
    #[serde(default, deserialize_with = "lenient::date")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub gender: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address_kana: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,

    /// Alternate contact address, only filled when it differs from the primary one.
    #[serde(default, deserialize_with = "lenient::string")]
    pub contact_postal_code: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub contact_address: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub contact_address_kana: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub contact_phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub contact_email: String,

    /// Base64 data URL of the ID photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(
        default = "lenient::default_true",
        deserialize_with = "lenient::bool_default_true"
    )]
    pub photo_enabled: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            name_kana: String::new(),
            birth_date: None,
            gender: String::new(),
            postal_code: String::new(),
            address: String::new(),
            address_kana: String::new(),
            phone: String::new(),
            email: String::new(),
            contact_postal_code: String::new(),
            contact_address: String::new(),
            contact_address_kana: String::new(),
            contact_phone: String::new(),
            contact_email: String::new(),
            photo: None,
            photo_enabled: true,
        }
    }
}

impl Profile {
    /// Photo to print on the résumé, honouring the display flag.
    pub fn visible_photo(&self) -> Option<&str> {
        if !self.photo_enabled {
            return None;
        }
        self.photo.as_deref().filter(|p| !p.is_empty())
    }
}
