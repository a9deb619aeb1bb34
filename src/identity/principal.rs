use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Access-control role carried by an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Inspector,
    // Any role value this build does not know. Never matches a required-role set.
    #[serde(other)]
    Unrecognized,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Inspector => "inspector",
            Role::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct District {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Village {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub district: Option<District>,
}

/// The authenticated inspector as returned by the authentication API.
///
/// Only `id` and `role` are required; the remaining profile fields are display
/// data and default when the server omits them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Personal identification number; the API sends it as a number.
    #[serde(default)]
    pub jshshir: serde_json::Value,
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub nation: serde_json::Value,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub rank: String,
    pub role: Role,
    #[serde(default)]
    pub village: Option<Village>,
    #[serde(default, rename = "work_addres")]
    pub work_address: String,
}

impl Identity {
    /// Minimal identity, mostly useful for tests and fixtures.
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            jshshir: serde_json::Value::Null,
            birthday: String::new(),
            gender: String::new(),
            address: String::new(),
            phone: String::new(),
            nation: serde_json::Value::Null,
            photo: String::new(),
            position: String::new(),
            rank: String::new(),
            role,
            village: None,
            work_address: String::new(),
        }
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() { self.username.clone() } else { full.to_string() }
    }

    pub fn birthday_date(&self) -> Option<NaiveDate> {
        // Accept both plain dates and full ISO timestamps
        let day = self.birthday.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Photo path is relative to the API server root.
    pub fn photo_url(&self, server: &str) -> Option<String> {
        if self.photo.is_empty() { return None; }
        if self.photo.starts_with("http://") || self.photo.starts_with("https://") {
            return Some(self.photo.clone());
        }
        Some(format!("{}{}", server.trim_end_matches('/'), self.photo))
    }
}
