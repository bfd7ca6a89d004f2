use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Category labels the backend's classifier assigns.
pub const CATEGORIES: [&str; 4] = ["Work", "Personal", "Newsletter", "Transactional"];

const URGENT_LEVEL: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub urgency: Option<String>,
}

impl EmailRecord {
    /// Urgency on the 1..=5 scale, if the backend sent something parseable.
    pub fn urgency_level(&self) -> Option<u8> {
        self.urgency
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u8>().ok())
            .filter(|level| (1..=5).contains(level))
    }

    pub fn is_urgent(&self) -> bool {
        self.urgency_level()
            .is_some_and(|level| level >= URGENT_LEVEL)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "label")]
pub enum Filter {
    #[default]
    All,
    Category(String),
}

impl Filter {
    pub fn matches(&self, email: &EmailRecord) -> bool {
        match self {
            Self::All => true,
            Self::Category(label) => email.category.as_deref() == Some(label.as_str()),
        }
    }

    pub fn apply<'a>(&self, emails: &'a [EmailRecord]) -> Vec<&'a EmailRecord> {
        emails.iter().filter(|email| self.matches(email)).collect()
    }
}

impl FromStr for Filter {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let label = CATEGORIES
            .iter()
            .find(|known| known.eq_ignore_ascii_case(trimmed))
            .map(|known| (*known).to_string())
            .unwrap_or_else(|| trimmed.to_string());
        Ok(Self::Category(label))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Category(label) => f.write_str(label),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(value) => value,
            StringOrNumber::Integer(value) => value.to_string(),
            StringOrNumber::Float(value) => value.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<StringOrNumber>::deserialize(deserializer).map(|value| value.map(String::from))
}
