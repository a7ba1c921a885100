use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Parsed candidate resume. Immutable input to the analysis engine.
///
/// Every field defaults to empty so partial payloads degrade instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default, alias = "raw_content", alias = "rawContent")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub education: Vec<String>,
    #[serde(default, deserialize_with = "lenient_experience")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, alias = "contactInfo")]
    pub contact_info: ContactInfo,
}

/// An experience entry, either a bare line of text or a structured record.
///
/// Structured records are reduced to their description text on the way in,
/// so the matcher never re-inspects the shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExperienceEntry {
    PlainText(String),
    Structured { description: String },
}

impl ExperienceEntry {
    pub fn text(&self) -> &str {
        match self {
            ExperienceEntry::PlainText(text) => text,
            ExperienceEntry::Structured { description } => description,
        }
    }
}

impl From<&str> for ExperienceEntry {
    fn from(text: &str) -> Self {
        ExperienceEntry::PlainText(text.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExperienceEntry {
    Text(String),
    Record {
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        content: Option<String>,
    },
}

impl<'de> Deserialize<'de> for ExperienceEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawExperienceEntry::deserialize(deserializer)? {
            RawExperienceEntry::Text(text) => ExperienceEntry::PlainText(text),
            RawExperienceEntry::Record {
                description,
                content,
            } => ExperienceEntry::Structured {
                description: description
                    .filter(|d| !d.is_empty())
                    .or(content)
                    .unwrap_or_default(),
            },
        })
    }
}

/// String elements of a list; nulls, numbers and nested values are dropped.
/// A null list reads as empty.
fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(text) => Some(text),
            _ => None,
        })
        .collect())
}

/// Experience elements that read as a line or a record; anything else is dropped.
fn lenient_experience<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<ExperienceEntry>, D::Error> {
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter(|value| value.is_string() || value.is_object())
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

/// Contact details recognised on a resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ContactInfo {
    pub fn has_email(&self) -> bool {
        is_present(&self.email)
    }

    pub fn has_phone(&self) -> bool {
        is_present(&self.phone)
    }

    pub fn has_linkedin(&self) -> bool {
        is_present(&self.linkedin)
    }

    /// Non-blank name, trimmed.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

fn is_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}
