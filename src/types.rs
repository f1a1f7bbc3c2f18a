//! Research-paper records as they arrive from extraction and as they are
//! stored next to the index.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Category of technique a paper describes.
///
/// Serialized with the human-readable labels used by the extraction
/// pipeline; the variant names are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TechniqueType {
    #[serde(
        rename = "Prompt Engineering Technique",
        alias = "PromptEngineeringTechnique"
    )]
    PromptEngineeringTechnique,
    #[serde(rename = "Language Model Technique", alias = "LanguageModelTechnique")]
    LanguageModelTechnique,
    #[serde(rename = "Other")]
    Other,
}

impl TechniqueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PromptEngineeringTechnique => "Prompt Engineering Technique",
            Self::LanguageModelTechnique => "Language Model Technique",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for TechniqueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One research paper.
///
/// Records are created once from input JSON and never mutated afterwards.
/// A record is only accepted into an index after [`Record::validate`]
/// succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub summary: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub month: String,
    pub authors: Vec<String>,
    pub technique_type: TechniqueType,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub technique_description: String,
}

impl Record {
    /// Checks the invariants serde cannot express.
    ///
    /// `title` and `summary` must be non-blank, and `technique_description`
    /// is empty exactly when `technique_type` is [`TechniqueType::Other`].
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is empty");
        }
        if self.summary.trim().is_empty() {
            return Err("summary is empty");
        }

        let has_description = !self.technique_description.trim().is_empty();
        match (self.technique_type, has_description) {
            (TechniqueType::Other, true) => {
                Err("technique_description must be empty when technique_type is Other")
            }
            (TechniqueType::Other, false) | (_, true) => Ok(()),
            (_, false) => Err("technique_description is required unless technique_type is Other"),
        }
    }

    /// Authors joined for display, e.g. `Ada Lovelace, Alan Turing`.
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }
}

/// Accepts `"2023"` as well as `2023`.
fn deserialize_year<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(i64),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Text(text) => text,
        Year::Number(number) => number.to_string(),
    })
}

/// Treats `null` like an absent field.
fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
