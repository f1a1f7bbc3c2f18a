use serde::Serialize;

use crate::types::Record;
use crate::vector::Score;

/// One ranked match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// `1 / (1 + squared L2 distance)`, in `(0, 1]`
    pub score: Score,
    /// The rendering that was embedded for this record
    pub document: String,
    pub metadata: Record,
}

/// Human-readable block for one result.
///
/// Empty `month` and `technique_description` are left out.
pub fn format_result(result: &SearchResult) -> String {
    let record = &result.metadata;

    let mut formatted = format!(
        "Confidence: {}\nTitle: {}\nAuthors: {}\nYear: {}",
        result.score.as_percentage(),
        record.title,
        record.authors_display(),
        record.year
    );
    if !record.month.is_empty() {
        formatted.push_str(&format!(", Month: {}", record.month));
    }
    formatted.push_str(&format!("\nTechnique: {}\n", record.technique_type));
    if !record.technique_description.is_empty() {
        formatted.push_str(&format!(
            "Technique Description: {}\n",
            record.technique_description
        ));
    }
    formatted.push_str(&format!("Summary: {}\n", record.summary));

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TechniqueType;

    fn result(month: &str, technique_type: TechniqueType, description: &str) -> SearchResult {
        SearchResult {
            score: Score::from_distance(1.0),
            document: String::new(),
            metadata: Record {
                title: "ReAct".to_string(),
                summary: "Reasoning and acting.".to_string(),
                year: "2022".to_string(),
                month: month.to_string(),
                authors: vec!["Shunyu Yao".to_string(), "Karthik Narasimhan".to_string()],
                technique_type,
                technique_description: description.to_string(),
            },
        }
    }

    #[test]
    fn test_format_full_result() {
        let formatted = format_result(&result(
            "October",
            TechniqueType::PromptEngineeringTechnique,
            "Interleave thoughts and actions",
        ));

        assert_eq!(
            formatted,
            "Confidence: 50.00%\n\
             Title: ReAct\n\
             Authors: Shunyu Yao, Karthik Narasimhan\n\
             Year: 2022, Month: October\n\
             Technique: Prompt Engineering Technique\n\
             Technique Description: Interleave thoughts and actions\n\
             Summary: Reasoning and acting.\n"
        );
    }

    #[test]
    fn test_format_omits_empty_fields() {
        let formatted = format_result(&result("", TechniqueType::Other, ""));

        assert!(formatted.contains("Year: 2022\nTechnique: Other\n"));
        assert!(!formatted.contains("Month"));
        assert!(!formatted.contains("Technique Description"));
    }

    #[test]
    fn test_result_json_shape() {
        let value = serde_json::to_value(result("", TechniqueType::Other, "")).unwrap();
        assert_eq!(value["score"], 0.5);
        assert_eq!(value["metadata"]["title"], "ReAct");
        assert!(value.get("document").is_some());
    }
}
