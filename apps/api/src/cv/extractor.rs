//! Profile Extractor — turns resume text into a `ProfileAnalysis` via the LLM.
//!
//! The model is asked for strict JSON but small models often wrap it in code
//! fences or ignore the format entirely. `parse_profile` therefore has two
//! outcomes: a structured read of the JSON object, or a line-based heuristic
//! over the raw reply. Only the model *call* can fail; a bad reply never does.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::cv::prompts::{CV_ANALYSIS_PROMPT, CV_ANALYSIS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::CompletionModel;

pub const DEFAULT_EXPERIENCE_LEVEL: &str = "Not specified";

const FALLBACK_SUMMARY: &str = "CV analysis completed";
const FALLBACK_STRENGTH: &str = "Experience in multiple technologies";
const FALLBACK_IMPROVEMENT: &str = "Consider adding more specific achievements";

/// Shortest line the heuristic accepts as a skill, exclusive.
const MIN_HEURISTIC_SKILL_CHARS: usize = 2;

/// Structured review of a CV. Built per upload and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub skills: Vec<String>,
    pub experience_level: String,
}

/// How the model reply was understood.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedProfile {
    /// The reply was a JSON object.
    Structured(ProfileAnalysis),
    /// The reply was not JSON; skills were scraped line by line.
    Heuristic(ProfileAnalysis),
}

impl ParsedProfile {
    pub fn analysis(&self) -> &ProfileAnalysis {
        match self {
            ParsedProfile::Structured(a) | ParsedProfile::Heuristic(a) => a,
        }
    }

    pub fn into_analysis(self) -> ProfileAnalysis {
        match self {
            ParsedProfile::Structured(a) | ParsedProfile::Heuristic(a) => a,
        }
    }

    pub fn is_heuristic(&self) -> bool {
        matches!(self, ParsedProfile::Heuristic(_))
    }
}

/// Sends the CV text to the model and parses whatever comes back.
/// The call is made once; its failure is returned as `AppError::Llm`.
pub async fn analyze_cv(model: &dyn CompletionModel, cv_text: &str) -> Result<ParsedProfile, AppError> {
    let prompt = CV_ANALYSIS_PROMPT.replace("{cv_text}", cv_text);
    let reply = model.complete(&prompt, CV_ANALYSIS_SYSTEM).await?;

    let parsed = parse_profile(&reply);
    if parsed.is_heuristic() {
        warn!(
            "Model reply was not a JSON object; scraped {} skills heuristically",
            parsed.analysis().skills.len()
        );
    }
    Ok(parsed)
}

/// Removes markdown code fences the model may wrap its JSON in.
///
/// A reply starting with "```json" loses every "```json" and "```"; one
/// starting with a bare "```" loses every "```". Anything else is only trimmed.
pub fn clean_model_response(raw: &str) -> String {
    let text = raw.trim();
    if text.starts_with("```json") {
        text.replace("```json", "").replace("```", "").trim().to_string()
    } else if text.starts_with("```") {
        text.replace("```", "").trim().to_string()
    } else {
        text.to_string()
    }
}

/// Parses a model reply into a profile, falling back to the heuristic when the
/// cleaned reply is not a JSON object.
pub fn parse_profile(raw: &str) -> ParsedProfile {
    let cleaned = clean_model_response(raw);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(fields)) => ParsedProfile::Structured(read_fields(&fields)),
        _ => ParsedProfile::Heuristic(heuristic_profile(raw)),
    }
}

/// Line-based fallback: every line of the raw reply that survives cleaning is
/// taken as a skill, and a fixed generic review is substituted.
pub fn heuristic_profile(raw: &str) -> ProfileAnalysis {
    ProfileAnalysis {
        summary: FALLBACK_SUMMARY.to_string(),
        strengths: vec![FALLBACK_STRENGTH.to_string()],
        improvements: vec![FALLBACK_IMPROVEMENT.to_string()],
        skills: heuristic_skills(raw),
        experience_level: DEFAULT_EXPERIENCE_LEVEL.to_string(),
    }
}

fn heuristic_skills(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim().replace(['"', ','], "").trim().to_string())
        .filter(|line| {
            line.chars().count() > MIN_HEURISTIC_SKILL_CHARS
                && !line.starts_with('{')
                && !line.starts_with('}')
        })
        .collect()
}

fn read_fields(fields: &Map<String, Value>) -> ProfileAnalysis {
    ProfileAnalysis {
        summary: string_field(fields, "summary").unwrap_or_default(),
        strengths: list_field(fields, "strengths"),
        improvements: list_field(fields, "improvements"),
        skills: list_field(fields, "skills"),
        experience_level: string_field(fields, "experience_level")
            .unwrap_or_else(|| DEFAULT_EXPERIENCE_LEVEL.to_string()),
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(|v| v.as_str()).map(String::from)
}

/// Reads a list of strings; a missing or non-list field is empty and
/// non-string items are skipped.
fn list_field(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    fields
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;

    const FULL_REPLY: &str = r#"{
        "summary": "Backend engineer with five years of Python.",
        "strengths": ["API design", "Testing"],
        "improvements": ["Quantify impact"],
        "skills": ["Python", "Docker", "PostgreSQL"],
        "experience_level": "Mid"
    }"#;

    #[test]
    fn test_clean_strips_json_fences() {
        let input = "```json\n{\"skills\": [\"Rust\"]}\n```";
        assert_eq!(clean_model_response(input), "{\"skills\": [\"Rust\"]}");
    }

    #[test]
    fn test_clean_strips_bare_fences() {
        let input = "  ```\n{\"skills\": []}\n```  ";
        assert_eq!(clean_model_response(input), "{\"skills\": []}");
    }

    #[test]
    fn test_clean_leaves_unfenced_text() {
        assert_eq!(clean_model_response("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_structured_reply_is_read_in_full() {
        let parsed = parse_profile(FULL_REPLY);
        let ParsedProfile::Structured(analysis) = parsed else {
            panic!("expected structured parse");
        };
        assert_eq!(analysis.summary, "Backend engineer with five years of Python.");
        assert_eq!(analysis.strengths, vec!["API design", "Testing"]);
        assert_eq!(analysis.skills, vec!["Python", "Docker", "PostgreSQL"]);
        assert_eq!(analysis.experience_level, "Mid");
    }

    #[test]
    fn test_fenced_reply_is_structured() {
        let reply = format!("```json\n{FULL_REPLY}\n```");
        assert!(matches!(parse_profile(&reply), ParsedProfile::Structured(_)));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed = parse_profile(r#"{"summary": "Short"}"#);
        let analysis = parsed.into_analysis();
        assert_eq!(analysis.summary, "Short");
        assert!(analysis.skills.is_empty());
        assert!(analysis.strengths.is_empty());
        assert_eq!(analysis.experience_level, DEFAULT_EXPERIENCE_LEVEL);
    }

    #[test]
    fn test_non_string_skills_are_skipped() {
        let parsed = parse_profile(r#"{"skills": ["Go", 42, null, "Kafka"]}"#);
        assert_eq!(parsed.analysis().skills, vec!["Go", "Kafka"]);
    }

    #[test]
    fn test_json_that_is_not_an_object_falls_back() {
        let parsed = parse_profile(r#"["Python", "Docker"]"#);
        assert!(parsed.is_heuristic());
    }

    #[test]
    fn test_heuristic_filters_short_blank_and_brace_lines() {
        let raw = "Here are the skills:\n{\n  \"Python\",\n  \"Go\",\n\n  \"Docker\",\n}\nC\n";
        let parsed = parse_profile(raw);
        let ParsedProfile::Heuristic(analysis) = parsed else {
            panic!("expected heuristic parse");
        };
        assert_eq!(
            analysis.skills,
            vec!["Here are the skills:", "Python", "Docker"]
        );
        assert_eq!(analysis.summary, FALLBACK_SUMMARY);
        assert_eq!(analysis.strengths, vec![FALLBACK_STRENGTH]);
        assert_eq!(analysis.improvements, vec![FALLBACK_IMPROVEMENT]);
        assert_eq!(analysis.experience_level, DEFAULT_EXPERIENCE_LEVEL);
    }

    #[test]
    fn test_heuristic_drops_lines_starting_with_closing_brace() {
        let skills = heuristic_skills("}, \"Rust\"\nKubernetes");
        assert_eq!(skills, vec!["Kubernetes"]);
    }

    #[test]
    fn test_truncated_json_uses_heuristic() {
        let raw = "{\n\"skills\": [\n\"Python\",\n\"Terraform\"";
        let parsed = parse_profile(raw);
        assert!(parsed.is_heuristic());
        assert_eq!(
            parsed.analysis().skills,
            vec!["skills: [", "Python", "Terraform"]
        );
    }

    #[tokio::test]
    async fn test_analyze_cv_sends_text_and_parses_reply() {
        let model = ScriptedModel::replying(FULL_REPLY);
        let parsed = analyze_cv(&model, "Jane Doe, Python developer").await.unwrap();
        assert!(!parsed.is_heuristic());
        assert!(model.prompts()[0].contains("Jane Doe, Python developer"));
    }

    #[tokio::test]
    async fn test_analyze_cv_propagates_model_failure() {
        let model = ScriptedModel::failing(503);
        let err = analyze_cv(&model, "cv").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
