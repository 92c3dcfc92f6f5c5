// src/analysis/parser.rs — Decode the model's JSON verdict

use super::AmbiguityResult;
use crate::infra::errors::AnalysisError;

/// Parse the response text into an `AmbiguityResult`.
///
/// The text should be bare JSON because the request sets
/// `responseMimeType`, but a surrounding Markdown fence is tolerated.
pub fn parse_analysis(text: &str) -> Result<AmbiguityResult, AnalysisError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(AnalysisError::MalformedResponse("empty response".into()));
    }
    serde_json::from_str(body).map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string ("json") up to the first newline
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_ambiguous() {
        let text = r#"{"isAmbiguous":true,"clarifications":["Who is the actor?","What is the trigger?"],"summary":"Missing actor"}"#;
        let result = parse_analysis(text).unwrap();
        assert!(result.is_ambiguous);
        assert_eq!(result.clarifications.len(), 2);
        assert!(result.user_story.is_none());
        assert_eq!(result.summary, "Missing actor");
    }

    #[test]
    fn test_parse_story() {
        let text = r#"{"isAmbiguous":false,"clarifications":[],"userStory":"As an admin, I want to reset passwords, so that users regain access.","summary":"Clear"}"#;
        let result = parse_analysis(text).unwrap();
        assert!(!result.is_ambiguous);
        assert_eq!(
            result.user_story.as_deref(),
            Some("As an admin, I want to reset passwords, so that users regain access.")
        );
    }

    #[test]
    fn test_missing_clarifications_defaults_empty() {
        let result = parse_analysis(r#"{"isAmbiguous":false,"summary":"ok"}"#).unwrap();
        assert!(result.clarifications.is_empty());
    }

    #[test]
    fn test_fenced_json() {
        let text = "```json\n{\"isAmbiguous\":false,\"clarifications\":[],\"summary\":\"s\"}\n```";
        assert_eq!(parse_analysis(text).unwrap().summary, "s");
    }

    #[test]
    fn test_missing_summary_is_malformed() {
        let err = parse_analysis(r#"{"isAmbiguous":true,"clarifications":[]}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn test_prose_is_malformed() {
        let err = parse_analysis("I think this requirement is vague.").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn test_empty_is_malformed() {
        assert!(matches!(
            parse_analysis("   "),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }
}
