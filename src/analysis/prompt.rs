// src/analysis/prompt.rs — Analyst persona and the JSON schema the model must fill

/// Injected as the `system` field of every analysis call.
pub const SYSTEM_INSTRUCTION: &str = "\
You are an expert Senior Business Analyst and Requirements Engineer.
Your goal is to help users transform vague requirements into high-quality, unambiguous User Stories.

PROCESS:
1. Analyze the provided requirement for ambiguity (vagueness, missing actors, unclear actions, missing outcomes, or contradictions).
2. If ambiguity exists:
   - Identify specific points of confusion.
   - Formulate clear, concise clarification questions.
3. If the requirement is clear (or becomes clear after user answers):
   - Generate a professional User Story in the format: \"As a [role], I want [action], so that [benefit]\".
   - Include 3-5 key Acceptance Criteria.

RESPONSE FORMAT:
You MUST respond in valid JSON matching this schema:
{
  \"isAmbiguous\": boolean,
  \"clarifications\": string[], (Empty if not ambiguous)
  \"userStory\": string, (Empty if ambiguous)
  \"summary\": string (Brief summary of your findings)
}
";

/// Gemini `responseSchema` for `AmbiguityResult`.
pub fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "isAmbiguous": { "type": "BOOLEAN" },
            "clarifications": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "userStory": { "type": "STRING" },
            "summary": { "type": "STRING" }
        },
        "required": ["isAmbiguous", "clarifications", "summary"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_core_fields() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required, vec!["isAmbiguous", "clarifications", "summary"]);
        // userStory is optional
        assert!(schema["properties"]["userStory"].is_object());
    }

    #[test]
    fn test_instruction_mentions_every_field() {
        for field in ["isAmbiguous", "clarifications", "userStory", "summary"] {
            assert!(SYSTEM_INSTRUCTION.contains(field), "missing {field}");
        }
    }
}
