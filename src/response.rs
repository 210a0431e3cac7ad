use crate::error::ParseError;
use serde::de::DeserializeOwned;

/// Removes a surrounding markdown code fence (```json ... ``` or ``` ... ```).
///
/// Text before an opening fence is dropped as well, since models sometimes
/// prefix the payload with a sentence.
pub fn strip_code_blocks(s: &str) -> String {
    let s = s.trim();
    let Some(start) = s.find("```") else {
        return s.to_string();
    };

    let after_fence = &s[start + 3..];
    // Skip the language tag on the opening fence line, if any.
    let body = match after_fence.find('\n') {
        Some(nl) if after_fence[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &after_fence[nl + 1..]
        }
        _ => after_fence.trim_start_matches("json"),
    };

    match body.find("```") {
        Some(end) => body[..end].trim().to_string(),
        None => body.trim().to_string(),
    }
}

/// Strict deserialization of a model payload into `T`, after fence stripping.
pub fn parse_structured<T: DeserializeOwned>(
    target: &'static str,
    response: &str,
) -> Result<T, ParseError> {
    let clean_json = strip_code_blocks(response);
    serde_json::from_str(&clean_json).map_err(|source| ParseError {
        target,
        source,
        payload: clean_json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StoryPlan;

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("json"), "json");
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("  ```json  \n  {}  \n  ```  "), "{}");
        assert_eq!(strip_code_blocks("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_blocks("```{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(
            strip_code_blocks("Here is the plan:\n```json\n{\"a\":1}\n```\nEnjoy!"),
            "{\"a\":1}"
        );
    }

    #[test]
    fn test_parse_structured_plan() {
        let payload = r#"```json
{
  "title": "Milo Shares His Mangoes",
  "main_characters": ["Milo, a curious monkey", "Tara, a shy parrot"],
  "setting_description": "A warm jungle by the river",
  "plot_outline": "Milo finds mangoes, hesitates, then shares.",
  "moral_integration": "Sharing makes the feast sweeter."
}
```"#;
        let plan: StoryPlan = parse_structured("story plan", payload).unwrap();
        assert_eq!(plan.title, "Milo Shares His Mangoes");
        assert_eq!(plan.main_characters.len(), 2);
    }

    #[test]
    fn test_parse_structured_rejects_missing_fields() {
        let err = parse_structured::<StoryPlan>("story plan", r#"{"title": "Only a title"}"#)
            .unwrap_err();
        assert_eq!(err.target, "story plan");
        assert!(err.to_string().contains("missing field"));
        assert_eq!(err.payload, r#"{"title": "Only a title"}"#);
    }

    #[test]
    fn test_parse_structured_rejects_prose() {
        let err = parse_structured::<StoryPlan>("story plan", "Once upon a time...").unwrap_err();
        assert!(err.source.is_syntax());
    }
}
