// ABOUTME: The first-valid-choice scan shared by all agents.
// ABOUTME: Tries each model completion in order until one parses and validates; failures are logged and skipped.

/// Why a single completion choice was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ChoiceError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Scan completion choices in order, returning the first that `parse`
/// accepts. Rejected choices are logged at warn level; `None` means every
/// choice was rejected.
pub fn first_valid<T>(
    choices: &[String],
    parse: impl Fn(&str) -> Result<T, ChoiceError>,
) -> Option<T> {
    for (index, choice) in choices.iter().enumerate() {
        match parse(choice.trim()) {
            Ok(value) => {
                tracing::debug!(choice = index, "found valid completion choice");
                return Some(value);
            }
            Err(e) => {
                tracing::warn!(choice = index, error = %e, "rejecting completion choice");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reply {
        response: String,
    }

    fn parse_reply(text: &str) -> Result<Reply, ChoiceError> {
        let reply: Reply = serde_json::from_str(text)?;
        if reply.response.is_empty() {
            return Err(ChoiceError::Invalid("response is empty".to_string()));
        }
        Ok(reply)
    }

    #[test]
    fn returns_first_valid_choice() {
        let choices = vec![
            "not json at all".to_string(),
            r#"{"response": ""}"#.to_string(),
            r#"{"response": "third time lucky"}"#.to_string(),
        ];

        let reply = first_valid(&choices, parse_reply).unwrap();
        assert_eq!(reply.response, "third time lucky");
    }

    #[test]
    fn returns_none_when_all_rejected() {
        let choices = vec!["{}".to_string(), "garbage".to_string()];
        assert!(first_valid(&choices, parse_reply).is_none());
    }

    #[test]
    fn trims_whitespace_before_parsing() {
        let choices = vec!["  {\"response\": \"ok\"}\n".to_string()];
        assert!(first_valid(&choices, parse_reply).is_some());
    }

    #[test]
    fn empty_choice_list_yields_none() {
        assert!(first_valid(&[], parse_reply).is_none());
    }
}
