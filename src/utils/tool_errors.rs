use crate::errors::ToolError;
use crate::utils::suggest::suggest;

/// "Unknown tool" text with a did-you-mean hint and the list of names
/// that would have worked.
pub fn unknown_tool_message<'a, I>(tool: &str, known: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let known: Vec<&str> = known.into_iter().collect();
    let mut parts = vec![format!("Unknown tool: {}", tool)];
    let suggestions = suggest(tool, known.iter().copied(), 3);
    if !suggestions.is_empty() {
        parts.push(format!("Did you mean: {}?", suggestions.join(", ")));
    }
    if !known.is_empty() {
        parts.push(format!("Available: {}.", known.join(", ")));
    }
    parts.join(" ")
}

pub fn unknown_tool_error(tool: &str, known: &[&str]) -> ToolError {
    ToolError::not_found(unknown_tool_message(tool, known.iter().copied()))
        .with_details(serde_json::json!({ "known_tools": known }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_lists_suggestions_then_known_tools() {
        let message = unknown_tool_message(
            "human_get_custom_rule",
            ["human_get_custom_rules", "human_get_account_info"],
        );
        assert_eq!(
            message,
            "Unknown tool: human_get_custom_rule Did you mean: human_get_custom_rules? Available: human_get_custom_rules, human_get_account_info."
        );
    }

    #[test]
    fn error_is_not_found_with_details() {
        let err = unknown_tool_error("nope", &["human_get_custom_rules"]);
        assert_eq!(err.kind, crate::errors::ToolErrorKind::NotFound);
        assert!(err.message.starts_with("Unknown tool: nope"));
        assert!(err.details.is_some());
    }
}
