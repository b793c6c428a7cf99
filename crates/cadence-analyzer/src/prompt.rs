use cadence_core::CadenceError;

use crate::summarizer::StatsSummaryPayload;

const SYSTEM_PROMPT: &str = "\
You write short assessments of a software project's commit activity for a \
project review dashboard.

Rules:
- Write 2 to 3 sentences of plain prose, no lists, no headings
- Be neutral and factual; describe the pace and distribution of the work
- Mention the detected flags, if any, in plain words
- Do not mention automation, bots, AI, or generated content
- Do not speculate about the people involved";

/// Build the system prompt for the summary LLM.
///
/// # Examples
///
/// ```
/// use cadence_analyzer::prompt::build_system_prompt;
///
/// let prompt = build_system_prompt();
/// assert!(prompt.contains("2 to 3 sentences"));
/// ```
pub fn build_system_prompt() -> String {
    SYSTEM_PROMPT.to_string()
}

/// Build the user prompt carrying the statistics as JSON.
///
/// # Errors
///
/// Returns [`CadenceError::Serialization`] if the payload cannot be encoded.
pub fn build_summary_prompt(payload: &StatsSummaryPayload) -> Result<String, CadenceError> {
    let stats = serde_json::to_string_pretty(payload)?;
    Ok(format!(
        "Summarize the commit activity described by these statistics:\n\n```json\n{stats}\n```\n"
    ))
}

/// Normalize a model reply into summary text.
///
/// Trims whitespace, strips code fences and one pair of surrounding quotes.
/// Returns `None` when nothing is left.
///
/// # Examples
///
/// ```
/// use cadence_analyzer::prompt::clean_summary;
///
/// assert_eq!(clean_summary("  \"Steady work.\" \n").as_deref(), Some("Steady work."));
/// assert_eq!(clean_summary("   "), None);
/// ```
pub fn clean_summary(response: &str) -> Option<String> {
    let mut text = response.trim();

    if let Some(inner) = text.strip_prefix("```") {
        // Drop an optional language tag on the fence line.
        let inner = inner.split_once('\n').map_or("", |(_, rest)| rest);
        text = inner.strip_suffix("```").unwrap_or(inner).trim();
    }

    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            text = text[1..text.len() - 1].trim();
            break;
        }
    }

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use cadence_core::MessagePattern;

    use super::*;

    fn payload() -> StatsSummaryPayload {
        StatsSummaryPayload {
            total_commits: 16,
            active_days: 2,
            max_commits_in_a_day: 15,
            avg_commits_per_day: 8.0,
            commit_message_pattern: MessagePattern::ShortGeneric,
            flags: vec!["Unusually high activity on a single day".into()],
        }
    }

    #[test]
    fn system_prompt_forbids_mentioning_ai() {
        let prompt = build_system_prompt();
        assert!(prompt.contains("Do not mention automation"));
        assert!(prompt.contains("neutral and factual"));
    }

    #[test]
    fn summary_prompt_embeds_payload_fields() {
        let prompt = build_summary_prompt(&payload()).unwrap();
        assert!(prompt.contains("\"totalCommits\": 16"));
        assert!(prompt.contains("\"maxCommitsInADay\": 15"));
        assert!(prompt.contains("mostly short generic messages"));
        assert!(prompt.contains("Unusually high activity on a single day"));
    }

    #[test]
    fn clean_strips_code_fences() {
        let reply = "```text\nActivity was concentrated in two days.\n```";
        assert_eq!(
            clean_summary(reply).as_deref(),
            Some("Activity was concentrated in two days.")
        );
    }

    #[test]
    fn clean_keeps_inner_quotes() {
        let reply = "The team's pace was \"steady\".";
        assert_eq!(clean_summary(reply).as_deref(), Some(reply));
    }

    #[test]
    fn clean_rejects_empty_quotes() {
        assert_eq!(clean_summary("\"  \""), None);
        assert_eq!(clean_summary("```\n```"), None);
    }
}
