//! Prompt templates and canned replies.

use codementor_config::MentorConfig;
use codementor_protocols::{ChatTurn, ProblemContext, PromptTurn};

/// Instruction prefixed to every mentoring request.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert LeetCode programming mentor. \
Your goal is to help users solve problems without giving them the direct answer. \
You must adhere to the following rules:\n\
1. NEVER provide the full, correct code solution.\n\
2. Guide the user with Socratic questions, hints, and suggestions for debugging.\n\
3. Nudge them in the right direction. Ask things like, \"Have you considered what happens if the input array is empty?\".\n\
4. Stay strictly on the topic of the provided LeetCode problem. Refuse unrelated general knowledge or news questions.";

/// Server-side system prompt of the proxy.
pub const PROXY_SYSTEM_PROMPT: &str = "SYSTEM: You are an expert LeetCode programming mentor. \
Only answer questions related to the provided LeetCode problem. \
If the user asks unrelated general knowledge or news questions, refuse and ask them to focus on the problem. \
Provide hints and guiding questions, but do NOT provide full working code solutions.";

pub const GREETING_REPLY: &str =
    "Hi! I'm your coding mentor. Ask me about your approach, a bug you're chasing or an edge case, and I'll help you find the answer yourself.";

pub const OFF_TOPIC_REFUSAL: &str =
    "I can only help with the current coding problem. Let's stay focused: what part of the problem are you working on?";

/// Prefix of the notice shown when the gateway fails.
pub const ERROR_NOTICE: &str = "Sorry, I encountered an error. Please try again.";

pub const NO_RECOMMENDATIONS_NOTICE: &str =
    "Sorry, I couldn't generate recommendations for this problem right now.";

/// Concept label used when none could be determined.
pub const FALLBACK_CONCEPT: &str = "General";

const NO_CODE_YET: &str = "I haven't written any code yet.";

/// Opens the user's own words inside a context prompt.
const QUESTION_MARKER: &str = "My Question: \"";

const CONCEPT_PROMPT_LEAD: &str = "Based on the LeetCode problem title";
const RECOMMENDATION_PROMPT_LEAD: &str = "List 2-3 classic, essential LeetCode problems";

/// Notice shown for a gateway failure, carrying the underlying error.
pub fn error_notice(error: &str) -> String {
    format!("{} ({})", ERROR_NOTICE, error)
}

/// Ask for the single concept behind a problem.
pub fn concept_prompt(title: &str) -> String {
    format!(
        "{CONCEPT_PROMPT_LEAD} \"{title}\", what is the single most important data structure or algorithmic concept required to solve it efficiently?\n\
Respond with ONLY the name of the concept (e.g., \"Hash Table\", \"Two Pointers\", \"Dynamic Programming\", \"Binary Search\")."
    )
}

/// Ask for practice problems on `concept`, excluding `title`.
pub fn recommendation_prompt(concept: &str, title: &str) -> String {
    format!(
        "{RECOMMENDATION_PROMPT_LEAD} that are excellent for practicing the concept of \"{concept}\".\n\
Do not include the original problem \"{title}\".\n\
Provide your response as a valid JSON array of objects. Each object must have a \"title\" and a \"url\" key.\n\
Example format: [{{\"title\": \"Problem A\", \"url\": \"https://leetcode.com/problems/problem-a/\"}}]\n\
Respond with ONLY the JSON array and no other text or markdown."
    )
}

/// The user's query augmented with the problem page context.
pub fn context_prompt(ctx: &ProblemContext, query: &str, max_description_chars: usize) -> String {
    let description = truncate_chars(ctx.description.trim(), max_description_chars);
    let code = ctx
        .code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(NO_CODE_YET);
    format!(
        "Problem: {title}\n\
Problem Description: --- {description} ---\n\
My Current Code: --- {code} ---\n\
{QUESTION_MARKER}{query}\"",
        title = ctx.title.trim(),
    )
}

/// Build the gateway request for the latest user turn.
///
/// `history` is the transcript including that turn as its last element.
/// The result is the system instruction, the most recent prior turns and
/// the context-augmented final question.
pub fn build_prompt(history: &[ChatTurn], ctx: &ProblemContext, config: &MentorConfig) -> Vec<PromptTurn> {
    let Some((latest, prior)) = history.split_last() else {
        return vec![PromptTurn::system(SYSTEM_INSTRUCTION)];
    };
    let window = prior.len().saturating_sub(config.max_history_turns);

    let mut turns = Vec::with_capacity(prior.len() - window + 2);
    turns.push(PromptTurn::system(SYSTEM_INSTRUCTION));
    turns.extend(prior[window..].iter().map(PromptTurn::from));
    turns.push(PromptTurn::user(context_prompt(
        ctx,
        &latest.text,
        config.max_description_chars,
    )));
    turns
}

/// The words a user typed, recovered from a user turn.
///
/// Context prompts yield their quoted question. The concept and
/// recommendation prompts carry no user words and yield `None`. Any other
/// text is returned whole.
pub fn user_question(text: &str) -> Option<&str> {
    if let Some((_, rest)) = text.rsplit_once(QUESTION_MARKER) {
        let rest = rest.trim_end();
        return Some(rest.strip_suffix('"').unwrap_or(rest));
    }
    let lead = text.trim_start();
    if lead.starts_with(CONCEPT_PROMPT_LEAD) || lead.starts_with(RECOMMENDATION_PROMPT_LEAD) {
        None
    } else {
        Some(text)
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
