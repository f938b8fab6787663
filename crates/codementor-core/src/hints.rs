//! Generic short hints.

/// Fixed pool of topic-agnostic nudges. `{topic}` is replaced with the
/// problem's concept label.
pub const HINT_POOL: [&str; 7] = [
    "Think about which {topic} technique fits the constraints. What is the largest input you must handle?",
    "Work through the smallest example by hand first. What does your {topic} approach do at each step?",
    "What would you need to remember about elements you have already seen?",
    "Check your edge cases: empty input, a single element, duplicates and negative values.",
    "Can a brute-force version be written first? Then ask which repeated work {topic} could remove.",
    "Write down the invariant your loop maintains. Does it still hold after every iteration?",
    "Is there a way to sort, index or pre-process the input so each query becomes cheaper?",
];

/// Pick a hint deterministically.
///
/// With no previous hint the choice is derived from `seed` (the problem
/// key); otherwise the hint after `last` is used, so the same hint never
/// appears twice in a row.
pub fn pick_hint(seed: &str, last: Option<&str>) -> &'static str {
    let index = match last.and_then(|l| HINT_POOL.iter().position(|h| *h == l)) {
        Some(previous) => (previous + 1) % HINT_POOL.len(),
        None => seed.bytes().map(usize::from).sum::<usize>() % HINT_POOL.len(),
    };
    HINT_POOL[index]
}

/// Fill the topic placeholder of a pool entry.
pub fn render_hint(template: &str, topic: &str) -> String {
    template.replace("{topic}", topic)
}
