//! Post-processing and lightweight text analysis
//!
//! Cleans raw provider output and derives the metadata attached to generated
//! content: hashtags, frequent keywords and a heuristic engagement estimate.
//! `extract_keywords` is also what agent memory uses to pick best topics.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Words must be longer than this many characters to count as keywords
const MIN_KEYWORD_CHARS: usize = 4;

/// Base engagement estimate before bonuses
const ENGAGEMENT_BASE: u32 = 50;
const QUESTION_BONUS: u32 = 10;
const EMOJI_BONUS: u32 = 10;
const CTA_BONUS: u32 = 15;
const HASHTAG_BONUS: u32 = 10;

/// Verbs and phrases that read as a call to action
const CTA_PHRASES: &[&str] = &[
    "join",
    "try",
    "share",
    "comment",
    "follow",
    "subscribe",
    "click",
    "download",
    "discover",
    "start",
    "sign up",
    "learn more",
    "tap",
    "save this",
];

const QUOTE_PAIRS: &[(char, char)] = &[('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')];

static HASHTAG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn hashtag_regex() -> &'static Regex {
    HASHTAG_PATTERN
        .get_or_init(|| Regex::new(r"#[\p{L}\p{N}_]+").expect("Invalid hashtag pattern"))
}

/// Strip code fences and wrapping quote characters from raw provider output.
pub fn clean_response(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the language tag line, if any
        text = match rest.find('\n') {
            Some(pos) => &rest[pos + 1..],
            None => rest,
        };
        text = text.trim_end();
        if let Some(body) = text.strip_suffix("```") {
            text = body;
        }
        text = text.trim();
    }

    loop {
        let unwrapped = QUOTE_PAIRS.iter().find_map(|(open, close)| {
            text.strip_prefix(*open)
                .and_then(|t| t.strip_suffix(*close))
        });
        match unwrapped {
            Some(inner) if !inner.trim().is_empty() => text = inner.trim(),
            _ => break,
        }
    }

    text.to_string()
}

/// Hashtags in order of appearance, deduplicated case-insensitively.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    let mut tags = Vec::new();
    for m in hashtag_regex().find_iter(text) {
        let lowered = m.as_str().to_lowercase();
        if !seen.contains(&lowered) {
            seen.push(lowered);
            tags.push(m.as_str().to_string());
        }
    }
    tags
}

/// The `limit` most frequent words longer than four characters.
///
/// Words are case-folded and stripped of punctuation. Ties keep the order of
/// first appearance, so the result is deterministic for a given text.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in normalized.split_whitespace() {
        if word.chars().count() <= MIN_KEYWORD_CHARS {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // Stable sort keeps first-appearance order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order
        .into_iter()
        .take(limit)
        .map(String::from)
        .collect()
}

/// True if the text contains at least one emoji-range character.
pub fn contains_emoji(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c as u32,
            0x1F300..=0x1FAFF   // pictographs, emoticons, transport, supplemental symbols
            | 0x2600..=0x27BF   // misc symbols and dingbats
            | 0x1F1E6..=0x1F1FF // regional indicators
        )
    })
}

/// True if the text contains a call-to-action phrase as a whole word.
pub fn contains_call_to_action(text: &str) -> bool {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let joined = words.join(" ");

    CTA_PHRASES.iter().any(|phrase| {
        if phrase.contains(' ') {
            format!(" {} ", joined).contains(&format!(" {} ", phrase))
        } else {
            words.contains(phrase)
        }
    })
}

/// Naive 0-100 engagement estimate.
///
/// Starts at 50 and adds a fixed bonus for a question, an emoji, a call to
/// action and hashtags.
pub fn estimate_engagement(text: &str, hashtags: &[String]) -> u32 {
    let mut score = ENGAGEMENT_BASE;
    if text.contains('?') {
        score += QUESTION_BONUS;
    }
    if contains_emoji(text) {
        score += EMOJI_BONUS;
    }
    if contains_call_to_action(text) {
        score += CTA_BONUS;
    }
    if !hashtags.is_empty() {
        score += HASHTAG_BONUS;
    }
    score.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_fences() {
        let raw = "```markdown\nBreathe in, breathe out.\n```";
        assert_eq!(clean_response(raw), "Breathe in, breathe out.");
    }

    #[test]
    fn test_clean_strips_bare_fence() {
        assert_eq!(clean_response("```\nhello\n```"), "hello");
    }

    #[test]
    fn test_clean_strips_wrapping_quotes() {
        assert_eq!(clean_response("\"Be here now.\""), "Be here now.");
        assert_eq!(clean_response("“Be here now.”"), "Be here now.");
        assert_eq!(clean_response("  '\"nested\"'  "), "nested");
    }

    #[test]
    fn test_clean_keeps_inner_quotes() {
        let text = "She said \"yes\" to herself";
        assert_eq!(clean_response(text), text);
    }

    #[test]
    fn test_clean_keeps_lone_quote() {
        assert_eq!(clean_response("\""), "\"");
    }

    #[test]
    fn test_extract_hashtags() {
        let tags = extract_hashtags("Start today #Gratitude #mindful_living and #gratitude again");
        assert_eq!(tags, vec!["#Gratitude", "#mindful_living"]);
    }

    #[test]
    fn test_extract_keywords_frequency_then_first_seen() {
        let text = "Gratitude changes everything. Gratitude, daily! Breathe, breathe slowly. Peace.";
        let keywords = extract_keywords(text, 5);
        assert_eq!(
            keywords,
            vec!["gratitude", "breathe", "changes", "everything", "daily"]
        );
    }

    #[test]
    fn test_extract_keywords_skips_short_words() {
        let keywords = extract_keywords("calm calm calm rest rest stillness", 5);
        assert_eq!(keywords, vec!["stillness"]);
    }

    #[test]
    fn test_extract_keywords_strips_punctuation() {
        let keywords = extract_keywords("Don't stop #manifesting!!! manifesting.", 5);
        assert_eq!(keywords, vec!["manifesting"]);
    }

    #[test]
    fn test_extract_keywords_limit() {
        let keywords = extract_keywords("alpha1 bravo2 charlie delta4 echo55 foxtrot", 3);
        assert_eq!(keywords.len(), 3);
    }

    #[test]
    fn test_contains_emoji() {
        assert!(contains_emoji("Good morning ☀"));
        assert!(contains_emoji("Let's go 🙏"));
        assert!(!contains_emoji("plain text"));
    }

    #[test]
    fn test_contains_call_to_action() {
        assert!(contains_call_to_action("Join us tonight"));
        assert!(contains_call_to_action("Tap the link to learn more."));
        assert!(!contains_call_to_action("Joining is optional"));
    }

    #[test]
    fn test_engagement_base() {
        assert_eq!(estimate_engagement("A quiet thought.", &[]), 50);
    }

    #[test]
    fn test_engagement_all_bonuses() {
        let text = "Ready to begin? Join the morning circle 🌅";
        let tags = vec!["#calm".to_string()];
        assert_eq!(estimate_engagement(text, &tags), 95);
    }
}
