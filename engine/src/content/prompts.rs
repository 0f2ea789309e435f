//! Prompt construction
//!
//! The system instruction is the brand voice, then the channel's style rules,
//! then an optional tone line. The user instruction states the topic and the
//! request's constraints.

use sdk::types::{Channel, Tone};

use super::ContentRequest;

/// Fixed brand voice shared by every channel
pub const BRAND_VOICE: &str = "\
You write for a manifestation and guided-meditation app.
Brand voice:
- Warm, grounded and encouraging; never preachy or salesy
- Speak to the reader directly as \"you\"
- Favour concrete practices (a breath, a journaling prompt, a visualisation) over abstract promises
- Never make medical, financial or guaranteed-outcome claims
- Plain language; no jargon unless you explain it";

const TWITTER_STYLE: &str = "\
Channel: Twitter / X.
- One idea per post, punchy first line
- Short sentences, line breaks are fine
- Hashtags at the end, never more than three";

const REDDIT_STYLE: &str = "\
Channel: Reddit.
- Write like a community member sharing experience, not a brand
- Open with context or a personal angle, then the practice
- No hashtags, no emoji, no marketing language
- End with a genuine question to invite discussion";

const BLOG_STYLE: &str = "\
Channel: long-form blog article.
- Start with a title line, then a short hook paragraph
- Use clear section headings and short paragraphs
- Include at least one step-by-step practice the reader can try today
- Close with a brief summary and a gentle next step";

const EMAIL_STYLE: &str = "\
Channel: newsletter email.
- First line is the subject line, prefixed with \"Subject:\"
- Personal greeting, then one focused idea
- Keep paragraphs to two or three sentences
- One clear call to action near the end";

const TIKTOK_STYLE: &str = "\
Channel: TikTok video caption.
- Hook in the first five words
- Conversational, energetic, made to be read in two seconds
- Emoji welcome, hashtags at the end";

const INSTAGRAM_STYLE: &str = "\
Channel: Instagram caption.
- Open with a line that stops the scroll
- Short paragraphs separated by blank lines
- Emoji used sparingly as visual anchors
- Hashtag block at the very end";

/// Channel-specific style rules
pub fn channel_style(channel: Channel) -> &'static str {
    match channel {
        Channel::Twitter => TWITTER_STYLE,
        Channel::Reddit => REDDIT_STYLE,
        Channel::Blog => BLOG_STYLE,
        Channel::Email => EMAIL_STYLE,
        Channel::TikTok => TIKTOK_STYLE,
        Channel::Instagram => INSTAGRAM_STYLE,
    }
}

fn tone_line(tone: Tone) -> String {
    let description = match tone {
        Tone::Inspirational => "uplifting and hopeful",
        Tone::Educational => "clear and explanatory, teach one thing well",
        Tone::Conversational => "relaxed, like talking to a friend",
        Tone::Professional => "calm, credible and precise",
        Tone::Casual => "light and informal",
        Tone::Playful => "witty and gently humorous",
    };
    format!("Tone: {} ({}).", tone, description)
}

/// Build the system-level instruction for a request.
pub fn build_system_prompt(request: &ContentRequest) -> String {
    let mut prompt = String::with_capacity(BRAND_VOICE.len() + 512);
    prompt.push_str(BRAND_VOICE);
    prompt.push_str("\n\n");
    prompt.push_str(channel_style(request.channel));

    if let Some(tone) = request.tone {
        prompt.push_str("\n\n");
        prompt.push_str(&tone_line(tone));
    }

    if let Some(style) = request.style.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str("\nStyle notes: ");
        prompt.push_str(style);
    }

    prompt
}

/// Build the user-level instruction for a request.
pub fn build_user_prompt(request: &ContentRequest) -> String {
    let audience = if request.audience.is_empty() {
        "anyone curious about meditation and manifestation".to_string()
    } else {
        request.audience.join(", ")
    };

    let mut lines = vec![
        format!("Write a {} post about: {}", request.channel, request.topic),
        format!("Target audience: {}", audience),
        format!("Maximum length: {} characters", request.max_length),
        if request.include_hashtags {
            "Include 1-3 relevant hashtags.".to_string()
        } else {
            "Do not include hashtags.".to_string()
        },
        if request.include_cta {
            "End with a clear call to action.".to_string()
        } else {
            "Do not include a call to action.".to_string()
        },
    ];

    if let Some(context) = request.context.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        lines.push(format!("Additional context: {}", context));
    }

    lines.push("Return only the post text, with no preamble.".to_string());
    lines.join("\n")
}
