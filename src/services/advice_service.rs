//! Wellness tips and dietary advice from the text-generation service.
//!
//! Failures never propagate: the caller always gets displayable text.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::warn;

use crate::domain::models::TestRecord;
use crate::domain::ports::TextGenerator;

pub const TIPS_FALLBACK: &str = "Unable to generate tips at this time.";
pub const DIET_FALLBACK: &str = "Sorry, there was an error getting your dietary advice.";
pub const NO_SCORES_MESSAGE: &str = "Take a mental health test to get personalized tips.";

/// Suggested dietary topics.
pub const DIET_TOPICS: &[&str] = &[
    "weight loss plan",
    "balanced diet",
    "high-protein diet",
    "low-carb diet",
    "vegetarian diet",
    "keto diet",
    "intermittent fasting",
    "healthy meal plans",
    "heart-healthy diet",
    "diabetes-friendly diet",
    "meal prepping",
    "nutrition for muscle gain",
    "detox diet",
    "vitamin-rich foods",
    "hydration tips",
    "healthy snacks",
    "immune-boosting foods",
    "foods for better digestion",
    "foods for glowing skin",
    "healthy breakfasts",
    "meal plans for athletes",
    "diet for weight maintenance",
    "mindful eating",
    "portion control",
    "anti-inflammatory foods",
    "meal planning for busy people",
];

pub struct AdviceService<G: TextGenerator + ?Sized> {
    generator: Arc<G>,
}

impl<G: TextGenerator + ?Sized> AdviceService<G> {
    pub fn new(generator: Arc<G>) -> Self {
        Self { generator }
    }

    /// Three tips based on the latest screening scores.
    pub async fn mental_health_tips(&self, tests: &BTreeMap<String, TestRecord>) -> String {
        if tests.is_empty() {
            return NO_SCORES_MESSAGE.to_string();
        }
        self.generate(&tips_prompt(tests), TIPS_FALLBACK).await
    }

    /// Advice on a dietary topic; any non-empty topic is accepted.
    pub async fn diet_advice(&self, topic: &str) -> String {
        let topic = topic.trim();
        if topic.is_empty() {
            return DIET_FALLBACK.to_string();
        }
        self.generate(&diet_prompt(topic), DIET_FALLBACK).await
    }

    async fn generate(&self, prompt: &str, fallback: &str) -> String {
        match self.generator.complete(prompt).await {
            Ok(text) if !text.trim().is_empty() => render_plain(&text),
            Ok(_) => {
                warn!("text generation returned an empty response");
                fallback.to_string()
            }
            Err(e) => {
                warn!(error = %e, "text generation failed");
                fallback.to_string()
            }
        }
    }
}

pub fn tips_prompt(tests: &BTreeMap<String, TestRecord>) -> String {
    let scores = tests
        .iter()
        .map(|(name, record)| format!("{name}: {:.0}%", record.last_score))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Based on these mental health test scores: {scores}. Provide 3 personalized tips for \
         improving mental well-being. Format the response with bullet points and keep it concise \
         and actionable."
    )
}

pub fn diet_prompt(topic: &str) -> String {
    format!(
        "Provide detailed information about {topic} for a healthy body. Include meal suggestions, \
         tips, and best practices. Format the response with clear sections and bullet points for \
         better readability."
    )
}

/// Flatten light markdown into terminal text: headers upper-cased, bold
/// markers dropped, list items turned into bullets.
pub fn render_plain(text: &str) -> String {
    let mut out = String::new();
    let mut blank_run = 0;
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            blank_run += 1;
            if blank_run == 1 && !out.is_empty() {
                out.push('\n');
            }
            continue;
        }
        blank_run = 0;

        let line = line.replace("**", "");
        let rendered = if let Some(header) = strip_header(&line) {
            header.to_uppercase()
        } else if let Some(item) = strip_list_marker(&line) {
            format!("• {item}")
        } else {
            line
        };
        let _ = writeln!(out, "{rendered}");
    }
    out.trim_end().to_string()
}

fn strip_header(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    (rest.len() < line.len() && rest.starts_with(' ')).then(|| rest.trim())
}

fn strip_list_marker(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(rest.trim());
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        return line[digits..].strip_prefix(". ").map(str::trim);
    }
    None
}
