//! Prompt templates for both generation variants and the proxy endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Option value meaning "no constraint".
pub const AUTO: &str = "auto";

pub const DEFAULT_PLATFORM: &str = "twitter";

/// Proxy defaults for omitted request fields.
pub const DEFAULT_PROXY_TONE: &str = "professional";
pub const DEFAULT_PROXY_LENGTH: &str = "medium";
pub const DEFAULT_PROXY_STYLE: &str = "informative";
pub const DEFAULT_PROXY_SOCIAL_TONE: &str = "friendly";

// ---------------------------------------------------------------------------
// Length category
// ---------------------------------------------------------------------------

/// Target length of an enhanced prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthCategory {
    #[default]
    Auto,
    Short,
    Medium,
    Long,
}

impl LengthCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            LengthCategory::Auto => "auto",
            LengthCategory::Short => "short",
            LengthCategory::Medium => "medium",
            LengthCategory::Long => "long",
        }
    }

    /// Sentence inserted into the enhancement system prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            LengthCategory::Short => "Keep the enhanced prompt concise, around 180 characters.",
            LengthCategory::Medium => {
                "The enhanced prompt should be moderately detailed, around 380-450 characters."
            }
            LengthCategory::Long => {
                "The enhanced prompt should be very detailed and comprehensive, around 600-700 characters."
            }
            LengthCategory::Auto => {
                "The length of the enhanced prompt should be appropriate for the input."
            }
        }
    }
}

impl fmt::Display for LengthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthCategory {
    type Err = std::convert::Infallible;

    /// Unknown values select [`LengthCategory::Auto`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "short" => LengthCategory::Short,
            "medium" => LengthCategory::Medium,
            "long" => LengthCategory::Long,
            _ => LengthCategory::Auto,
        })
    }
}

// ---------------------------------------------------------------------------
// Prompt enhancement
// ---------------------------------------------------------------------------

pub fn enhancement_system_prompt(length: LengthCategory) -> String {
    format!(
        "You are an expert prompt engineer. Enhance the following raw text into a professionally engineered, ready to use AI prompt.\n\
         Make it clear, structured, powerful, and optimized for high-quality outputs.\n\
         {}\n\n\
         Important: Only return the enhanced prompt, no additional text, explanations, or markdown formatting.",
        length.instruction()
    )
}

pub fn enhancement_user_prompt(prompt: &str) -> String {
    format!("Enhance this text into a high-quality AI prompt: {prompt}")
}

// ---------------------------------------------------------------------------
// Social post
// ---------------------------------------------------------------------------

/// Chip-group selections for a social post. Each field may be [`AUTO`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialOptions {
    pub platform: String,
    pub tone: String,
    pub formality: String,
}

impl Default for SocialOptions {
    fn default() -> Self {
        Self {
            platform: DEFAULT_PLATFORM.to_string(),
            tone: AUTO.to_string(),
            formality: AUTO.to_string(),
        }
    }
}

/// `None` when the value is blank or `auto`.
pub fn constrained(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(AUTO) {
        None
    } else {
        Some(value)
    }
}

impl SocialOptions {
    /// Tag stored in history entries, e.g. `twitter/casual/auto`.
    pub fn tag(&self) -> String {
        format!("{}/{}/{}", self.platform, self.tone, self.formality)
    }
}

pub fn social_system_prompt(options: &SocialOptions) -> String {
    let mut details = String::new();
    if let Some(platform) = constrained(&options.platform) {
        details.push_str(&format!("- Platform: {platform}\n"));
    }
    if let Some(tone) = constrained(&options.tone) {
        details.push_str(&format!("- Tone: {tone}\n"));
    }
    if let Some(formality) = constrained(&options.formality) {
        details.push_str(&format!("- Formality: {formality}\n"));
    }
    if details.is_empty() {
        details.push_str("- Choose whatever platform conventions, tone and formality suit the idea.\n");
    }

    format!(
        "You are a professional social media content creator. Generate an engaging, platform-optimized social media post based on the following details:\n\
         {details}\n\
         Formatting rules:\n\
         - Do not start the post with an emoji.\n\
         - Use exactly one emoji, placed at the very end of the post text.\n\
         - After one line break, add a final line with at most 2 hashtags.\n\
         Make sure the post is engaging and on-brand."
    )
}

pub fn social_user_prompt(idea: &str, options: &SocialOptions) -> String {
    let mut request = String::from("Generate a");
    if let Some(tone) = constrained(&options.tone) {
        request.push_str(&format!(" {tone}"));
    }
    request.push_str(" social media post");
    if let Some(platform) = constrained(&options.platform) {
        request.push_str(&format!(" for {platform}"));
    }
    if let Some(formality) = constrained(&options.formality) {
        request.push_str(&format!(" with {formality} formality"));
    }
    format!("{request} based on this idea: {idea}")
}

// ---------------------------------------------------------------------------
// Proxy endpoint templates
// ---------------------------------------------------------------------------

pub fn proxy_enhance_system_prompt(tone: &str, length: &str) -> String {
    format!(
        "You are a prompt enhancement AI. Enhance the following prompt to be more {tone} and {length} in length."
    )
}

pub fn proxy_social_system_prompt(platform: &str, topic: &str, style: &str, tone: &str) -> String {
    format!(
        "You are a social media content creator. Generate a {style} {tone} post for {platform} about: {topic}."
    )
}
