//! The two generation variants a workflow can be instantiated with.
//!
//! Both run the same state machine; they differ only in option fields,
//! prompt templates, storage key and user-facing wording.

use std::fmt::Debug;

use crate::history::{SAVED_POSTS_KEY, SAVED_PROMPTS_KEY};
use crate::prompts::{self, constrained, LengthCategory, SocialOptions};
use crate::proxy::{EnhancePromptBody, ProxyPayload, SocialPostBody};

/// User-facing wording for one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantLabels {
    pub submit: &'static str,
    pub loading: &'static str,
    pub placeholder: &'static str,
    pub missing_input: &'static str,
    pub missing_input_title: &'static str,
    pub missing_key: &'static str,
    pub missing_key_title: &'static str,
    pub failure_fallback: &'static str,
    pub copied: &'static str,
    pub copy_failed: &'static str,
    pub saved: &'static str,
    pub save_failed: &'static str,
}

pub trait GenerationKind: Send + Sync + 'static {
    type Options: Clone + Debug + Default + Send + Sync;

    /// Short name used in logs.
    const NAME: &'static str;
    const LABELS: VariantLabels;
    /// Storage key of this variant's saved items.
    const SAVED_KEY: &'static str;

    fn system_prompt(options: &Self::Options) -> String;

    fn user_prompt(input: &str, options: &Self::Options) -> String;

    /// Value recorded in the history entry's length/style field.
    fn history_tag(options: &Self::Options) -> String;

    fn proxy_payload(input: &str, options: &Self::Options) -> ProxyPayload;
}

// ---------------------------------------------------------------------------
// Prompt enhancement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptEnhancement;

impl GenerationKind for PromptEnhancement {
    type Options = LengthCategory;

    const NAME: &'static str = "prompt_enhancement";
    const LABELS: VariantLabels = VariantLabels {
        submit: "Enhance Prompt",
        loading: "Enhancing...",
        placeholder: "Your enhanced prompt will appear here",
        missing_input: "Please enter a prompt to enhance",
        missing_input_title: "Missing Prompt",
        missing_key: "Please enter your API key",
        missing_key_title: "API Key Required",
        failure_fallback: "Failed to enhance prompt",
        copied: "Copied to clipboard!",
        copy_failed: "Failed to copy text",
        saved: "Prompt saved successfully!",
        save_failed: "Failed to save prompt",
    };
    const SAVED_KEY: &'static str = SAVED_PROMPTS_KEY;

    fn system_prompt(length: &LengthCategory) -> String {
        prompts::enhancement_system_prompt(*length)
    }

    fn user_prompt(input: &str, _length: &LengthCategory) -> String {
        prompts::enhancement_user_prompt(input)
    }

    fn history_tag(length: &LengthCategory) -> String {
        length.to_string()
    }

    fn proxy_payload(input: &str, length: &LengthCategory) -> ProxyPayload {
        ProxyPayload::EnhancePrompt(EnhancePromptBody {
            prompt: Some(input.to_string()),
            tone: None,
            length: match length {
                LengthCategory::Auto => None,
                other => Some(other.to_string()),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Social post
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct SocialPost;

impl GenerationKind for SocialPost {
    type Options = SocialOptions;

    const NAME: &'static str = "social_post";
    const LABELS: VariantLabels = VariantLabels {
        submit: "Generate Post",
        loading: "Generating...",
        placeholder: "Your social media post will appear here",
        missing_input: "Please enter your post idea",
        missing_input_title: "Missing Post Idea",
        missing_key: "Please enter your API key",
        missing_key_title: "API Key Required",
        failure_fallback: "Failed to generate post",
        copied: "Copied to clipboard!",
        copy_failed: "Failed to copy text",
        saved: "Post saved successfully!",
        save_failed: "Failed to save post",
    };
    const SAVED_KEY: &'static str = SAVED_POSTS_KEY;

    fn system_prompt(options: &SocialOptions) -> String {
        prompts::social_system_prompt(options)
    }

    fn user_prompt(input: &str, options: &SocialOptions) -> String {
        prompts::social_user_prompt(input, options)
    }

    fn history_tag(options: &SocialOptions) -> String {
        options.tag()
    }

    fn proxy_payload(input: &str, options: &SocialOptions) -> ProxyPayload {
        // The server requires a platform, so "auto" is sent as the default.
        let platform = constrained(&options.platform).unwrap_or(prompts::DEFAULT_PLATFORM);
        ProxyPayload::SocialPost(SocialPostBody {
            platform: Some(platform.to_string()),
            topic: Some(input.to_string()),
            style: constrained(&options.formality).map(str::to_string),
            tone: constrained(&options.tone).map(str::to_string),
        })
    }
}
