//! Nutrition lookup
//!
//! Auto-fills a food item's nutrition by asking a chat-completion model for
//! a JSON record and validating what comes back.

mod chat;
mod parse;

use thiserror::Error;

use crate::models::FoodItemDraft;

pub use chat::{ChatCompletionLookup, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use parse::{draft_from_value, extract_json_object, parse_nutrition_content};

/// Message shown for any failed lookup that the user can simply retry
pub const RETRY_MESSAGE: &str = "Failed to retrieve nutrition information. Please try again.";

/// Lookup error types
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("API key is not set. Please provide a Groq API key.")]
    Credential,

    #[error("Nutrition lookup request failed{}: {message}", describe_status(status))]
    Transport { status: Option<u16>, message: String },

    #[error("Failed to parse nutrition information: {0}")]
    Parse(String),
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" with status {}", code),
        None => String::new(),
    }
}

impl LookupError {
    /// The message to surface to the user
    pub fn user_message(&self) -> String {
        match self {
            LookupError::Credential => self.to_string(),
            LookupError::Transport { .. } | LookupError::Parse(_) => RETRY_MESSAGE.to_string(),
        }
    }
}

/// Source of nutrition drafts for a food name
pub trait NutritionLookup: Send + Sync {
    fn lookup(&self, food_name: &str, credential: &str) -> Result<FoodItemDraft, LookupError>;
}
