//! Content generation behind the three student tools.
//!
//! Callers only see these traits; [`fixture::FixtureGenerator`] is the one
//! implementation and answers with canned content.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    core::error::AppError,
    model::{essay_idea::NewEssayIdea, lab::Lab, professor::Professor},
    profile::ProfileData,
};

pub mod fixture;

/// MIME types an essay upload may have: .doc, .docx, .txt and .pdf.
pub const ESSAY_CONTENT_TYPES: [&str; 4] = [
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "application/pdf",
];

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FeedbackScore {
    pub category: String,
    pub score: u8,
    pub description: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct EssayFeedback {
    pub scores: Vec<FeedbackScore>,
    pub suggestions: Vec<String>,
}

/// An essay handed to a grader.
#[derive(Clone, Debug)]
pub struct EssayDocument {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub fn validate_essay_content_type(content_type: &str) -> Result<(), AppError> {
    if ESSAY_CONTENT_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(
            "Please upload a .doc, .docx, .txt, or .pdf file".to_string(),
        ))
    }
}

#[async_trait]
pub trait ResearchEmailGenerator: Send + Sync {
    async fn draft_email(
        &self,
        lab: &Lab,
        professor: &Professor,
        profile: Option<&ProfileData>,
    ) -> Result<String, AppError>;
}

#[async_trait]
pub trait EssayIdeaGenerator: Send + Sync {
    async fn generate_ideas(
        &self,
        prompt: &str,
        profile: Option<&ProfileData>,
    ) -> Result<Vec<NewEssayIdea>, AppError>;
}

#[async_trait]
pub trait EssayGrader: Send + Sync {
    async fn grade(&self, essay: &EssayDocument) -> Result<EssayFeedback, AppError>;
}
