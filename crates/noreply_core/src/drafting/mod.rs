//! Seam for the external AI drafting collaborator.
//!
//! # Responsibility
//! - Define the generator contract and the prompt it receives.
//! - Store generated text only after generation succeeded.
//!
//! # Invariants
//! - Generated text is opaque; core never parses or validates it.
//! - A failed generation performs no write.

use crate::model::follow_up::FollowUp;
use crate::model::tone::Tone;
use crate::repo::substrate::KvSubstrate;
use crate::service::follow_up_service::FollowUpService;
use crate::service::ServiceError;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Text used when the generator returns nothing usable.
pub const DRAFT_FALLBACK_TEXT: &str = "AI could not generate a draft.";

/// Input handed to the drafting collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRequest {
    pub recipient_name: String,
    pub context: String,
    pub tone: Tone,
}

/// Generation failure reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// Backend could not be reached or refused the call.
    Offline(String),
    /// Backend answered but generation failed.
    Generation(String),
}

impl Display for DraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offline(details) => write!(f, "drafting backend offline: {details}"),
            Self::Generation(details) => write!(f, "draft generation failed: {details}"),
        }
    }
}

impl Error for DraftError {}

/// External message generator.
pub trait DraftGenerator {
    fn generate(&self, request: &DraftRequest) -> Result<String, DraftError>;
}

/// Failure of a draft-and-store flow.
#[derive(Debug)]
pub enum DraftFlowError {
    Draft(DraftError),
    Service(ServiceError),
}

impl Display for DraftFlowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DraftFlowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Draft(err) => Some(err),
            Self::Service(err) => Some(err),
        }
    }
}

impl From<DraftError> for DraftFlowError {
    fn from(value: DraftError) -> Self {
        Self::Draft(value)
    }
}

impl From<ServiceError> for DraftFlowError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// Renders the instruction prompt sent to a text generator.
pub fn build_draft_prompt(request: &DraftRequest) -> String {
    format!(
        "Task: Write a follow-up message for {recipient}.\n\
         Context: {context}\n\
         Tone Style: {style}\n\
         \n\
         Rules:\n\
         - If the recipient name is provided, use it.\n\
         - Focus on a clear call to action.\n\
         - Keep it under 150 words.\n\
         - Provide ONLY the message text. No subject lines.\n",
        recipient = request.recipient_name.trim(),
        context = request.context.trim(),
        style = request.tone.style_instruction(),
    )
}

/// Trims generator output; blank output becomes `DRAFT_FALLBACK_TEXT`.
pub fn normalize_draft(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DRAFT_FALLBACK_TEXT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Generates a draft and stores it as the follow-up's notes.
pub fn draft_follow_up_notes<S: KvSubstrate>(
    generator: &dyn DraftGenerator,
    service: &FollowUpService<'_, S>,
    follow_up_id: &str,
    request: &DraftRequest,
) -> Result<FollowUp, DraftFlowError> {
    let draft = match generator.generate(request) {
        Ok(raw) => normalize_draft(&raw),
        Err(err) => {
            warn!(
                "event=draft_generate module=drafting status=error tone={} error={err}",
                request.tone.as_str()
            );
            return Err(err.into());
        }
    };
    Ok(service.set_notes(follow_up_id, draft)?)
}
