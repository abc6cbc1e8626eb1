//! Message tone shared by automation rules, templates and drafting.

use serde::{Deserialize, Serialize};

/// Writing tone requested for a follow-up message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Polite,
    Casual,
    Urgent,
    Short,
    Creative,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Professional,
        Tone::Polite,
        Tone::Casual,
        Tone::Urgent,
        Tone::Short,
        Tone::Creative,
    ];

    /// Stable lowercase label, identical to the persisted form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Polite => "polite",
            Self::Casual => "casual",
            Self::Urgent => "urgent",
            Self::Short => "short",
            Self::Creative => "creative",
        }
    }

    /// Parses a persisted/UI label, ignoring surrounding whitespace and case.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str() == normalized)
    }

    /// Style guidance handed to the drafting collaborator.
    pub fn style_instruction(self) -> &'static str {
        match self {
            Self::Professional => "standard business etiquette, clear and concise",
            Self::Polite => {
                "extremely respectful and gentle, focusing on building a relationship"
            }
            Self::Casual => "friendly, relaxed language, as if talking to a colleague or friend",
            Self::Urgent => "direct and time-sensitive without being rude, emphasizes importance",
            Self::Short => "maximum 2 sentences, quick and punchy",
            Self::Creative => "uses a unique hook or witty remark to stand out in a busy inbox",
        }
    }
}
