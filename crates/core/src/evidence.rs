//! Length-based strength meter for the free-text evidence fields.

use serde::{Deserialize, Serialize};

/// Default `maxlength` of an evidence textarea, in characters.
pub const EVIDENCE_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceQuality {
    NotStarted,
    Minimal,
    Basic,
    Good,
    Strong,
    Comprehensive,
}

impl EvidenceQuality {
    /// Band for a character count.
    #[must_use]
    pub fn classify(len: usize) -> Self {
        match len {
            0 => Self::NotStarted,
            1..50 => Self::Minimal,
            50..150 => Self::Basic,
            150..300 => Self::Good,
            300..450 => Self::Strong,
            _ => Self::Comprehensive,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::Minimal => "Minimal evidence",
            Self::Basic => "Basic evidence",
            Self::Good => "Good evidence",
            Self::Strong => "Strong evidence",
            Self::Comprehensive => "Comprehensive evidence",
        }
    }

    /// CSS modifier for the meter bar.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::Minimal => "minimal",
            Self::Basic => "basic",
            Self::Good => "good",
            Self::Strong => "strong",
            Self::Comprehensive => "comprehensive",
        }
    }
}

/// Character counter state of one evidence field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvidenceMeter {
    pub count: usize,
    pub max_len: usize,
    pub quality: EvidenceQuality,
}

impl EvidenceMeter {
    /// Counts characters, not bytes.
    #[must_use]
    pub fn measure(text: &str, max_len: usize) -> Self {
        let count = text.chars().count();
        Self {
            count,
            max_len,
            quality: EvidenceQuality::classify(count),
        }
    }

    /// Fill of the meter bar, capped at 100.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.max_len == 0 {
            return 100;
        }
        let pct = (self.count.min(self.max_len) * 100) / self.max_len;
        u32::try_from(pct).unwrap_or(100)
    }
}
