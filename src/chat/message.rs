use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: String,
    pub is_typing: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::stamped(Role::User, text.into(), false)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::stamped(Role::Assistant, text.into(), false)
    }

    pub fn typing() -> Self {
        Self::stamped(Role::Assistant, String::new(), true)
    }

    fn stamped(role: Role, text: String, is_typing: bool) -> Self {
        Self {
            role,
            text,
            timestamp: clock_time(),
            is_typing,
        }
    }
}

fn clock_time() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Focus of the assistant's analysis, sent as `analysis_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    General,
    Trends,
    Anomalies,
    Comparison,
    Suggestions,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 5] = [
        AnalysisMode::General,
        AnalysisMode::Trends,
        AnalysisMode::Anomalies,
        AnalysisMode::Comparison,
        AnalysisMode::Suggestions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Trends => "trends",
            Self::Anomalies => "anomalies",
            Self::Comparison => "comparison",
            Self::Suggestions => "suggestions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Trends => "Trends",
            Self::Anomalies => "Anomalies",
            Self::Comparison => "Comparison",
            Self::Suggestions => "Suggestions",
        }
    }

    /// Canned question sent when the user switches to this mode.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::General => "Give me a general overview of the data",
            Self::Trends => "What trends do you see in this data?",
            Self::Anomalies => "Are there any anomalies in this data?",
            Self::Comparison => "Compare the different metrics in this data",
            Self::Suggestions => "What visualizations would work best for this data?",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
