pub mod debounce;
pub mod machine;
pub mod render;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use debounce::Debouncer;
pub use machine::{Phase, SessionMachine, SessionState};
pub use render::{AnswerOption, Outcome, Presentation, Renderer};

/// How the learner answers a question.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    /// Recall the translation, then lift the blinder to check.
    #[default]
    FreeRecall,
    /// Pick the translation among distractors sharing a context.
    MultipleChoice,
}

impl AnswerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerMode::FreeRecall => "free_recall",
            AnswerMode::MultipleChoice => "multiple_choice",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnswerMode::FreeRecall => "Free Recall",
            AnswerMode::MultipleChoice => "Multiple Choice",
        }
    }
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free_recall" | "free-recall" | "recall" => Ok(AnswerMode::FreeRecall),
            "multiple_choice" | "multiple-choice" | "choice" => Ok(AnswerMode::MultipleChoice),
            other => Err(format!(
                "unknown answer mode '{other}' (expected free_recall or multiple_choice)"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub answer_mode: AnswerMode,
    /// When false, filter triggers are ignored and every sentence is eligible.
    pub filter_enabled: bool,
    pub distractor_count: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            answer_mode: AnswerMode::FreeRecall,
            filter_enabled: true,
            distractor_count: 3,
        }
    }
}
