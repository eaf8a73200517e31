use serde::{Deserialize, Serialize};

/// Half-open index range `[start, end)` into a token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True if the two half-open ranges share at least one index.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    #[must_use]
    pub const fn shifted(&self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Kind of an alignment operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Both spans hold identical tokens
    Equal,
    /// Reference tokens were said as different tokens
    Replace,
    /// Reference tokens are absent from the hypothesis
    Delete,
    /// Hypothesis tokens have no reference counterpart
    Insert,
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Replace => write!(f, "replace"),
            Self::Delete => write!(f, "delete"),
            Self::Insert => write!(f, "insert"),
        }
    }
}

/// Lower bound (inclusive) of the `Correct` tier
pub const THRESHOLD_CORRECT: f64 = 0.92;

/// Lower bound (inclusive) of the `Partial` tier
pub const THRESHOLD_PARTIAL: f64 = 0.70;

/// Correctness grade derived from a similarity ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Incorrect,
    Partial,
    Correct,
}

impl Grade {
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= THRESHOLD_CORRECT {
            Self::Correct
        } else if ratio >= THRESHOLD_PARTIAL {
            Self::Partial
        } else {
            Self::Incorrect
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Correct => write!(f, "correct"),
            Self::Partial => write!(f, "partial"),
            Self::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// Overall outcome of one comparison call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Correct,
    Partial,
    Incorrect,
    /// The transcription collaborator reported a failure; nothing was aligned
    Error,
}

impl Status {
    /// Short feedback line shown next to the result
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Correct => "[OK] Well done: the recitation matches the text.",
            Self::Partial => {
                "[WARN] Partially correct: review the highlighted words and recite more slowly."
            }
            Self::Incorrect => {
                "[ERROR] Please repeat: recite slowly and focus on the highlighted words."
            }
            Self::Error => "[ERROR] The recording could not be transcribed.",
        }
    }
}

impl From<Grade> for Status {
    fn from(grade: Grade) -> Self {
        match grade {
            Grade::Correct => Self::Correct,
            Grade::Partial => Self::Partial,
            Grade::Incorrect => Self::Incorrect,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Correct => write!(f, "correct"),
            Self::Partial => write!(f, "partial"),
            Self::Incorrect => write!(f, "incorrect"),
            Self::Error => write!(f, "error"),
        }
    }
}
