//! The assessment question
//!
//! The question is rendered as individually hoverable word tokens; words are
//! addressed by their index into the whitespace split.

/// The question presented to every session, revealed word by word on hover.
pub const QUESTION_TEXT: &str = "What is the time complexity of binary search algorithm?";

/// A question whose words are revealed one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
}

impl Default for Question {
    fn default() -> Self {
        Self::new(QUESTION_TEXT)
    }
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Word tokens in display order. Hover indices refer to this split.
    pub fn words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }

    /// Total number of hoverable words; the upper bound on hover count.
    pub fn total_words(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
