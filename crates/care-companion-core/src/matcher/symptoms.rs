//! Fixed-vocabulary symptom detection.
//!
//! Matching is a case-insensitive substring test, so "Coughing" counts as "cough"
//! and "colder" counts as "cold". No inference happens here.

/// Symptom words recognised by the chat bot, in reporting order.
pub const SYMPTOM_VOCABULARY: [&str; 4] = ["fever", "headache", "cough", "cold"];

/// Reply used when no symptom word is found.
pub const FOLLOW_UP_REPLY: &str = "Bot: Thanks for the info! can you tell me more?";

const DETECTED_PREFIX: &str = "Bot: Based on your symptoms, you have ";

/// Matcher over a fixed list of lowercase symptom words.
#[derive(Debug, Clone)]
pub struct SymptomMatcher {
    vocabulary: Vec<String>,
}

impl Default for SymptomMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SymptomMatcher {
    /// Create a matcher over [`SYMPTOM_VOCABULARY`].
    pub fn new() -> Self {
        Self::with_vocabulary(SYMPTOM_VOCABULARY)
    }

    /// Create a matcher over a custom vocabulary. Words are lowercased; order is kept.
    pub fn with_vocabulary<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            vocabulary: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Symptom words present in `input`, in vocabulary order.
    pub fn detect(&self, input: &str) -> Vec<&str> {
        let lower = input.to_lowercase();
        self.vocabulary
            .iter()
            .filter(|word| lower.contains(word.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Canned reply for `input`. Total over all strings.
    pub fn respond(&self, input: &str) -> String {
        let detected = self.detect(input);
        if detected.is_empty() {
            return FOLLOW_UP_REPLY.to_string();
        }
        format!("{}{}", DETECTED_PREFIX, detected.join(", "))
    }
}
