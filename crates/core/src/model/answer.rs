use serde::{Deserialize, Serialize};

/// A captured answer, tagged by shape rather than inferred at use sites.
///
/// Which variant is meaningful depends on the question kind; the evaluator
/// resolves the pairing once, at scoring time. The wire format is
/// `string | string[]`, hence the untagged serde repr (`Choice` and `Text`
/// serialize identically, which matches the platform's payloads).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// One selected option (single choice, true/false).
    Choice(String),
    /// Selected options for a multiple-choice question. Order and duplicates
    /// are irrelevant to scoring.
    Choices(Vec<String>),
    /// Free text (fill-in-the-blank, case analysis).
    Text(String),
}

impl AnswerValue {
    #[must_use]
    pub fn choice(value: impl Into<String>) -> Self {
        Self::Choice(value.into())
    }

    #[must_use]
    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(values.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns true when the answer carries no usable content (an empty
    /// selection or blank text). Such answers always score as incorrect but
    /// are still legal to record.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Choice(value) | Self::Text(value) => value.is_empty(),
            Self::Choices(values) => values.is_empty(),
        }
    }
}
