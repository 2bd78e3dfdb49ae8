// LabelSequence - ordered set of practice labels
//
// Practice cycles through the labels in order and wraps back to the first
// one after the last. The set is configuration: the default is the single
// letters A-Z, custom signs use arbitrary names.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Ordered, non-empty, duplicate-free list of labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSequence {
    labels: Vec<String>,
}

impl LabelSequence {
    /// Build a sequence from labels in practice order
    ///
    /// # Errors
    /// - `EmptyLabelSequence` if no labels are given
    /// - `InvalidLabel` if a label is empty or whitespace
    /// - `DuplicateLabel` if a label appears twice
    pub fn new<I, S>(labels: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if label.trim().is_empty() {
                return Err(SessionError::InvalidLabel { label });
            }
            if out.contains(&label) {
                return Err(SessionError::DuplicateLabel { label });
            }
            out.push(label);
        }
        if out.is_empty() {
            return Err(SessionError::EmptyLabelSequence);
        }
        Ok(Self { labels: out })
    }

    /// The fingerspelling alphabet, A through Z
    pub fn alphabet() -> Self {
        Self {
            labels: ('A'..='Z').map(|c| c.to_string()).collect(),
        }
    }

    pub fn first(&self) -> &str {
        &self.labels[0]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Label following `label`, wrapping to the first after the last
    ///
    /// A label outside the sequence restarts at the first label.
    pub fn next_after(&self, label: &str) -> &str {
        match self.position(label) {
            Some(idx) => &self.labels[(idx + 1) % self.labels.len()],
            None => self.first(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for LabelSequence {
    fn default() -> Self {
        Self::alphabet()
    }
}

impl TryFrom<Vec<String>> for LabelSequence {
    type Error = SessionError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<LabelSequence> for Vec<String> {
    fn from(sequence: LabelSequence) -> Self {
        sequence.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet() {
        let seq = LabelSequence::alphabet();
        assert_eq!(seq.len(), 26);
        assert_eq!(seq.first(), "A");
        assert_eq!(seq.next_after("A"), "B");
        assert_eq!(seq.next_after("Y"), "Z");
    }

    #[test]
    fn test_wraparound() {
        let seq = LabelSequence::alphabet();
        assert_eq!(seq.next_after("Z"), "A");

        let custom = LabelSequence::new(["HELLO", "THANK_YOU"]).unwrap();
        assert_eq!(custom.next_after("HELLO"), "THANK_YOU");
        assert_eq!(custom.next_after("THANK_YOU"), "HELLO");
    }

    #[test]
    fn test_single_label_wraps_to_itself() {
        let seq = LabelSequence::new(["OK"]).unwrap();
        assert_eq!(seq.next_after("OK"), "OK");
    }

    #[test]
    fn test_unknown_label_restarts() {
        let seq = LabelSequence::new(["B", "A"]).unwrap();
        assert_eq!(seq.next_after("Q"), "B");
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert_eq!(
            LabelSequence::new(Vec::<String>::new()).unwrap_err(),
            SessionError::EmptyLabelSequence
        );
        assert_eq!(
            LabelSequence::new(["A", "B", "A"]).unwrap_err(),
            SessionError::DuplicateLabel {
                label: "A".to_string()
            }
        );
        assert!(matches!(
            LabelSequence::new(["A", " "]).unwrap_err(),
            SessionError::InvalidLabel { .. }
        ));
    }

    #[test]
    fn test_serde_as_plain_list() {
        let seq: LabelSequence = serde_json::from_str(r#"["A", "B", "HELLO"]"#).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(serde_json::to_string(&seq).unwrap(), r#"["A","B","HELLO"]"#);

        let bad: Result<LabelSequence, _> = serde_json::from_str("[]");
        assert!(bad.is_err());
    }
}
