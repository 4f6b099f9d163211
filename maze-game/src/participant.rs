//! Participant identity used for event lookup and once-only scoring.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParticipantError {
    #[error("participant name must not be empty")]
    EmptyName,
}

/// Identity key for scoring: at most one record may exist per id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Build an id from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ParticipantError::EmptyName`] when nothing is left after trimming.
    pub fn new(raw: &str) -> Result<Self, ParticipantError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ParticipantError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = ParticipantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ParticipantId> for String {
    fn from(value: ParticipantId) -> Self {
        value.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registered player details kept by the client between page loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: ParticipantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Participant {
    #[must_use]
    pub fn new(name: ParticipantId, contact: Option<String>) -> Self {
        let contact = contact
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self { name, contact }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_trimmed_and_non_empty() {
        assert_eq!(ParticipantId::new("  neo ").unwrap().as_str(), "neo");
        assert_eq!(ParticipantId::new("   "), Err(ParticipantError::EmptyName));
    }

    #[test]
    fn participant_serde_validates_name() {
        let parsed: Participant =
            serde_json::from_str(r#"{"name":" trinity ","contact":"555-0100"}"#).unwrap();
        assert_eq!(parsed.name.as_str(), "trinity");
        assert!(serde_json::from_str::<Participant>(r#"{"name":""}"#).is_err());
    }

    #[test]
    fn blank_contact_is_dropped() {
        let p = Participant::new(ParticipantId::new("a").unwrap(), Some("  ".into()));
        assert_eq!(p.contact, None);
    }
}
