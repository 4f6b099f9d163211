//! Client half of the once-only score recording.
//!
//! The guard locks only after the service acknowledges a submission
//! (`Recorded` or `Duplicate`). A failed attempt leaves it open for exactly
//! one user-driven retry, and an attempt in flight blocks a second one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event_mode::EventMode;
use crate::participant::{Participant, ParticipantError, ParticipantId};
use crate::session::MazeSession;

/// Total attempts a session may make: the first one plus one retry.
pub const MAX_ATTEMPTS: u8 = 2;

/// Score submission request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub player_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    /// Whole elapsed seconds.
    pub time: u64,
}

impl ScoreSubmission {
    #[must_use]
    pub fn for_participant(participant: &Participant, time: u64) -> Self {
        Self {
            player_name: participant.name.as_str().to_string(),
            contact_number: participant.contact.clone(),
            time,
        }
    }

    /// Identity the request is recorded under.
    ///
    /// # Errors
    ///
    /// Returns an error when `player_name` is blank.
    pub fn identity(&self) -> Result<ParticipantId, ParticipantError> {
        ParticipantId::new(&self.player_name)
    }
}

/// Server verdict on a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitResponse {
    Recorded,
    /// A record already exists for the identity. Expected, not a fault.
    Duplicate,
    Invalid { reason: String },
    Failed { reason: String },
}

impl SubmitResponse {
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Recorded => 200,
            Self::Duplicate => 409,
            Self::Invalid { .. } => 400,
            Self::Failed { .. } => 500,
        }
    }

    /// Map an HTTP status to a verdict: 2xx recorded, 409 duplicate, else failed.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            200..=299 => Self::Recorded,
            409 => Self::Duplicate,
            _ => Self::Failed {
                reason: if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {}", body.trim())
                },
            },
        }
    }

    #[must_use]
    pub const fn is_acknowledged(&self) -> bool {
        matches!(self, Self::Recorded | Self::Duplicate)
    }
}

/// Server endpoint accepting score submissions.
pub trait ScoreService {
    fn submit_score(&self, request: &ScoreSubmission) -> SubmitResponse;
}

impl<T: ScoreService + ?Sized> ScoreService for &T {
    fn submit_score(&self, request: &ScoreSubmission) -> SubmitResponse {
        (**self).submit_score(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("score already recorded for this session")]
    AlreadyRecorded,
    #[error("a submission is already in flight")]
    InFlight,
    #[error("no retries left after {attempts} failed attempts")]
    RetriesExhausted { attempts: u8 },
    #[error("session has not reached the goal")]
    SessionNotCompleted,
    #[error("practice runs are not scored")]
    PracticeRun,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    NotSubmitted,
    Pending,
    Recorded,
    AlreadyRecorded,
    Failed { reason: String, retry_available: bool },
}

/// Proof that an attempt was started; hand it back to [`SubmissionGuard::settle`].
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct SubmissionTicket {
    attempt: u8,
}

impl SubmissionTicket {
    #[must_use]
    pub const fn attempt(&self) -> u8 {
        self.attempt
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    attempts: u8,
    in_flight: bool,
    locked: bool,
    last: Option<SubmitResponse>,
}

impl SubmissionGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next attempt.
    ///
    /// # Errors
    ///
    /// Fails when the guard is locked, an attempt is in flight, or the retry
    /// has been used up.
    pub fn begin(&mut self) -> Result<SubmissionTicket, GuardError> {
        if self.locked {
            return Err(GuardError::AlreadyRecorded);
        }
        if self.in_flight {
            return Err(GuardError::InFlight);
        }
        if self.attempts >= MAX_ATTEMPTS {
            return Err(GuardError::RetriesExhausted {
                attempts: self.attempts,
            });
        }
        self.attempts += 1;
        self.in_flight = true;
        Ok(SubmissionTicket {
            attempt: self.attempts,
        })
    }

    /// Record the service response for an attempt.
    pub fn settle(&mut self, ticket: SubmissionTicket, response: &SubmitResponse) -> SubmissionStatus {
        self.in_flight = false;
        if response.is_acknowledged() {
            self.locked = true;
            log::info!("score submission acknowledged on attempt {}", ticket.attempt);
        } else {
            log::warn!("score submission attempt {} not accepted: {response:?}", ticket.attempt);
        }
        self.last = Some(response.clone());
        self.status()
    }

    /// Begin, call the service and settle in one go.
    ///
    /// # Errors
    ///
    /// Returns the [`GuardError`] from [`Self::begin`] without calling the service.
    pub fn submit<S: ScoreService + ?Sized>(
        &mut self,
        service: &S,
        request: &ScoreSubmission,
    ) -> Result<SubmissionStatus, GuardError> {
        let ticket = self.begin()?;
        let response = service.submit_score(request);
        Ok(self.settle(ticket, &response))
    }

    /// Check the session may be scored and build the request.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::SessionNotCompleted`] before the goal is reached
    /// and [`GuardError::PracticeRun`] for practice sessions.
    pub fn request_for(
        session: &MazeSession,
        participant: &Participant,
    ) -> Result<ScoreSubmission, GuardError> {
        let time = session.finish_secs().ok_or(GuardError::SessionNotCompleted)?;
        if session.mode() != Some(EventMode::Live) {
            return Err(GuardError::PracticeRun);
        }
        Ok(ScoreSubmission::for_participant(participant, time))
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub const fn attempts(&self) -> u8 {
        self.attempts
    }

    #[must_use]
    pub fn status(&self) -> SubmissionStatus {
        if self.in_flight {
            return SubmissionStatus::Pending;
        }
        match &self.last {
            None => SubmissionStatus::NotSubmitted,
            Some(SubmitResponse::Recorded) => SubmissionStatus::Recorded,
            Some(SubmitResponse::Duplicate) => SubmissionStatus::AlreadyRecorded,
            Some(SubmitResponse::Invalid { reason } | SubmitResponse::Failed { reason }) => {
                SubmissionStatus::Failed {
                    reason: reason.clone(),
                    retry_available: self.attempts < MAX_ATTEMPTS,
                }
            }
        }
    }
}
