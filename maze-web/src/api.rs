//! HTTP calls to the score desk.
use gloo::net::http::{Request, Response};
use maze_game::{EventState, LeaderboardEntry, ParticipantId, ScoreSubmission, SubmitResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::paths::api_url;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server answered HTTP {status}")]
    Status { status: u16 },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<gloo::net::Error> for ApiError {
    fn from(err: gloo::net::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventStateRequest<'a> {
    player_name: &'a str,
}

/// Parse a JSON body into `T`.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when the body does not match.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::Decode(err.to_string()))
}

#[allow(clippy::future_not_send)]
async fn read_ok(response: Response) -> Result<String, ApiError> {
    if !response.ok() {
        return Err(ApiError::Status {
            status: response.status(),
        });
    }
    Ok(response.text().await?)
}

/// `POST /api/event-state` for the participant.
///
/// # Errors
///
/// Returns an error on transport failure, a non-2xx status, or a body that
/// is not an event-state document.
#[allow(clippy::future_not_send)]
pub async fn fetch_event_state(participant: &ParticipantId) -> Result<EventState, ApiError> {
    let response = Request::post(&api_url("/api/event-state"))
        .json(&EventStateRequest {
            player_name: participant.as_str(),
        })?
        .send()
        .await?;
    decode(&read_ok(response).await?)
}

/// `POST /api/finish`. Never fails: transport errors become
/// [`SubmitResponse::Failed`].
#[allow(clippy::future_not_send)]
pub async fn submit_finish(request: &ScoreSubmission) -> SubmitResponse {
    match post_finish(request).await {
        Ok((status, body)) => SubmitResponse::from_status(status, &body),
        Err(err) => {
            log::warn!("score submission did not reach the server: {err}");
            SubmitResponse::Failed {
                reason: err.to_string(),
            }
        }
    }
}

#[allow(clippy::future_not_send)]
async fn post_finish(request: &ScoreSubmission) -> Result<(u16, String), ApiError> {
    let response = Request::post(&api_url("/api/finish"))
        .json(request)?
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Ok((status, body))
}

/// `GET /api/leaderboard`.
///
/// # Errors
///
/// Returns an error on transport failure, a non-2xx status, or a malformed body.
#[allow(clippy::future_not_send)]
pub async fn fetch_leaderboard() -> Result<Vec<LeaderboardEntry>, ApiError> {
    let response = Request::get(&api_url("/api/leaderboard")).send().await?;
    decode(&read_ok(response).await?)
}
