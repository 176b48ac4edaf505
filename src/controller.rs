//! Submission lifecycle: validation, loading state, and which response is
//! allowed to reach the page.
//!
//! Every submission gets a generation number. Only the response for the
//! most recent generation is applied; anything older is dropped, so the
//! last submission wins regardless of the order responses arrive in.

use crate::error::{SolveError, ValidationError};
use crate::model::SolveResult;
use crate::surface::{RegionId, Surface};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveMode {
    #[default]
    Standard,
    Mock,
}

impl SolveMode {
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            SolveMode::Standard => "/api/submit_clue",
            SolveMode::Mock => "/api/submit_clue_mock",
        }
    }

    fn allows_empty_clue(&self) -> bool {
        matches!(self, SolveMode::Mock)
    }
}

impl fmt::Display for SolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveMode::Standard => write!(f, "standard"),
            SolveMode::Mock => write!(f, "mock"),
        }
    }
}

/// Raw form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClueSubmission {
    #[serde(default)]
    pub clue: String,
    #[serde(default, rename = "length")]
    pub expected_length: Option<String>,
}

impl ClueSubmission {
    pub fn new(clue: impl Into<String>) -> Self {
        Self {
            clue: clue.into(),
            expected_length: None,
        }
    }

    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.expected_length = Some(length.into());
        self
    }
}

/// Body posted to the solving service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub clue: String,
    pub length: Option<String>,
}

/// Proof that a request was issued, handed back when it settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub mode: SolveMode,
    pub request: SolveRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Submitting { generation: u64 },
    Succeeded { generation: u64 },
    Failed { generation: u64, message: String },
}

#[derive(Debug)]
pub enum Settlement {
    /// The response belongs to the latest submission and was accepted.
    Applied(Result<SolveResult, SolveError>),
    /// A newer submission has been issued since; the response was dropped.
    Stale,
}

#[derive(Debug)]
pub struct RequestController {
    mode: SolveMode,
    state: RequestState,
    latest: u64,
}

impl RequestController {
    pub fn new(mode: SolveMode) -> Self {
        Self {
            mode,
            state: RequestState::Idle,
            latest: 0,
        }
    }

    pub fn mode(&self) -> SolveMode {
        self.mode
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, RequestState::Submitting { .. })
    }

    /// Moves into `Submitting` and returns the ticket for the request the
    /// caller must now issue. Previous output is hidden before the loading
    /// indicator appears.
    pub fn begin(
        &mut self,
        surface: &mut Surface,
        submission: &ClueSubmission,
    ) -> Result<Ticket, ValidationError> {
        let clue = submission.clue.trim();
        if clue.is_empty() && !self.mode.allows_empty_clue() {
            return Err(ValidationError::EmptyClue);
        }

        surface.hide(RegionId::Error);
        surface.hide(RegionId::Results);
        surface.show(RegionId::Loading);

        self.latest += 1;
        let generation = self.latest;
        self.state = RequestState::Submitting { generation };
        info!(generation, mode = %self.mode, clue, "Submitting clue");

        Ok(Ticket {
            generation,
            mode: self.mode,
            request: SolveRequest {
                clue: clue.to_string(),
                length: submission.expected_length.clone(),
            },
        })
    }

    /// Accepts the outcome of a ticket's request. Failures are written to
    /// the error surface here; successful results are handed back for
    /// rendering.
    pub fn settle(
        &mut self,
        surface: &mut Surface,
        ticket: &Ticket,
        outcome: Result<SolveResult, SolveError>,
    ) -> Settlement {
        if ticket.generation != self.latest {
            warn!(
                generation = ticket.generation,
                latest = self.latest,
                "Discarding response for superseded submission"
            );
            return Settlement::Stale;
        }

        surface.hide(RegionId::Loading);
        match &outcome {
            Ok(_) => {
                self.state = RequestState::Succeeded {
                    generation: ticket.generation,
                };
            }
            Err(err) => {
                let message = err.user_message().to_string();
                warn!(generation = ticket.generation, error = %err, "Solve request failed");
                surface.set_text(RegionId::Error, message.clone());
                surface.show(RegionId::Error);
                self.state = RequestState::Failed {
                    generation: ticket.generation,
                    message,
                };
            }
        }
        Settlement::Applied(outcome)
    }

    /// Returns to `Idle` once the outcome has been presented.
    pub fn finish(&mut self) {
        if !self.is_submitting() {
            self.state = RequestState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NETWORK_ERROR_MESSAGE;

    fn submission() -> ClueSubmission {
        ClueSubmission::new("  Fast runner (6) ").with_length("6")
    }

    #[test]
    fn empty_clue_is_rejected_without_side_effects() {
        let mut controller = RequestController::new(SolveMode::Standard);
        let mut surface = Surface::new();
        let err = controller.begin(&mut surface, &ClueSubmission::new("   "));
        assert_eq!(err, Err(ValidationError::EmptyClue));
        assert!(surface.is_hidden(RegionId::Loading));
        assert_eq!(controller.state(), &RequestState::Idle);
        assert_eq!(controller.latest_generation(), 0);
    }

    #[test]
    fn mock_mode_accepts_empty_clue() {
        let mut controller = RequestController::new(SolveMode::Mock);
        let mut surface = Surface::new();
        let ticket = controller.begin(&mut surface, &ClueSubmission::new("")).unwrap();
        assert_eq!(ticket.request.clue, "");
        assert_eq!(ticket.mode.endpoint_path(), "/api/submit_clue_mock");
    }

    #[test]
    fn begin_hides_previous_output_and_shows_loading() {
        let mut controller = RequestController::new(SolveMode::Standard);
        let mut surface = Surface::new();
        surface.show(RegionId::Error);
        surface.show(RegionId::Results);
        let ticket = controller.begin(&mut surface, &submission()).unwrap();
        assert!(surface.is_hidden(RegionId::Error));
        assert!(surface.is_hidden(RegionId::Results));
        assert!(surface.is_visible(RegionId::Loading));
        assert_eq!(
            ticket.request,
            SolveRequest {
                clue: "Fast runner (6)".into(),
                length: Some("6".into()),
            }
        );
        assert!(controller.is_submitting());
    }

    #[test]
    fn length_is_passed_through_untouched() {
        let mut controller = RequestController::new(SolveMode::Standard);
        let mut surface = Surface::new();
        let ticket = controller
            .begin(&mut surface, &ClueSubmission::new("clue").with_length(" seven"))
            .unwrap();
        assert_eq!(ticket.request.length.as_deref(), Some(" seven"));
    }

    #[test]
    fn failure_surfaces_message_and_stops_loading() {
        let mut controller = RequestController::new(SolveMode::Standard);
        let mut surface = Surface::new();
        let ticket = controller.begin(&mut surface, &submission()).unwrap();
        let settled = controller.settle(
            &mut surface,
            &ticket,
            Err(SolveError::Transport("refused".into())),
        );
        assert!(matches!(settled, Settlement::Applied(Err(_))));
        assert!(surface.is_hidden(RegionId::Loading));
        assert!(surface.is_visible(RegionId::Error));
        assert_eq!(surface.text(RegionId::Error), NETWORK_ERROR_MESSAGE);
        assert!(matches!(controller.state(), RequestState::Failed { .. }));
        controller.finish();
        assert_eq!(controller.state(), &RequestState::Idle);
    }

    #[test]
    fn last_submission_wins() {
        let mut controller = RequestController::new(SolveMode::Standard);
        let mut surface = Surface::new();
        let first = controller.begin(&mut surface, &submission()).unwrap();
        let second = controller
            .begin(&mut surface, &ClueSubmission::new("Second clue"))
            .unwrap();
        assert!(second.generation > first.generation);

        // The newer request resolves first.
        let settled = controller.settle(&mut surface, &second, Ok(SolveResult::default()));
        assert!(matches!(settled, Settlement::Applied(Ok(_))));
        assert!(surface.is_hidden(RegionId::Loading));

        // The older one straggles in and is ignored.
        let settled = controller.settle(
            &mut surface,
            &first,
            Err(SolveError::Service {
                status: 500,
                message: None,
            }),
        );
        assert!(matches!(settled, Settlement::Stale));
        assert!(surface.is_hidden(RegionId::Error));
        assert!(matches!(controller.state(), RequestState::Succeeded { generation } if *generation == second.generation));
    }

    #[test]
    fn loading_persists_until_latest_settles() {
        let mut controller = RequestController::new(SolveMode::Standard);
        let mut surface = Surface::new();
        let first = controller.begin(&mut surface, &submission()).unwrap();
        let _second = controller.begin(&mut surface, &submission()).unwrap();
        controller.settle(&mut surface, &first, Ok(SolveResult::default()));
        assert!(surface.is_visible(RegionId::Loading));
        assert!(controller.is_submitting());
    }
}
