//! Session state machine for the URL → preferences → result flow.

use tracing::info;

use crate::error::{CompareError, Result};
use crate::pipeline::Pipeline;
use crate::traits::{ListingScraper, ListingSearcher, PropertyAi};
use crate::types::{ComparisonResult, PropertyRecord, UserPreferences};

/// Where the session is in the three-step flow.
///
/// Held records live inside the variants, so a state change is also the
/// only way data is kept or discarded.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// Waiting for the reference listing URL.
    AwaitingUrl,

    /// Reference accepted; waiting for buyer preferences.
    AwaitingPreferences { reference: PropertyRecord },

    /// Comparison finished; result available.
    ShowingResult { result: ComparisonResult },
}

impl SessionState {
    /// Short state name for errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::AwaitingUrl => "awaiting_url",
            SessionState::AwaitingPreferences { .. } => "awaiting_preferences",
            SessionState::ShowingResult { .. } => "showing_result",
        }
    }
}

/// A single user's comparison session.
///
/// Operations follow the state machine strictly: anything out of order
/// returns `InvalidState`, and a failed operation leaves the state exactly
/// where it was so the same step can be retried.
pub struct Session<S, A, W> {
    pipeline: Pipeline<S, A, W>,
    state: SessionState,
}

impl<S, A, W> Session<S, A, W>
where
    S: ListingScraper,
    A: PropertyAi,
    W: ListingSearcher,
{
    /// Start a fresh session awaiting a listing URL.
    pub fn new(pipeline: Pipeline<S, A, W>) -> Self {
        Self {
            pipeline,
            state: SessionState::AwaitingUrl,
        }
    }

    /// The current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The reference record, in any state that holds one.
    pub fn reference(&self) -> Option<&PropertyRecord> {
        match &self.state {
            SessionState::AwaitingUrl => None,
            SessionState::AwaitingPreferences { reference } => Some(reference),
            SessionState::ShowingResult { result } => Some(&result.reference),
        }
    }

    /// The comparison result, when one is showing.
    pub fn result(&self) -> Option<&ComparisonResult> {
        match &self.state {
            SessionState::ShowingResult { result } => Some(result),
            _ => None,
        }
    }

    /// Step one: fetch and structure the reference listing.
    pub async fn submit_url(&mut self, url: &str) -> Result<PropertyRecord> {
        if !matches!(self.state, SessionState::AwaitingUrl) {
            return Err(CompareError::InvalidState {
                operation: "submit_url",
                state: self.state.name(),
            });
        }

        let record = self.pipeline.fetch_and_format(url).await?;
        info!("Reference listing accepted: {}", record.source_url);

        self.state = SessionState::AwaitingPreferences {
            reference: record.clone(),
        };
        Ok(record)
    }

    /// Step two: validate preferences and run the comparison.
    pub async fn submit_preferences(
        &mut self,
        prefs: UserPreferences,
    ) -> Result<ComparisonResult> {
        let reference = match &self.state {
            SessionState::AwaitingPreferences { reference } => reference.clone(),
            _ => {
                return Err(CompareError::InvalidState {
                    operation: "submit_preferences",
                    state: self.state.name(),
                })
            }
        };

        prefs.validate()?;

        let result = self.pipeline.compare(&reference, &prefs).await?;
        self.state = SessionState::ShowingResult {
            result: result.clone(),
        };
        Ok(result)
    }

    /// Back to the start, discarding everything the session held.
    pub fn reset(&mut self) {
        info!("Session reset from {}", self.state.name());
        self.state = SessionState::AwaitingUrl;
    }

    /// Re-enter preference collection for the same reference listing.
    pub fn refine(&mut self) -> Result<()> {
        match &self.state {
            SessionState::ShowingResult { result } => {
                let reference = result.reference.clone();
                self.state = SessionState::AwaitingPreferences { reference };
                Ok(())
            }
            _ => Err(CompareError::InvalidState {
                operation: "refine",
                state: self.state.name(),
            }),
        }
    }
}
