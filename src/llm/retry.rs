//! Quota-aware retry policy around a single generation call

use super::{Credential, GenerationError, TextGenerator};
use crate::error::{Result, TailorError};
use crate::session::{PipelineStatus, SessionContext};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;
pub const DEFAULT_STEP_SECS: u64 = 20;

/// Wait schedule between quota failures. `attempt` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Backoff {
    /// `(attempt + 1) * step_secs`
    Linear { step_secs: u64 },
    /// `2^attempt + offset_secs`
    Exponential { offset_secs: u64 },
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Linear {
            step_secs: DEFAULT_STEP_SECS,
        }
    }
}

impl Backoff {
    pub fn delay(&self, attempt: u32) -> Duration {
        let secs = match *self {
            Backoff::Linear { step_secs } => (u64::from(attempt) + 1).saturating_mul(step_secs),
            Backoff::Exponential { offset_secs } => 2u64
                .checked_pow(attempt)
                .unwrap_or(u64::MAX)
                .saturating_add(offset_secs),
        };
        Duration::from_secs(secs)
    }
}

/// States of one tailoring request's generation step.
#[derive(Debug)]
pub enum RetryState {
    Attempting(u32),
    QuotaWait { attempt: u32, wait: Duration },
    Success { text: String, attempts: u32 },
    Failed(GenerationError),
    Exhausted { attempts: u32 },
}

impl RetryState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RetryState::Success { .. } | RetryState::Failed(_) | RetryState::Exhausted { .. }
        )
    }
}

/// Successful generation plus the number of calls it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Backoff::default())
    }
}

impl RetryPolicy {
    /// At least one attempt is always made.
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Runs the state machine from `Attempting(0)` to a terminal state.
    pub async fn execute<G>(
        &self,
        generator: &G,
        prompt: &str,
        credential: &Credential,
        session: &SessionContext,
    ) -> Result<Generation>
    where
        G: TextGenerator + ?Sized,
    {
        let mut state = RetryState::Attempting(0);
        loop {
            state = match self.step(state, generator, prompt, credential, session).await {
                RetryState::Success { text, attempts } => return Ok(Generation { text, attempts }),
                RetryState::Exhausted { attempts } => {
                    return Err(TailorError::QuotaExhausted { attempts })
                }
                RetryState::Failed(err) => return Err(err.into()),
                pending => pending,
            };
        }
    }

    async fn step<G>(
        &self,
        state: RetryState,
        generator: &G,
        prompt: &str,
        credential: &Credential,
        session: &SessionContext,
    ) -> RetryState
    where
        G: TextGenerator + ?Sized,
    {
        match state {
            RetryState::Attempting(attempt) => {
                session.report(PipelineStatus::Generating {
                    attempt: attempt + 1,
                    max_attempts: self.max_attempts,
                });

                match generator.generate(prompt, credential).await {
                    Ok(text) => {
                        info!("Generation succeeded on attempt {}", attempt + 1);
                        RetryState::Success {
                            text,
                            attempts: attempt + 1,
                        }
                    }
                    Err(err) if err.is_quota_exhausted() => RetryState::QuotaWait {
                        attempt,
                        wait: self.backoff.delay(attempt),
                    },
                    Err(err) => {
                        warn!("Generation failed on attempt {}: {}", attempt + 1, err);
                        RetryState::Failed(err)
                    }
                }
            }
            RetryState::QuotaWait { attempt, wait } => {
                warn!(
                    "Quota exhausted on attempt {}/{}, waiting {}s",
                    attempt + 1,
                    self.max_attempts,
                    wait.as_secs()
                );
                session.report(PipelineStatus::QuotaWait {
                    attempt: attempt + 1,
                    max_attempts: self.max_attempts,
                    wait,
                });
                tokio::time::sleep(wait).await;

                if attempt + 1 >= self.max_attempts {
                    RetryState::Exhausted {
                        attempts: attempt + 1,
                    }
                } else {
                    RetryState::Attempting(attempt + 1)
                }
            }
            terminal => terminal,
        }
    }
}
