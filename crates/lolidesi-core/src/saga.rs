//! # Saga Runner
//!
//! Best-effort atomicity across independent remote calls.
//!
//! The spreadsheet backend has no multi-row transaction, so a borrow of N
//! items is N separate writes. A [`Saga`] runs a list of steps in order,
//! stops at the first failure, and undoes what already went through.
//!
//! ## Execution Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Saga Execution                                    │
//! │                                                                         │
//! │  steps:  [ S1 ]──►[ S2 ]──►[ S3 ]──►[ S4 ]                              │
//! │            ✓        ✓        ✗        ·   (never attempted)             │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  compensate (reverse):   undo S2 ──► undo S1                            │
//! │                                                                         │
//! │  outcome: Aborted { failed_step: S3, compensated: [S2, S1],             │
//! │                     skipped: [S4] }                                     │
//! │                                                                         │
//! │  RULES:                                                                 │
//! │  • Forward steps run strictly one at a time                             │
//! │  • Only completed steps are compensated                                 │
//! │  • Every compensation is attempted; failures are recorded, not retried  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use tracing::{debug, warn};

// =============================================================================
// Step Trait
// =============================================================================

/// A forward action paired with its compensating action.
#[async_trait]
pub trait SagaStep: Send + Sync {
    /// Error produced by either action.
    type Error: std::fmt::Display + Send;

    /// Identifier used in outcomes and logs (e.g. the item id).
    fn id(&self) -> &str;

    /// Performs the step.
    async fn forward(&self) -> Result<(), Self::Error>;

    /// Undoes a step whose `forward` succeeded.
    async fn compensate(&self) -> Result<(), Self::Error>;
}

// =============================================================================
// Outcome
// =============================================================================

/// Result of running a saga.
#[derive(Debug)]
pub enum SagaOutcome<E> {
    /// Every forward step succeeded. Ids in execution order.
    Completed { completed: Vec<String> },

    /// A forward step failed; completed steps were compensated.
    Aborted(SagaFailure<E>),
}

impl<E> SagaOutcome<E> {
    pub fn is_completed(&self) -> bool {
        matches!(self, SagaOutcome::Completed { .. })
    }
}

/// Details of an aborted saga.
#[derive(Debug)]
pub struct SagaFailure<E> {
    /// The step whose forward action failed.
    pub failed_step: String,

    /// The error it failed with.
    pub error: E,

    /// Steps that were compensated, in compensation order (reverse).
    pub compensated: Vec<String>,

    /// Subset of `compensated` whose compensation itself failed.
    pub compensation_failures: Vec<String>,

    /// Steps never attempted.
    pub skipped: Vec<String>,
}

// =============================================================================
// Saga
// =============================================================================

/// An ordered list of steps run with stop-on-first-failure semantics.
pub struct Saga<S> {
    steps: Vec<S>,
}

impl<S: SagaStep> Saga<S> {
    pub fn new(steps: Vec<S>) -> Self {
        Saga { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step in order.
    ///
    /// ## Flow
    /// 1. Call `forward` on each step, awaiting each before the next
    /// 2. On the first error, stop issuing forward calls
    /// 3. Call `compensate` on every completed step, newest first
    pub async fn run(self) -> SagaOutcome<S::Error> {
        let mut completed: Vec<usize> = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            match step.forward().await {
                Ok(()) => {
                    debug!(step = %step.id(), "Saga step completed");
                    completed.push(index);
                }
                Err(error) => {
                    warn!(step = %step.id(), %error, "Saga step failed, compensating");

                    let mut compensated = Vec::with_capacity(completed.len());
                    let mut compensation_failures = Vec::new();

                    for &done in completed.iter().rev() {
                        let done_step = &self.steps[done];
                        if let Err(comp_err) = done_step.compensate().await {
                            warn!(step = %done_step.id(), error = %comp_err, "Compensation failed");
                            compensation_failures.push(done_step.id().to_string());
                        } else {
                            debug!(step = %done_step.id(), "Compensated");
                        }
                        compensated.push(done_step.id().to_string());
                    }

                    let skipped = self.steps[index + 1..]
                        .iter()
                        .map(|s| s.id().to_string())
                        .collect();

                    return SagaOutcome::Aborted(SagaFailure {
                        failed_step: step.id().to_string(),
                        error,
                        compensated,
                        compensation_failures,
                        skipped,
                    });
                }
            }
        }

        SagaOutcome::Completed {
            completed: completed
                .into_iter()
                .map(|i| self.steps[i].id().to_string())
                .collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every call into a shared journal.
    struct Recorded {
        id: String,
        fail_forward: bool,
        fail_compensate: bool,
        journal: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SagaStep for Recorded {
        type Error = String;

        fn id(&self) -> &str {
            &self.id
        }

        async fn forward(&self) -> Result<(), String> {
            self.journal.lock().unwrap().push(format!("do {}", self.id));
            if self.fail_forward {
                Err(format!("{} refused", self.id))
            } else {
                Ok(())
            }
        }

        async fn compensate(&self) -> Result<(), String> {
            self.journal.lock().unwrap().push(format!("undo {}", self.id));
            if self.fail_compensate {
                Err("undo refused".into())
            } else {
                Ok(())
            }
        }
    }

    fn steps(n: usize, fail_at: Option<usize>, journal: &Arc<Mutex<Vec<String>>>) -> Vec<Recorded> {
        (1..=n)
            .map(|i| Recorded {
                id: format!("s{}", i),
                fail_forward: Some(i) == fail_at,
                fail_compensate: false,
                journal: journal.clone(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_all_steps_succeed() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let outcome = Saga::new(steps(3, None, &journal)).run().await;

        match outcome {
            SagaOutcome::Completed { completed } => assert_eq!(completed, vec!["s1", "s2", "s3"]),
            other => panic!("expected completion, got {:?}", other),
        }
        assert!(!journal.lock().unwrap().iter().any(|e| e.starts_with("undo")));
    }

    #[tokio::test]
    async fn test_failure_compensates_prior_steps_in_reverse() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let outcome = Saga::new(steps(5, Some(3), &journal)).run().await;

        let SagaOutcome::Aborted(failure) = outcome else {
            panic!("expected abort");
        };
        assert_eq!(failure.failed_step, "s3");
        assert_eq!(failure.error, "s3 refused");
        assert_eq!(failure.compensated, vec!["s2", "s1"]);
        assert_eq!(failure.skipped, vec!["s4", "s5"]);

        assert_eq!(
            *journal.lock().unwrap(),
            vec!["do s1", "do s2", "do s3", "undo s2", "undo s1"]
        );
    }

    #[tokio::test]
    async fn test_first_step_failure_compensates_nothing() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let outcome = Saga::new(steps(3, Some(1), &journal)).run().await;

        let SagaOutcome::Aborted(failure) = outcome else {
            panic!("expected abort");
        };
        assert!(failure.compensated.is_empty());
        assert_eq!(*journal.lock().unwrap(), vec!["do s1"]);
    }

    #[tokio::test]
    async fn test_failed_compensation_does_not_stop_others() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut list = steps(3, Some(3), &journal);
        list[1].fail_compensate = true;

        let SagaOutcome::Aborted(failure) = Saga::new(list).run().await else {
            panic!("expected abort");
        };
        assert_eq!(failure.compensated, vec!["s2", "s1"]);
        assert_eq!(failure.compensation_failures, vec!["s2"]);
        assert!(journal.lock().unwrap().contains(&"undo s1".to_string()));
    }

    #[tokio::test]
    async fn test_empty_saga_completes() {
        let outcome = Saga::<Recorded>::new(Vec::new()).run().await;
        assert!(outcome.is_completed());
    }
}
