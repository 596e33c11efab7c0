//! What happens to a failed lookup is the caller's decision.
//!
//! Interactive callers stop at the first failure ([`FailFast`]); batch callers that walk
//! a whole document record every failure and keep going ([`Accumulate`]).

use std::fmt;

use tracing::error;

use crate::DbError;

/// A failed lookup together with what was being looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub key: String,
    pub context: Option<String>,
    pub error: DbError,
}

impl Failure {
    pub fn new(key: &str, context: Option<&str>, error: DbError) -> Self {
        Self {
            key: key.to_string(),
            context: context.map(str::to_string),
            error,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{} (context={}): {}", self.key, ctx, self.error),
            None => write!(f, "{}: {}", self.key, self.error),
        }
    }
}

/// Decides the disposition of a failure.
pub trait ErrorPolicy {
    /// Return `Err` to abort the run, `Ok` to continue with the next key.
    fn report(&mut self, failure: Failure) -> Result<(), DbError>;
}

/// The first failure ends the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFast;

impl ErrorPolicy for FailFast {
    fn report(&mut self, failure: Failure) -> Result<(), DbError> {
        error!("{}", failure);
        Err(failure.error)
    }
}

/// Every failure is recorded; the run succeeds only if none were.
#[derive(Debug, Clone, Default)]
pub struct Accumulate {
    failures: Vec<Failure>,
}

impl Accumulate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl ErrorPolicy for Accumulate {
    fn report(&mut self, failure: Failure) -> Result<(), DbError> {
        error!("{}", failure);
        self.failures.push(failure);
        Ok(())
    }
}
