//! Rotating display code.
//!
//! The generator holds one live code and its expiry. Rotation is lazy: a
//! read through [`CodeGenerator::current_code`] or [`CodeGenerator::snapshot`]
//! that happens after expiry replaces the code before answering. Validation
//! never rotates; a stale code is simply rejected.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use tracing::debug;

use rollcall_core::clock::Clock;

use crate::domain::types::{CODE_MAX, CODE_MIN};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeGeneratorError {
    #[error("code validity must be positive, got {0}s")]
    NonPositiveValidity(i64),
}

/// Code, expiry and countdown observed in a single critical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSnapshot {
    pub code: u16,
    pub expires_at: DateTime<Utc>,
    /// Generation counter: 1 for the code created at construction, +1 per rotation.
    pub epoch: u64,
    pub time_remaining: i64,
}

#[derive(Debug)]
struct GeneratorState {
    code: u16,
    expires_at: DateTime<Utc>,
    epoch: u64,
}

pub struct CodeGenerator {
    validity: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<GeneratorState>,
}

fn random_code() -> u16 {
    rand::rng().random_range(CODE_MIN..=CODE_MAX)
}

fn remaining_secs(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expires_at - now).num_seconds().max(0)
}

impl CodeGenerator {
    /// Create a generator and its first code.
    pub fn new(validity: Duration, clock: Arc<dyn Clock>) -> Result<Self, CodeGeneratorError> {
        if validity <= Duration::zero() {
            return Err(CodeGeneratorError::NonPositiveValidity(validity.num_seconds()));
        }
        let expires_at = clock.now() + validity;
        debug!(epoch = 1, %expires_at, "generated initial attendance code");
        Ok(Self {
            validity,
            clock,
            state: Mutex::new(GeneratorState {
                code: random_code(),
                expires_at,
                epoch: 1,
            }),
        })
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// The live code, rotating first if the previous one has expired.
    pub fn current_code(&self) -> u16 {
        self.snapshot().code
    }

    /// Read code, expiry and countdown atomically, rotating first if expired.
    pub fn snapshot(&self) -> CodeSnapshot {
        let mut state = self.lock();
        let now = self.clock.now();
        if now > state.expires_at {
            state.code = random_code();
            state.expires_at = now + self.validity;
            state.epoch += 1;
            debug!(epoch = state.epoch, expires_at = %state.expires_at, "rotated attendance code");
        }
        CodeSnapshot {
            code: state.code,
            expires_at: state.expires_at,
            epoch: state.epoch,
            time_remaining: remaining_secs(state.expires_at, now),
        }
    }

    /// `true` iff `candidate` is the stored code and its window has not closed.
    /// Does not rotate.
    pub fn is_valid(&self, candidate: i64) -> bool {
        let state = self.lock();
        candidate == i64::from(state.code) && self.clock.now() <= state.expires_at
    }

    /// Whole seconds until the stored code expires, never negative. Does not rotate.
    pub fn time_remaining(&self) -> i64 {
        let state = self.lock();
        remaining_secs(state.expires_at, self.clock.now())
    }

    // State is replaced field by field under the lock and never left half
    // written, so a poisoned guard is still consistent.
    fn lock(&self) -> MutexGuard<'_, GeneratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
