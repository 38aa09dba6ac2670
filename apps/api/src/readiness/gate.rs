//! Unlock gate: `is_unlocked(score, min_required) := score >= min_required`.
//!
//! Both the apply control and the lock overlay read the same [`UnlockDecision`], so the
//! two can never disagree.

use serde::{Serialize, Serializer};

use crate::errors::AppError;
use crate::readiness::evaluator::MAX_SCORE;

/// Normalises a stored threshold: NULL and negatives mean "no requirement" (0);
/// values above 100 are capped at 100.
pub fn normalize_min_required(raw: Option<i32>) -> u8 {
    raw.unwrap_or(0).clamp(0, MAX_SCORE as i32) as u8
}

pub fn is_unlocked(score: u8, min_required: u8) -> bool {
    score >= min_required
}

/// Built only through [`UnlockDecision::evaluate`]; the fields are read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockDecision {
    readiness_score: u8,
    min_readiness_score: u8,
    is_unlocked: bool,
}

impl UnlockDecision {
    pub fn evaluate(readiness_score: u8, raw_min_required: Option<i32>) -> Self {
        let min_readiness_score = normalize_min_required(raw_min_required);
        Self {
            readiness_score,
            min_readiness_score,
            is_unlocked: is_unlocked(readiness_score, min_readiness_score),
        }
    }

    pub fn readiness_score(&self) -> u8 {
        self.readiness_score
    }

    /// Normalised threshold in `0..=100`.
    pub fn min_readiness_score(&self) -> u8 {
        self.min_readiness_score
    }

    pub fn is_unlocked(&self) -> bool {
        self.is_unlocked
    }

    /// Whether the apply call-to-action is enabled.
    pub fn apply_enabled(&self) -> bool {
        self.is_unlocked
    }

    /// Lock overlay text; `None` when unlocked.
    pub fn lock_message(&self) -> Option<String> {
        (!self.is_unlocked).then(|| format!("{}% readiness required", self.min_readiness_score))
    }

    /// Rejects a write when the gate is closed.
    pub fn ensure_unlocked(&self) -> Result<(), AppError> {
        if self.is_unlocked {
            Ok(())
        } else {
            Err(AppError::Locked {
                required: self.min_readiness_score,
            })
        }
    }
}

#[derive(Serialize)]
struct UnlockDecisionWire {
    readiness_score: u8,
    min_readiness_score: u8,
    is_unlocked: bool,
    apply_enabled: bool,
    lock_message: Option<String>,
}

impl Serialize for UnlockDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        UnlockDecisionWire {
            readiness_score: self.readiness_score(),
            min_readiness_score: self.min_readiness_score(),
            is_unlocked: self.is_unlocked(),
            apply_enabled: self.apply_enabled(),
            lock_message: self.lock_message(),
        }
        .serialize(serializer)
    }
}
