// Readiness scoring and the unlock gate.
// Scores are recomputed on every request; nothing here caches or persists a score
// except the application snapshot written by `applications::submission`.

pub mod batch;
pub mod evaluator;
pub mod gate;
pub mod handlers;

pub use batch::{score_posting, score_postings, ScoredPosting};
pub use evaluator::{effective_score, LedgerReadinessScorer, ReadinessScorer};
pub use gate::UnlockDecision;
