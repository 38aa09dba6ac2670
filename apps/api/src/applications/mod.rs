// Application submission and review.
// A submission is only accepted while the unlock gate is open; the score at that moment
// is snapshotted and never rewritten by later status changes.

pub mod handlers;
pub mod lifecycle;
pub mod lock;
pub mod submission;
