//! Batch scoring for listings: each posting decorated with its own gate decision.

use futures::future::join_all;
use serde::Serialize;

use crate::auth::Session;
use crate::models::posting::Posting;
use crate::readiness::evaluator::{effective_score, ReadinessScorer};
use crate::readiness::gate::UnlockDecision;

#[derive(Debug, Clone, Serialize)]
pub struct ScoredPosting<P> {
    #[serde(flatten)]
    pub posting: P,
    #[serde(flatten)]
    pub readiness: UnlockDecision,
}

/// Scores one posting against the session.
pub async fn score_posting<P: Posting>(
    scorer: &dyn ReadinessScorer,
    session: &Session,
    posting: P,
) -> ScoredPosting<P> {
    let score = effective_score(scorer, session, posting.target()).await;
    let readiness = UnlockDecision::evaluate(score, posting.min_readiness_score());
    ScoredPosting { posting, readiness }
}

/// Scores every posting concurrently. Output order equals input order; a failed
/// evaluation only affects its own posting (score 0, locked).
pub async fn score_postings<P: Posting>(
    scorer: &dyn ReadinessScorer,
    session: &Session,
    postings: Vec<P>,
) -> Vec<ScoredPosting<P>> {
    join_all(
        postings
            .into_iter()
            .map(|posting| score_posting(scorer, session, posting)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::posting::JobRow;
    use crate::readiness::evaluator::tests::{signed_in, CannedScorer};
    use chrono::Utc;
    use uuid::Uuid;

    fn job(min: Option<i32>) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            description: None,
            category: None,
            employment_type: Some("full_time".to_string()),
            location: None,
            min_readiness_score: min,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_length() {
        let jobs = vec![job(Some(10)), job(Some(50)), job(Some(90))];
        let scorer = CannedScorer::new(jobs.iter().map(|j| (j.id, Ok(Some(60)))).collect());
        let ids: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();

        let scored = score_postings(&scorer, &signed_in(), jobs).await;

        assert_eq!(scored.len(), 3);
        let out_ids: Vec<Uuid> = scored.iter().map(|s| s.posting.id).collect();
        assert_eq!(out_ids, ids);
        let unlocked: Vec<bool> = scored.iter().map(|s| s.readiness.is_unlocked()).collect();
        assert_eq!(unlocked, vec![true, true, false]);
    }

    #[tokio::test]
    async fn test_partial_failure_defaults_only_failed_posting() {
        let ok = job(Some(40));
        let broken = job(Some(40));
        let missing = job(Some(0));
        let scorer = CannedScorer::new(vec![
            (ok.id, Ok(Some(70))),
            (broken.id, Err("503".to_string())),
        ]);

        let scored = score_postings(&scorer, &signed_in(), vec![ok, broken, missing]).await;

        assert_eq!(scored[0].readiness.readiness_score(), 70);
        assert!(scored[0].readiness.is_unlocked());
        assert_eq!(scored[1].readiness.readiness_score(), 0);
        assert!(!scored[1].readiness.is_unlocked());
        // Unknown to the scorer, but a zero threshold still unlocks.
        assert_eq!(scored[2].readiness.readiness_score(), 0);
        assert!(scored[2].readiness.is_unlocked());
    }

    #[tokio::test]
    async fn test_thresholds_do_not_leak_between_postings() {
        let strict = job(Some(95));
        let lenient = job(Some(20));
        let scorer = CannedScorer::new(vec![(strict.id, Ok(Some(50))), (lenient.id, Ok(Some(50)))]);

        let scored = score_postings(&scorer, &signed_in(), vec![strict, lenient]).await;

        assert_eq!(scored[0].readiness.readiness_score(), 50);
        assert_eq!(scored[1].readiness.readiness_score(), 50);
        assert!(!scored[0].readiness.is_unlocked());
        assert!(scored[1].readiness.is_unlocked());
    }

    #[tokio::test]
    async fn test_anonymous_batch_is_locked_without_calls() {
        let jobs = vec![job(Some(10)), job(None)];
        let scorer = CannedScorer::new(jobs.iter().map(|j| (j.id, Ok(Some(100)))).collect());

        let scored = score_postings(&scorer, &Session::Anonymous, jobs).await;

        assert_eq!(scorer.call_count(), 0);
        assert!(!scored[0].readiness.is_unlocked());
        assert!(scored[1].readiness.is_unlocked());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let scorer = CannedScorer::new(vec![]);
        let scored = score_postings::<JobRow>(&scorer, &signed_in(), vec![]).await;
        assert!(scored.is_empty());
    }

    #[test]
    fn test_scored_posting_flattens_fields() {
        let posting = job(Some(90));
        let scored = ScoredPosting {
            readiness: UnlockDecision::evaluate(80, posting.min_readiness_score),
            posting,
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["title"], "Backend Engineer");
        assert_eq!(value["readiness_score"], 80);
        assert_eq!(value["min_readiness_score"], 90);
        assert_eq!(value["lock_message"], "90% readiness required");
    }
}
