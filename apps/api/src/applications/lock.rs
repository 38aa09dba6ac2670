//! Short-lived per-(user, posting) submission lock in Redis.
//!
//! Keeps a double-clicked submit to one in-flight request. The lock is advisory: the
//! partial unique indexes on `applications` remain the authoritative duplicate check.

use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::Client as RedisClient;
use uuid::Uuid;

use crate::models::posting::PostingTarget;

const KEY_PREFIX: &str = "futora:submit";

/// Bounds both connect and reply so an unreachable Redis falls through to the unlocked path.
pub const REDIS_TIMEOUT: Duration = Duration::from_millis(300);

/// Deletes the key only if it still holds our token.
const RELEASE_SCRIPT: &str = r#"
if redis.call('get', KEYS[1]) == ARGV[1] then
    return redis.call('del', KEYS[1])
else
    return 0
end
"#;

#[derive(Clone)]
pub struct SubmitLock {
    client: RedisClient,
    ttl_ms: u64,
}

#[derive(Debug)]
pub struct SubmitLockGuard {
    key: String,
    token: String,
}

pub fn lock_key(user_id: Uuid, target: PostingTarget) -> String {
    format!("{KEY_PREFIX}:{user_id}:{}:{}", target.kind_str(), target.id())
}

impl SubmitLock {
    pub fn new(client: RedisClient, ttl_ms: u64) -> Self {
        Self { client, ttl_ms }
    }

    async fn connection(&self) -> redis::RedisResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection_with_timeouts(REDIS_TIMEOUT, REDIS_TIMEOUT)
            .await
    }

    /// `Ok(None)` when another submission for the same pair holds the lock.
    pub async fn try_acquire(
        &self,
        user_id: Uuid,
        target: PostingTarget,
    ) -> redis::RedisResult<Option<SubmitLockGuard>> {
        let key = lock_key(user_id, target);
        let token = Uuid::new_v4().to_string();
        let mut conn = self.connection().await?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&token)
            .arg("NX")
            .arg("PX")
            .arg(self.ttl_ms)
            .query_async(&mut conn)
            .await?;

        Ok(reply.map(|_| SubmitLockGuard { key, token }))
    }

    pub async fn release(&self, guard: SubmitLockGuard) -> redis::RedisResult<()> {
        let mut conn = self.connection().await?;
        let script = redis::Script::new(RELEASE_SCRIPT);
        let _: i64 = script
            .key(&guard.key)
            .arg(&guard.token)
            .invoke_async(&mut conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_key_distinguishes_kind() {
        let user = Uuid::new_v4();
        let id = Uuid::new_v4();
        let job = lock_key(user, PostingTarget::Job(id));
        let internship = lock_key(user, PostingTarget::Internship(id));
        assert_ne!(job, internship);
        assert!(job.starts_with("futora:submit:"));
        assert!(job.ends_with(&format!("job:{id}")));
    }

    #[test]
    fn test_lock_key_is_per_user() {
        let id = Uuid::new_v4();
        assert_ne!(
            lock_key(Uuid::new_v4(), PostingTarget::Job(id)),
            lock_key(Uuid::new_v4(), PostingTarget::Job(id))
        );
    }

    #[tokio::test]
    async fn test_unreachable_redis_fails_fast() {
        // Non-routable address: the connect attempt must give up on its own timeout.
        let client = RedisClient::open("redis://10.255.255.1:6379").unwrap();
        let lock = SubmitLock::new(client, 1000);

        let outcome = tokio::time::timeout(
            Duration::from_secs(3),
            lock.try_acquire(Uuid::new_v4(), PostingTarget::Job(Uuid::new_v4())),
        )
        .await;

        assert!(matches!(outcome, Ok(Err(_))), "lock acquisition should error, not hang");
    }
}
