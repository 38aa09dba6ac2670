/// RPC client: the single point of entry for calls to the hosted backend's remote procedures.
///
/// Procedures are invoked as `POST {base_url}/rest/v1/rpc/{name}` with a JSON argument
/// object and authenticated with the service key.
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::posting::PostingTarget;
use crate::readiness::ReadinessScorer;

pub const READINESS_PROCEDURE: &str = "calculate_readiness_score";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected RPC payload: {0}")]
    Payload(String),

    #[error("RPC failed after {retries} retries")]
    Exhausted { retries: u32 },
}

impl From<RpcError> for AppError {
    fn from(e: RpcError) -> Self {
        AppError::Rpc(e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ReadinessArgs {
    user_id: Uuid,
    job_id: Option<Uuid>,
    internship_id: Option<Uuid>,
}

impl ReadinessArgs {
    fn new(user_id: Uuid, target: PostingTarget) -> Self {
        Self {
            user_id,
            job_id: target.job_id(),
            internship_id: target.internship_id(),
        }
    }
}

/// Wraps the backend's RPC endpoint with retry logic.
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl RpcClient {
    pub fn new(base_url: String, service_key: String) -> Result<Self, RpcError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        })
    }

    fn procedure_url(&self, name: &str) -> String {
        format!("{}/rest/v1/rpc/{name}", self.base_url)
    }

    /// Calls a procedure and returns its JSON result.
    /// Retries on 429 (rate limit), 5xx and transport errors with exponential backoff.
    pub async fn call<A: Serialize + ?Sized>(
        &self,
        name: &str,
        args: &A,
    ) -> Result<Value, RpcError> {
        let url = self.procedure_url(name);
        let mut last_error: Option<RpcError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 200ms, 400ms
                let delay = std::time::Duration::from_millis(200 * (1 << (attempt - 1)));
                warn!(
                    "RPC {name} attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("apikey", &self.service_key)
                .bearer_auth(&self.service_key)
                .json(args)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(RpcError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("RPC {name} returned {}: {}", status, body);
                last_error = Some(RpcError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or(body);
                return Err(RpcError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let value: Value = response.json().await?;
            debug!("RPC {name} succeeded");
            return Ok(value);
        }

        Err(last_error.unwrap_or(RpcError::Exhausted {
            retries: MAX_RETRIES,
        }))
    }
}

/// Reads the readiness procedure's result: an integer, a float, or `null`.
fn parse_score(value: &Value) -> Result<Option<i64>, RpcError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .map(Some)
            .ok_or_else(|| RpcError::Payload(n.to_string())),
        // Some deployments wrap scalar results as `[{"calculate_readiness_score": 80}]`.
        Value::Array(rows) => match rows.first() {
            None => Ok(None),
            Some(Value::Object(obj)) => match obj.get(READINESS_PROCEDURE) {
                Some(inner) => parse_score(inner),
                None => Err(RpcError::Payload(value.to_string())),
            },
            Some(other) => parse_score(other),
        },
        other => Err(RpcError::Payload(other.to_string())),
    }
}

/// Readiness scorer backed by the hosted `calculate_readiness_score` procedure.
pub struct RpcReadinessScorer(pub RpcClient);

#[async_trait]
impl ReadinessScorer for RpcReadinessScorer {
    async fn score(&self, user_id: Uuid, target: PostingTarget) -> Result<Option<i64>, AppError> {
        let value = self
            .0
            .call(READINESS_PROCEDURE, &ReadinessArgs::new(user_id, target))
            .await?;
        Ok(parse_score(&value)?)
    }

    fn backend(&self) -> &'static str {
        "rpc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_integer_score() {
        assert_eq!(parse_score(&json!(80)).unwrap(), Some(80));
    }

    #[test]
    fn test_parse_null_score() {
        assert_eq!(parse_score(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_parse_float_score_rounds() {
        assert_eq!(parse_score(&json!(74.6)).unwrap(), Some(75));
    }

    #[test]
    fn test_parse_wrapped_row() {
        let value = json!([{ "calculate_readiness_score": 42 }]);
        assert_eq!(parse_score(&value).unwrap(), Some(42));
        assert_eq!(parse_score(&json!([])).unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_strings() {
        assert!(matches!(parse_score(&json!("80")), Err(RpcError::Payload(_))));
    }

    #[test]
    fn test_args_set_exactly_one_target() {
        let user = Uuid::new_v4();
        let job = Uuid::new_v4();
        let args = serde_json::to_value(ReadinessArgs::new(user, PostingTarget::Job(job))).unwrap();
        assert_eq!(args["job_id"], json!(job));
        assert!(args["internship_id"].is_null());
    }

    #[test]
    fn test_procedure_url_trims_trailing_slash() {
        let client =
            RpcClient::new("https://db.example.co/".to_string(), "key".to_string()).unwrap();
        assert_eq!(
            client.procedure_url(READINESS_PROCEDURE),
            "https://db.example.co/rest/v1/rpc/calculate_readiness_score"
        );
    }
}
