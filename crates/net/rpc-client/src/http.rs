//! `reqwest`-backed [`RpcClient`] talking plain JSON-RPC over HTTP.

use indexer_primitives::{Block, ChainParams, Receipt, Transaction};
use serde_json::json;

use crate::client::RpcClient;
use crate::error::{RpcError, RpcResult};
use crate::wire::{RawBlockEnvelope, RawQuantityEnvelope, RawReceiptsEnvelope};

/// HTTP status and body substrings that conventionally signal
/// rate-limiting on public JSON-RPC endpoints (spec §6: "the fetcher
/// distinguishes only rate-limit error ... vs other by a
/// caller-provided predicate").
fn looks_rate_limited(status: Option<reqwest::StatusCode>, body: &str) -> bool {
    if status == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) {
        return true;
    }
    let body = body.to_ascii_lowercase();
    body.contains("rate limit") || body.contains("too many requests") || body.contains("-32005")
}

#[derive(Debug, Clone)]
pub struct HttpRpcClient {
    http: reqwest::Client,
    endpoint: String,
    chain_params: ChainParams,
}

impl HttpRpcClient {
    pub fn new(endpoint: impl Into<String>, chain_params: ChainParams) -> Self {
        Self { http: reqwest::Client::new(), endpoint: endpoint.into(), chain_params }
    }

    async fn call(&self, method: &str, params: serde_json::Value) -> RpcResult<String> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| RpcError::Transport(e.to_string()))?;

        if !status.is_success() {
            if looks_rate_limited(Some(status), &text) {
                return Err(RpcError::RateLimited(format!("{method}: http {status}")));
            }
            return Err(RpcError::Transport(format!("{method}: http {status}: {text}")));
        }
        if looks_rate_limited(None, &text) {
            return Err(RpcError::RateLimited(format!("{method}: {text}")));
        }

        Ok(text)
    }

    async fn call_quantity(&self, method: &str, params: serde_json::Value) -> RpcResult<u64> {
        let text = self.call(method, params).await?;
        let envelope: RawQuantityEnvelope =
            serde_json::from_str(&text).map_err(|e| RpcError::Decode(e.to_string()))?;
        if let Some(err) = envelope.error {
            return Err(RpcError::Transport(format!("{}: {}", err.code, err.message)));
        }
        let result = envelope.result.ok_or_else(|| RpcError::Decode("missing result".into()))?;
        crate::wire::parse_hex_u64(&result)
    }
}

#[async_trait::async_trait]
impl RpcClient for HttpRpcClient {
    async fn get_latest_block_number(&self) -> RpcResult<u64> {
        self.call_quantity("eth_blockNumber", json!([])).await
    }

    async fn get_block_by_number(&self, height: u64) -> RpcResult<(Block, Vec<Transaction>)> {
        let text = self
            .call("eth_getBlockByNumber", json!([indexer_primitives::hex_quantity::hex_u64(height), true]))
            .await?;
        let envelope: RawBlockEnvelope =
            serde_json::from_str(&text).map_err(|e| RpcError::Decode(e.to_string()))?;
        if let Some(err) = envelope.error {
            return Err(RpcError::Transport(format!("{}: {}", err.code, err.message)));
        }
        let raw = envelope.result.ok_or_else(|| RpcError::Decode("missing result".into()))?;
        raw.into_block_and_transactions(&self.chain_params)
    }

    async fn get_block_receipts(&self, height: u64) -> RpcResult<Vec<Receipt>> {
        let text = self
            .call("eth_getBlockReceipts", json!([indexer_primitives::hex_quantity::hex_u64(height)]))
            .await?;
        let envelope: RawReceiptsEnvelope =
            serde_json::from_str(&text).map_err(|e| RpcError::Decode(e.to_string()))?;
        if let Some(err) = envelope.error {
            return Err(RpcError::Transport(format!("{}: {}", err.code, err.message)));
        }
        let raw = envelope.result.ok_or_else(|| RpcError::Decode("missing result".into()))?;
        raw.into_iter().map(|r| r.into_receipt()).collect()
    }

    async fn close(&self) -> RpcResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_429_as_rate_limited() {
        assert!(looks_rate_limited(Some(reqwest::StatusCode::TOO_MANY_REQUESTS), ""));
    }

    #[test]
    fn classifies_rate_limit_message_body_as_rate_limited() {
        assert!(looks_rate_limited(None, r#"{"error":{"message":"Rate limit exceeded"}}"#));
    }

    #[test]
    fn does_not_classify_ordinary_errors_as_rate_limited() {
        assert!(!looks_rate_limited(
            Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            r#"{"error":{"message":"internal error"}}"#
        ));
    }
}
