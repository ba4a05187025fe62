/// Minimal Diem JSON-RPC client, only what the faucet needs to confirm funding
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::chain::wallet::AccountAddress;

#[derive(Debug, Error)]
pub enum JsonRpcError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json-rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AmountView {
    pub amount: u64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountView {
    pub address: String,
    #[serde(default)]
    pub balances: Vec<AmountView>,
    pub sequence_number: u64,
}

impl AccountView {
    /// Balance in `currency`, zero when the account holds none
    pub fn balance(&self, currency: &str) -> u64 {
        self.balances
            .iter()
            .find(|amount| amount.currency == currency)
            .map(|amount| amount.amount)
            .unwrap_or(0)
    }
}

#[derive(Clone)]
pub struct DiemJsonRpc {
    client: Client,
    endpoint: String,
}

impl DiemJsonRpc {
    pub fn new(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    /// Look up an account; `None` when it does not exist on chain yet
    pub async fn get_account(
        &self,
        address: &AccountAddress,
    ) -> Result<Option<AccountView>, JsonRpcError> {
        self.call("get_account", json!([address.to_hex()])).await
    }

    async fn call<T>(&self, method: &str, params: Value) -> Result<Option<T>, JsonRpcError>
    where
        T: for<'de> Deserialize<'de>,
    {
        debug!("json-rpc {} {}", method, params);

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response: JsonRpcResponse<T> = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(JsonRpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::wallet::LocalAccount;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn address() -> AccountAddress {
        LocalAccount::from_private_key_hex(&"00".repeat(32))
            .unwrap()
            .address()
    }

    #[tokio::test]
    async fn test_missing_account_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "get_account",
                "params": ["bb84d9cdf7362e4e2522265b185127cb"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": null,
                "diem_chain_id": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rpc = DiemJsonRpc::new(Client::new(), server.uri());
        assert_eq!(rpc.get_account(&address()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_account_balances() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {
                    "address": "bb84d9cdf7362e4e2522265b185127cb",
                    "authentication_key": "08e845d10bbb594fcffceb36d934a188bb84d9cdf7362e4e2522265b185127cb",
                    "balances": [
                        {"amount": 1000, "currency": "XDX"},
                        {"amount": 5000000000u64, "currency": "XUS"}
                    ],
                    "sequence_number": 0,
                    "is_frozen": false
                }
            })))
            .mount(&server)
            .await;

        let rpc = DiemJsonRpc::new(Client::new(), server.uri());
        let account = rpc.get_account(&address()).await.unwrap().unwrap();

        assert_eq!(account.balance("XUS"), 5_000_000_000);
        assert_eq!(account.balance("XDX"), 1000);
        assert_eq!(account.balance("EUR"), 0);
    }

    #[tokio::test]
    async fn test_rpc_error_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32602, "message": "Invalid param account address"}
            })))
            .mount(&server)
            .await;

        let rpc = DiemJsonRpc::new(Client::new(), server.uri());
        let err = rpc.get_account(&address()).await.unwrap_err();

        assert!(matches!(err, JsonRpcError::Rpc { code: -32602, .. }));
    }
}
