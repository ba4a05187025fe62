pub mod wallet;
pub mod faucet;
pub mod json_rpc;

pub use wallet::{AccountAddress, AuthenticationKey, KeyError, LocalAccount};
pub use faucet::{Faucet, FaucetError, MintReceipt, TestnetFaucet};
pub use json_rpc::{AccountView, DiemJsonRpc, JsonRpcError};
