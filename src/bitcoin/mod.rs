pub mod daemon;
pub mod multi_sig;
pub mod rpc;

use ::bitcoin::{PublicKey, Txid};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `validateaddress`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddressInfo {
    #[serde(rename = "isvalid")]
    pub is_valid: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "ismine", default)]
    pub is_mine: bool,
    #[serde(rename = "isscript", default)]
    pub is_script: bool,
    #[serde(default)]
    pub pubkey: Option<PublicKey>,
    /// Participants of a multisig script.
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(rename = "sigsrequired", default)]
    pub sigs_required: Option<u32>,
}

/// `listunspent`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Unspent {
    pub txid: Txid,
    pub vout: u32,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: String,
    #[serde(rename = "redeemScript", default)]
    pub redeem_script: Option<String>,
    pub amount: Decimal,
    pub confirmations: u32,
}

/// `getrawtransaction` with verbose output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTransaction {
    pub txid: Txid,
    pub vout: Vec<TxOut>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TxOut {
    pub value: Decimal,
    pub n: u32,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKey,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptPubKey {
    pub hex: String,
    #[serde(default)]
    pub addresses: Vec<String>,
    // Newer nodes report a single `address` instead of `addresses`.
    #[serde(default)]
    pub address: Option<String>,
}

impl ScriptPubKey {
    pub fn pays(&self, address: &str) -> bool {
        self.address.as_deref() == Some(address) || self.addresses.iter().any(|a| a == address)
    }
}

/// `signrawtransaction`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignedRawTransaction {
    pub hex: String,
    pub complete: bool,
    #[serde(default)]
    pub errors: Vec<Value>,
}

/// An input handed to `createrawtransaction`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Input {
    pub txid: Txid,
    pub vout: u32,
}

/// The output being spent, as `signrawtransaction` needs to see it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrevOut {
    pub txid: Txid,
    pub vout: u32,
    #[serde(rename = "scriptPubKey")]
    pub script_pub_key: String,
    #[serde(rename = "redeemScript", skip_serializing_if = "Option::is_none")]
    pub redeem_script: Option<String>,
}

/// `listtransactions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub category: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub confirmations: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<Txid>,
}

/// `addmultisigaddress` returns a bare address on old nodes and an object on
/// newer ones.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MultisigAddress {
    Address(String),
    WithScript {
        address: String,
        #[serde(rename = "redeemScript")]
        redeem_script: String,
    },
}

impl MultisigAddress {
    pub fn address(&self) -> &str {
        match self {
            MultisigAddress::Address(address) => address,
            MultisigAddress::WithScript { address, .. } => address,
        }
    }

    pub fn redeem_script(&self) -> Option<&str> {
        match self {
            MultisigAddress::Address(_) => None,
            MultisigAddress::WithScript { redeem_script, .. } => Some(redeem_script),
        }
    }
}
