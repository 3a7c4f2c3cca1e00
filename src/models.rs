use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Envelope every Etherscan account endpoint wraps its payload in.
///
/// `result` is a string for the balance action and an array of records for
/// the transaction-list actions, so it stays a raw `Value` until the caller
/// has checked `status`.
#[derive(Debug, Deserialize)]
pub struct EtherscanResponse {
    pub status: String,
    pub message: String,
    pub result: serde_json::Value,
}

impl EtherscanResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }
}

/// The transaction kinds the account API serves, in provider terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Normal,
    Internal,
    Erc20,
    Erc721,
    Erc1155,
}

impl TxKind {
    /// The `action` query parameter value for this kind.
    pub fn action(self) -> &'static str {
        match self {
            TxKind::Normal => "txlist",
            TxKind::Internal => "txlistinternal",
            TxKind::Erc20 => "tokentx",
            TxKind::Erc721 => "tokennfttx",
            TxKind::Erc1155 => "token1155tx",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TxKind::Normal => "normal",
            TxKind::Internal => "internal",
            TxKind::Erc20 => "erc20",
            TxKind::Erc721 => "erc721",
            TxKind::Erc1155 => "erc1155",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown transaction kind {0:?}; expected normal, internal, erc20, erc721 or erc1155")]
pub struct UnknownTxKind(pub String);

impl FromStr for TxKind {
    type Err = UnknownTxKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(TxKind::Normal),
            "internal" => Ok(TxKind::Internal),
            "erc20" => Ok(TxKind::Erc20),
            "erc721" => Ok(TxKind::Erc721),
            "erc1155" => Ok(TxKind::Erc1155),
            other => Err(UnknownTxKind(other.to_string())),
        }
    }
}

/// One record from a transaction-list response, field names as the provider
/// sends them.
///
/// Internal transactions carry no `gasPrice`, and token-transfer events carry
/// no `isError`, so those are optional; any fields beyond the ones named here
/// ride along in `extra` and survive a JSON dump untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTx {
    #[serde(rename = "blockNumber", default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    pub from: String,
    #[serde(default)]
    pub to: String,
    pub value: String,
    #[serde(rename = "gasPrice", default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(rename = "gasUsed", default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<String>,
    #[serde(rename = "isError", default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AccountTx {
    /// Numeric value of `timeStamp`; malformed timestamps sort first.
    pub fn timestamp_secs(&self) -> u64 {
        self.time_stamp.parse().unwrap_or(0)
    }

    /// `isError == "0"` is the provider's success flag. A record without the
    /// flag (token events) does not count as successful here.
    pub fn succeeded(&self) -> bool {
        self.is_error.as_deref() == Some("0")
    }
}

/// An [`AccountTx`] annotated with the list it was merged out of. Serializes
/// flat, so a dumped record looks like the provider's with one extra
/// `transaction_type` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedTx {
    #[serde(flatten)]
    pub tx: AccountTx,
    pub transaction_type: TxKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [
            TxKind::Normal,
            TxKind::Internal,
            TxKind::Erc20,
            TxKind::Erc721,
            TxKind::Erc1155,
        ] {
            assert_eq!(kind.as_str().parse::<TxKind>().unwrap(), kind);
        }
        assert!("erc42".parse::<TxKind>().is_err());
    }

    #[test]
    fn normal_tx_deserializes_with_provider_names() {
        let raw = serde_json::json!({
            "blockNumber": "18000000",
            "timeStamp": "1700000000",
            "hash": "0xdeadbeef",
            "from": "0xAAA",
            "to": "0xBBB",
            "value": "1000000000000000000",
            "gas": "21000",
            "gasPrice": "2",
            "gasUsed": "21000",
            "isError": "0",
            "nonce": "7"
        });
        let tx: AccountTx = serde_json::from_value(raw).unwrap();
        assert_eq!(tx.timestamp_secs(), 1_700_000_000);
        assert!(tx.succeeded());
        assert_eq!(tx.gas_price.as_deref(), Some("2"));
        // unknown provider fields are preserved for dumps
        assert_eq!(tx.extra.get("nonce").and_then(|v| v.as_str()), Some("7"));
    }

    #[test]
    fn internal_tx_tolerates_missing_gas_price() {
        let raw = serde_json::json!({
            "timeStamp": "1700000001",
            "from": "0xaaa",
            "to": "0xbbb",
            "value": "5",
            "gasUsed": "0",
            "isError": "0"
        });
        let tx: AccountTx = serde_json::from_value(raw).unwrap();
        assert_eq!(tx.gas_price, None);
        assert!(tx.succeeded());
    }

    #[test]
    fn token_event_without_is_error_is_not_successful() {
        let raw = serde_json::json!({
            "timeStamp": "1700000002",
            "from": "0xaaa",
            "to": "0xbbb",
            "value": "123",
            "gasPrice": "10",
            "gasUsed": "60000"
        });
        let tx: AccountTx = serde_json::from_value(raw).unwrap();
        assert!(!tx.succeeded());
    }

    #[test]
    fn tagged_tx_serializes_flat() {
        let tx: AccountTx = serde_json::from_value(serde_json::json!({
            "timeStamp": "1",
            "from": "0xa",
            "to": "0xb",
            "value": "0"
        }))
        .unwrap();
        let tagged = TaggedTx {
            tx,
            transaction_type: TxKind::Internal,
        };
        let v = serde_json::to_value(&tagged).unwrap();
        assert_eq!(v.get("timeStamp").and_then(|v| v.as_str()), Some("1"));
        assert_eq!(
            v.get("transaction_type").and_then(|v| v.as_str()),
            Some("internal")
        );
    }
}
