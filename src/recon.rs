//! Chronological merge and balance accumulation over account activity.
//!
//! All intermediate arithmetic runs on exact [`BigDecimal`] Wei amounts; the
//! floating Ether figure only appears at the return boundary.

use bigdecimal::{BigDecimal, ParseBigDecimalError, ToPrimitive, Zero};

use crate::models::{AccountTx, TaggedTx, TxKind};

const WEI_PER_ETHER: f64 = 1e18;

#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("unsupported transaction kind for balance accumulation: {0}")]
    UnsupportedKind(TxKind),
    #[error("invalid numeric {field} field in transaction record")]
    BadNumeric {
        field: &'static str,
        #[source]
        source: ParseBigDecimalError,
    },
}

/// Merge two individually time-sorted transaction lists into one time-sorted
/// sequence, tagging every record with the list it came from.
///
/// Tie-break: on equal timestamps the normal-side record is emitted first.
/// That preserves the upstream ordering contract and is deliberate, not an
/// accident of the loop.
pub fn merge_chronological(normal: &[AccountTx], internal: &[AccountTx]) -> Vec<TaggedTx> {
    let mut merged = Vec::with_capacity(normal.len() + internal.len());
    let (mut i, mut j) = (0, 0);

    while i < normal.len() && j < internal.len() {
        if normal[i].timestamp_secs() <= internal[j].timestamp_secs() {
            merged.push(tag(&normal[i], TxKind::Normal));
            i += 1;
        } else {
            merged.push(tag(&internal[j], TxKind::Internal));
            j += 1;
        }
    }
    merged.extend(normal[i..].iter().map(|tx| tag(tx, TxKind::Normal)));
    merged.extend(internal[j..].iter().map(|tx| tag(tx, TxKind::Internal)));

    merged
}

fn tag(tx: &AccountTx, transaction_type: TxKind) -> TaggedTx {
    TaggedTx {
        tx: tx.clone(),
        transaction_type,
    }
}

/// Net balance change in Ether for `address` over a homogeneous list of one
/// declared kind.
///
/// Only `normal` and `internal` lists can be accumulated; gas is charged to
/// the sender only for the `normal` kind, and regardless of success — fees
/// are paid even when the call reverts. `value` moves only on success.
pub fn net_flow(address: &str, txs: &[AccountTx], kind: TxKind) -> Result<f64, ReconError> {
    if !matches!(kind, TxKind::Normal | TxKind::Internal) {
        return Err(ReconError::UnsupportedKind(kind));
    }

    let address = address.to_lowercase();
    let mut sum = BigDecimal::zero();
    for tx in txs {
        accumulate(&mut sum, &address, tx, kind == TxKind::Normal)?;
    }
    Ok(wei_to_ether(&sum))
}

/// Net balance change in Ether over a merged, per-record-tagged sequence.
///
/// Each record's own tag governs fee treatment: `normal` charges gas to the
/// sender, `internal` has no recognized fee model and charges nothing. Any
/// other tag aborts the computation.
pub fn net_flow_merged(address: &str, txs: &[TaggedTx]) -> Result<f64, ReconError> {
    let address = address.to_lowercase();
    let mut sum = BigDecimal::zero();
    for tagged in txs {
        let charge_gas = match tagged.transaction_type {
            TxKind::Normal => true,
            TxKind::Internal => false,
            other => return Err(ReconError::UnsupportedKind(other)),
        };
        accumulate(&mut sum, &address, &tagged.tx, charge_gas)?;
    }
    Ok(wei_to_ether(&sum))
}

/// Ether spent on gas by `address` across token-transfer events, as a
/// (negative or zero) Ether figure.
///
/// Token events report no success flag, so the cost is charged
/// unconditionally whenever the address is the sender; recipients contribute
/// nothing.
pub fn token_gas_spend(address: &str, txs: &[AccountTx]) -> Result<f64, ReconError> {
    let address = address.to_lowercase();
    let mut sum = BigDecimal::zero();
    for tx in txs {
        if tx.from.to_lowercase() == address {
            sum -= gas_cost(tx)?;
        }
    }
    Ok(wei_to_ether(&sum))
}

fn accumulate(
    sum: &mut BigDecimal,
    address_lc: &str,
    tx: &AccountTx,
    charge_gas: bool,
) -> Result<(), ReconError> {
    if tx.from.to_lowercase() == address_lc {
        if tx.succeeded() {
            *sum -= parse_field(Some(&tx.value), "value")?;
        }
        if charge_gas {
            *sum -= gas_cost(tx)?;
        }
    }
    if tx.to.to_lowercase() == address_lc && tx.succeeded() {
        *sum += parse_field(Some(&tx.value), "value")?;
    }
    Ok(())
}

fn gas_cost(tx: &AccountTx) -> Result<BigDecimal, ReconError> {
    let price = parse_field(tx.gas_price.as_deref(), "gasPrice")?;
    let used = parse_field(tx.gas_used.as_deref(), "gasUsed")?;
    Ok(price * used)
}

// A missing field accumulates as zero, matching the provider's sparser record
// shapes (internal transactions have no gasPrice).
fn parse_field(raw: Option<&str>, field: &'static str) -> Result<BigDecimal, ReconError> {
    match raw {
        None => Ok(BigDecimal::zero()),
        Some(s) => s
            .parse()
            .map_err(|source| ReconError::BadNumeric { field, source }),
    }
}

pub fn wei_to_ether(wei: &BigDecimal) -> f64 {
    wei.to_f64().unwrap_or(f64::NAN) / WEI_PER_ETHER
}
