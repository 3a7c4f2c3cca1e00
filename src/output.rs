use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write `records` to `path` as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, records: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(records).context("failed to serialize records")?;
    std::fs::write(path, pretty)
        .with_context(|| format!("failed writing {}", path.display()))?;
    tracing::info!("json written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountTx;

    #[test]
    fn dump_is_pretty_printed_with_provider_field_names() {
        let tx: AccountTx = serde_json::from_value(serde_json::json!({
            "timeStamp": "1700000000",
            "from": "0xaaa",
            "to": "0xbbb",
            "value": "1",
            "gasPrice": "2",
            "gasUsed": "21000",
            "isError": "0"
        }))
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx_normal.json");
        write_json(&path, &vec![tx]).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'));
        assert!(raw.contains("\"timeStamp\""));
        assert!(raw.contains("\"gasPrice\""));

        let parsed: Vec<AccountTx> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
    }
}
