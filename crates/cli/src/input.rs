use std::io::Read;

use anyhow::{Context, Result};
use serde::Deserialize;
use txwatch_core::Transaction;

/// Accepted input shapes: a bare array, or an object wrapping one under
/// `transactions` (the shape analysis responses echo back).
#[derive(Deserialize)]
#[serde(untagged)]
enum InputDocument {
    List(Vec<Transaction>),
    Wrapped { transactions: Vec<Transaction> },
}

/// Read transactions from a file path, or stdin when `source` is `-`.
pub fn read_transactions(source: &str) -> Result<Vec<Transaction>> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read transactions from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read transactions from '{}'", source))?
    };
    parse_transactions(&raw).with_context(|| format!("invalid transaction input '{}'", source))
}

pub fn parse_transactions(raw: &str) -> Result<Vec<Transaction>> {
    let doc: InputDocument = serde_json::from_str(raw)?;
    Ok(match doc {
        InputDocument::List(txns) => txns,
        InputDocument::Wrapped { transactions } => transactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use txwatch_core::TransactionType;

    #[test]
    fn parses_bare_array() {
        let txns = parse_transactions(
            r#"[
                {"id": "txn_0", "user_id": "user_001", "amount": 120.5, "date": "2025-01-01", "type": "deposit", "description": "Grocery"},
                {"id": "txn_1", "subject_id": "user_001", "amount": 80, "date": "2025-01-02", "type": "refund"}
            ]"#,
        )
        .unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].kind, TransactionType::Deposit);
        assert_eq!(txns[1].user_id, "user_001");
        assert_eq!(txns[1].kind, TransactionType::Other);
        assert_eq!(txns[1].description, "");
    }

    #[test]
    fn parses_wrapped_object() {
        let txns = parse_transactions(
            r#"{"user_id": "user_002", "transactions": [
                {"id": "t", "user_id": "user_002", "amount": 9500, "date": "2025-01-01", "type": "transfer"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, 9500.0);
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(parse_transactions(r#"[{"id": "t", "amount": 1}]"#).is_err());
        assert!(parse_transactions("not json").is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("txns.json");
        std::fs::write(
            &path,
            r#"[{"id": "t", "user_id": "u", "amount": 1, "date": "2025-01-01", "type": "deposit"}]"#,
        )
        .unwrap();
        let txns = read_transactions(path.to_str().unwrap()).unwrap();
        assert_eq!(txns[0].id, "t");

        let err = read_transactions(dir.path().join("missing.json").to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("failed to read transactions"));
    }
}
