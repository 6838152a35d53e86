use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier of the account holder a transaction belongs to.
pub type SubjectId = String;

/// A single money movement as supplied by the upstream data source.
///
/// Amount and date are kept exactly as received; they are checked and
/// normalized by the feature extractor, which reports the offending record
/// when either is unusable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    #[serde(alias = "subject_id")]
    pub user_id: SubjectId,
    /// Major currency units (e.g. dollars), cent precision.
    pub amount: f64,
    /// Calendar day as `YYYY-MM-DD`, or an RFC 3339 timestamp.
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub description: String,
}

/// Category tag of a transaction. Unrecognized tags deserialize as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "deposit"),
            TransactionType::Withdrawal => write!(f, "withdrawal"),
            TransactionType::Transfer => write!(f, "transfer"),
            TransactionType::Other => write!(f, "other"),
        }
    }
}

impl Transaction {
    /// Parse the calendar day this transaction falls on.
    ///
    /// Accepts a plain `YYYY-MM-DD` date first; timestamps keep only their
    /// date component in the offset they were written in.
    pub fn calendar_date(&self) -> Result<NaiveDate, chrono::ParseError> {
        let raw = self.date.trim();
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Ok(date),
            Err(plain_err) => DateTime::parse_from_rfc3339(raw)
                .map(|ts| ts.date_naive())
                .map_err(|_| plain_err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(date: &str) -> Transaction {
        Transaction {
            id: "txn_0".into(),
            user_id: "user_001".into(),
            amount: 120.0,
            date: date.into(),
            kind: TransactionType::Deposit,
            description: "Grocery".into(),
        }
    }

    #[test]
    fn parses_plain_date() {
        let date = txn("2025-01-31").calendar_date().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    }

    #[test]
    fn timestamp_keeps_local_calendar_day() {
        let date = txn("2025-03-01T23:30:00-05:00").calendar_date().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert!(txn("yesterday").calendar_date().is_err());
        assert!(txn("2025-02-30").calendar_date().is_err());
    }

    #[test]
    fn deserializes_wire_shape() {
        let json = r#"{
            "id": "txn_7",
            "user_id": "user_002",
            "amount": 9450.25,
            "date": "2025-01-08",
            "type": "withdrawal",
            "description": "Transaction"
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, TransactionType::Withdrawal);
        assert_eq!(t.user_id, "user_002");
        assert_eq!(t.amount, 9450.25);
    }

    #[test]
    fn unknown_type_and_subject_alias() {
        let json = r#"{
            "id": "txn_1",
            "subject_id": "acct-9",
            "amount": 10,
            "date": "2025-01-01",
            "type": "wire"
        }"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, TransactionType::Other);
        assert_eq!(t.user_id, "acct-9");
        assert!(t.description.is_empty());
    }
}
