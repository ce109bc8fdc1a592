//! Rent and bill charges recorded against a tenant for one billing period.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{period::Period, tenant::TenantId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub kind: ChargeKind,
    pub period: Period,
    #[serde(
        default,
        deserialize_with = "amount::lenient",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount_due: Decimal,
    /// Cumulative amount received (rent) or paid (bills) against `amount_due`.
    #[serde(
        default,
        deserialize_with = "amount::lenient",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount_settled: Decimal,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: ChargeStatus,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub settled_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Charge {
    pub fn new(tenant_id: TenantId, kind: ChargeKind, period: Period, amount_due: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            kind,
            period,
            amount_due,
            amount_settled: Decimal::ZERO,
            status: ChargeStatus::Pending,
            settled_date: None,
            notes: None,
        }
    }

    pub fn rent(tenant_id: TenantId, period: Period, amount_due: Decimal) -> Self {
        Self::new(tenant_id, ChargeKind::Rent, period, amount_due)
    }

    pub fn bill(
        tenant_id: TenantId,
        period: Period,
        category: BillCategory,
        amount_due: Decimal,
    ) -> Self {
        Self::new(tenant_id, ChargeKind::Bill(category), period, amount_due)
    }

    pub fn with_settled(mut self, amount_settled: Decimal) -> Self {
        self.amount_settled = amount_settled;
        self
    }

    pub fn with_status(mut self, status: ChargeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Signed difference between what was billed and what was settled.
    pub fn balance(&self) -> Decimal {
        self.amount_due.saturating_sub(self.amount_settled)
    }

    /// Unsettled part of the charge, floored at zero.
    pub fn remaining(&self) -> Decimal {
        self.balance().max(Decimal::ZERO)
    }

    pub fn is_rent(&self) -> bool {
        matches!(self.kind, ChargeKind::Rent)
    }

    pub fn bill_category(&self) -> Option<&BillCategory> {
        match &self.kind {
            ChargeKind::Rent => None,
            ChargeKind::Bill(category) => Some(category),
        }
    }

    /// Adds a partial or full settlement. The completion date is stamped once the
    /// cumulative settlement covers the amount due; the status label is left alone.
    pub fn record_settlement(&mut self, amount: Decimal, on: NaiveDate) {
        self.amount_settled = self.amount_settled.saturating_add(amount);
        if self.amount_settled >= self.amount_due {
            self.settled_date = Some(on);
        }
    }

    /// Marks the charge paid in full, keeping an existing completion date.
    pub fn mark_paid(&mut self, on: NaiveDate) {
        self.status = ChargeStatus::Paid;
        self.amount_settled = self.amount_due;
        self.settled_date.get_or_insert(on);
    }
}

/// Distinguishes rent from categorised utility bills.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "category", rename_all = "lowercase")]
pub enum ChargeKind {
    Rent,
    Bill(BillCategory),
}

impl ChargeKind {
    pub fn label(&self) -> &str {
        match self {
            ChargeKind::Rent => "Rent",
            ChargeKind::Bill(category) => category.label(),
        }
    }

    /// Rent sorts ahead of bills; bills sort by category code.
    pub fn sort_key(&self) -> (u8, &str) {
        match self {
            ChargeKind::Rent => (0, ""),
            ChargeKind::Bill(category) => (1, category.code()),
        }
    }
}

impl fmt::Display for ChargeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Utility bill categories. Unknown tags are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillCategory {
    Electric,
    Gas,
    Motor,
    Maintenance,
    Other(String),
}

impl BillCategory {
    pub fn code(&self) -> &str {
        match self {
            BillCategory::Electric => "electric",
            BillCategory::Gas => "ssgc",
            BillCategory::Motor => "motor",
            BillCategory::Maintenance => "maintenance",
            BillCategory::Other(code) => code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BillCategory::Electric => "Electric Bill",
            BillCategory::Gas => "SSGC Bill",
            BillCategory::Motor => "Motor Bill",
            BillCategory::Maintenance => "Maintenance",
            BillCategory::Other(code) if code.trim().is_empty() => "Bill",
            BillCategory::Other(code) => code,
        }
    }
}

impl From<String> for BillCategory {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "electric" | "electricity" => BillCategory::Electric,
            "ssgc" | "gas" => BillCategory::Gas,
            "motor" | "vehicle" => BillCategory::Motor,
            "maintenance" => BillCategory::Maintenance,
            _ => BillCategory::Other(value),
        }
    }
}

impl From<BillCategory> for String {
    fn from(value: BillCategory) -> Self {
        value.code().to_string()
    }
}

/// Operator-set label. Never derived from the amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl ChargeStatus {
    pub fn parse_lenient(value: &str) -> ChargeStatus {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => ChargeStatus::Paid,
            "overdue" => ChargeStatus::Overdue,
            _ => ChargeStatus::Pending,
        }
    }

    /// Whether a charge with this status contributes to the outstanding balance.
    pub fn counts_toward_outstanding(self) -> bool {
        matches!(self, ChargeStatus::Pending | ChargeStatus::Overdue)
    }
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChargeStatus::Pending => "Pending",
            ChargeStatus::Paid => "Paid",
            ChargeStatus::Overdue => "Overdue",
        };
        f.write_str(label)
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<ChargeStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(text)) => ChargeStatus::parse_lenient(&text),
        _ => ChargeStatus::Pending,
    })
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(text) = raw.map(|value| value.trim().to_string()) else {
        return Ok(None);
    };
    if text.is_empty() {
        return Ok(None);
    }
    match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(_) => {
            tracing::warn!(value = %text, "ignoring unparseable settled date");
            Ok(None)
        }
    }
}

/// Forgiving money decoding: malformed amounts become zero instead of failing the read.
pub(crate) mod amount {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().map(coerce).unwrap_or(Decimal::ZERO))
    }

    pub(crate) fn coerce(value: &Value) -> Decimal {
        let parsed = match value {
            Value::Number(number) => parse(&number.to_string()),
            Value::String(text) => parse(text.trim()),
            Value::Null => return Decimal::ZERO,
            _ => None,
        };
        match parsed {
            Some(amount) if amount >= Decimal::ZERO => amount,
            _ => {
                tracing::warn!(%value, "coercing malformed amount to zero");
                Decimal::ZERO
            }
        }
    }

    fn parse(text: &str) -> Option<Decimal> {
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn january() -> Period {
        Period::new(2024, "January").unwrap()
    }

    #[test]
    fn remaining_is_floored_but_balance_is_signed() {
        let over = Charge::rent(TenantId::from("t-1"), january(), dec!(100)).with_settled(dec!(150));
        assert_eq!(over.balance(), dec!(-50));
        assert_eq!(over.remaining(), Decimal::ZERO);
    }

    #[test]
    fn settlement_stamps_date_only_when_covered() {
        let on = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let mut charge = Charge::rent(TenantId::from("t-1"), january(), dec!(10000));
        charge.record_settlement(dec!(4000), on);
        assert_eq!(charge.amount_settled, dec!(4000));
        assert_eq!(charge.settled_date, None);
        charge.record_settlement(dec!(6000), on);
        assert_eq!(charge.settled_date, Some(on));
        assert_eq!(charge.status, ChargeStatus::Pending);
    }

    #[test]
    fn mark_paid_settles_in_full_and_keeps_existing_date() {
        let first = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mut charge = Charge::bill(
            TenantId::from("t-1"),
            january(),
            BillCategory::Electric,
            dec!(2500),
        );
        charge.settled_date = Some(first);
        charge.mark_paid(later);
        assert_eq!(charge.status, ChargeStatus::Paid);
        assert_eq!(charge.amount_settled, dec!(2500));
        assert_eq!(charge.settled_date, Some(first));
    }

    #[test]
    fn malformed_amounts_coerce_to_zero() {
        let json = r#"{
            "id": "0b6f1c52-3a38-4b55-9a55-0f5cf1d0a001",
            "tenant_id": "t-9",
            "kind": {"type": "bill", "category": "ssgc"},
            "period": {"year": "2024", "month": "March"},
            "amount_due": "1500.50",
            "amount_settled": "n/a",
            "status": "mystery",
            "settled_date": ""
        }"#;
        let charge: Charge = serde_json::from_str(json).expect("lenient decode");
        assert_eq!(charge.amount_due, dec!(1500.50));
        assert_eq!(charge.amount_settled, Decimal::ZERO);
        assert_eq!(charge.status, ChargeStatus::Pending);
        assert_eq!(charge.settled_date, None);
        assert_eq!(charge.bill_category(), Some(&BillCategory::Gas));
    }

    #[test]
    fn missing_and_negative_amounts_are_zero() {
        let json = r#"{
            "id": "0b6f1c52-3a38-4b55-9a55-0f5cf1d0a002",
            "tenant_id": "t-9",
            "kind": {"type": "rent"},
            "period": {"year": 2024, "month": "April"},
            "amount_due": -20
        }"#;
        let charge: Charge = serde_json::from_str(json).expect("lenient decode");
        assert_eq!(charge.amount_due, Decimal::ZERO);
        assert_eq!(charge.amount_settled, Decimal::ZERO);
        assert!(charge.is_rent());
    }

    #[test]
    fn unknown_bill_category_is_preserved() {
        let category = BillCategory::from("water".to_string());
        assert_eq!(category, BillCategory::Other("water".into()));
        assert_eq!(category.label(), "water");
        assert_eq!(BillCategory::Other(String::new()).label(), "Bill");
        assert_eq!(String::from(BillCategory::Gas), "ssgc");
    }

    #[test]
    fn only_pending_and_overdue_count_toward_outstanding() {
        assert!(ChargeStatus::Pending.counts_toward_outstanding());
        assert!(ChargeStatus::Overdue.counts_toward_outstanding());
        assert!(!ChargeStatus::Paid.counts_toward_outstanding());
    }
}
