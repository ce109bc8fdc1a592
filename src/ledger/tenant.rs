use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::charge::amount;
use crate::errors::LedgerError;

/// Opaque identifier assigned to a tenant by the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TenantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Tenant record as seen by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    /// Pre-fills new rent charges. Never used in balance math.
    #[serde(
        default,
        deserialize_with = "amount::lenient",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub monthly_rent_baseline: Decimal,
    /// Cached result of the last reconciliation. Recomputable from the tenant's charges.
    #[serde(
        default,
        deserialize_with = "amount::lenient",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub outstanding_balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenancy: Option<TenancyWindow>,
}

impl Tenant {
    pub fn new(id: impl Into<TenantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            property: None,
            monthly_rent_baseline: Decimal::ZERO,
            outstanding_balance: Decimal::ZERO,
            tenancy: None,
        }
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn with_monthly_rent(mut self, amount: Decimal) -> Self {
        self.monthly_rent_baseline = amount;
        self
    }

    pub fn with_tenancy(mut self, window: TenancyWindow) -> Self {
        self.tenancy = Some(window);
        self
    }
}

/// Inclusive start/end dates of a tenancy, used to plan monthly rent charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenancyWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TenancyWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if end < start {
            return Err(LedgerError::InvalidPeriod(format!(
                "tenancy ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
