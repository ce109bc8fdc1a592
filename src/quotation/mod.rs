//! Per-period quotation messages built from statement lines.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{DEFAULT_CURRENCY_PREFIX, DEFAULT_GROUPING_SEPARATOR};
use crate::ledger::{ChargeKind, Period, Statement, Tenant};

const RENT_ITEM_LABEL: &str = "Monthly Rent";
const AMOUNT_PRECISION: u32 = 2;

/// How amounts are written in quotation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountFormat {
    pub prefix: String,
    pub grouping_separator: char,
}

impl AmountFormat {
    pub fn new(prefix: impl Into<String>, grouping_separator: char) -> Self {
        Self {
            prefix: prefix.into(),
            grouping_separator,
        }
    }

    /// `Rs. 12,500`, `Rs. -300`, `Rs. 1,250.5`.
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount
            .round_dp_with_strategy(AMOUNT_PRECISION, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let body = rounded.abs().to_string();
        let (int_part, fraction) = match body.split_once('.') {
            Some((int_part, fraction)) => (int_part, Some(fraction)),
            None => (body.as_str(), None),
        };
        let mut grouped = group_digits(int_part, self.grouping_separator);
        if let Some(fraction) = fraction {
            grouped.push('.');
            grouped.push_str(fraction);
        }
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{} {}{}", self.prefix, sign, grouped)
    }
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_PREFIX, DEFAULT_GROUPING_SEPARATOR)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}

/// Recipient details printed at the top of a quotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantProfile {
    pub name: String,
    pub property: String,
}

impl TenantProfile {
    pub fn from_tenant(tenant: &Tenant, fallback_property: &str) -> Self {
        let property = tenant
            .property
            .as_deref()
            .map(str::trim)
            .filter(|property| !property.is_empty())
            .unwrap_or(fallback_property);
        Self {
            name: tenant.name.clone(),
            property: property.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuotationItem {
    pub label: String,
    pub is_rent: bool,
    pub amount_due: Decimal,
}

/// Breakdown of one period for one tenant, ready to be rendered as a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Quotation {
    pub tenant: TenantProfile,
    pub period: Period,
    pub previous_balance: Decimal,
    /// Rent first, then bills by category.
    pub items: Vec<QuotationItem>,
    pub total_rent: Decimal,
    pub total_bills: Decimal,
    pub total_received: Decimal,
    pub month_balance: Decimal,
    pub grand_total_due: Decimal,
}

impl Quotation {
    /// Reads every figure from the statement; a period without charges still quotes
    /// the balance carried into it.
    pub fn for_period(tenant: TenantProfile, statement: &Statement, period: Period) -> Self {
        let Some(line) = statement.line_for(period) else {
            let carried = statement.balance_before(period);
            return Self {
                tenant,
                period,
                previous_balance: carried,
                items: Vec::new(),
                total_rent: Decimal::ZERO,
                total_bills: Decimal::ZERO,
                total_received: Decimal::ZERO,
                month_balance: Decimal::ZERO,
                grand_total_due: carried,
            };
        };
        let items = line
            .items
            .iter()
            .map(|item| QuotationItem {
                label: match &item.kind {
                    ChargeKind::Rent => RENT_ITEM_LABEL.to_string(),
                    kind => kind.label().to_string(),
                },
                is_rent: matches!(item.kind, ChargeKind::Rent),
                amount_due: item.amount_due,
            })
            .collect();
        Self {
            tenant,
            period,
            previous_balance: line.previous_balance,
            items,
            total_rent: line.rent_due,
            total_bills: line.bills_due,
            total_received: line.period_settled,
            month_balance: line.period_balance,
            grand_total_due: line.cumulative_balance,
        }
    }

    pub fn render(&self, format: &AmountFormat) -> String {
        let item_lines = |rent: bool, empty: &str| -> String {
            let rendered: Vec<String> = self
                .items
                .iter()
                .filter(|item| item.is_rent == rent)
                .map(|item| format!("• {}: {}", item.label, format.format(item.amount_due)))
                .collect();
            if rendered.is_empty() {
                format!("• {empty}")
            } else {
                rendered.join("\n")
            }
        };

        let lines = [
            format!("*Monthly Quotation - {}*", self.period),
            String::new(),
            "*Tenant Details:*".to_string(),
            format!("• Name: {}", self.tenant.name),
            format!("• Property: {}", self.tenant.property),
            String::new(),
            "*Payment Summary:*".to_string(),
            String::new(),
            format!(
                "*Previous Balance: {}*",
                format.format(self.previous_balance)
            ),
            format!("*Current Month ({}):*", self.period),
            item_lines(true, "No rent entries for this month"),
            String::new(),
            item_lines(false, "No bills for this month"),
            String::new(),
            "*Current Month Totals:*".to_string(),
            format!("• Total Rent: {}", format.format(self.total_rent)),
            format!("• Total Bills: {}", format.format(self.total_bills)),
            format!(
                "• Total Received/Paid: {}",
                format.format(self.total_received)
            ),
            format!("• Month Balance: {}", format.format(self.month_balance)),
            String::new(),
            format!(
                "*GRAND TOTAL DUE: {}*",
                format.format(self.grand_total_due)
            ),
            "Thank you for your timely payments!".to_string(),
        ];
        lines.join("\n")
    }
}
