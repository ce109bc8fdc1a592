//! Chronological per-period statements with carried-forward balances.
//!
//! Every view that needs period sums (tenant history, quotations, collection totals)
//! reads them from a [`Statement`] rather than re-summing charges itself.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::{
    charge::{Charge, ChargeKind, ChargeStatus},
    period::Period,
};

/// One charge as it appears inside a statement line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub charge_id: Uuid,
    pub kind: ChargeKind,
    pub amount_due: Decimal,
    pub amount_settled: Decimal,
    pub status: ChargeStatus,
}

impl From<&Charge> for LineItem {
    fn from(charge: &Charge) -> Self {
        Self {
            charge_id: charge.id,
            kind: charge.kind.clone(),
            amount_due: charge.amount_due,
            amount_settled: charge.amount_settled,
            status: charge.status,
        }
    }
}

/// Derived breakdown for a single period that has at least one charge.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementLine {
    pub period: Period,
    pub period_due: Decimal,
    pub period_settled: Decimal,
    pub previous_balance: Decimal,
    /// `period_due - period_settled`; negative values are tenant credit.
    pub period_balance: Decimal,
    pub cumulative_balance: Decimal,
    pub rent_due: Decimal,
    pub rent_settled: Decimal,
    pub bills_due: Decimal,
    pub bills_settled: Decimal,
    /// Rent first, then bills ordered by category.
    pub items: Vec<LineItem>,
}

/// Sums across every line of a statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementTotals {
    pub rent_due: Decimal,
    pub rent_settled: Decimal,
    pub bills_due: Decimal,
    pub bills_settled: Decimal,
}

impl StatementTotals {
    pub fn due(&self) -> Decimal {
        self.rent_due.saturating_add(self.bills_due)
    }

    pub fn settled(&self) -> Decimal {
        self.rent_settled.saturating_add(self.bills_settled)
    }
}

#[derive(Default)]
struct PeriodGroup {
    rent_due: Decimal,
    rent_settled: Decimal,
    bills_due: Decimal,
    bills_settled: Decimal,
    items: Vec<LineItem>,
}

/// Ascending sequence of statement lines for one tenant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    lines: Vec<StatementLine>,
}

impl Statement {
    /// Builds the statement for an unordered set of one tenant's charges.
    ///
    /// Sums saturate at the `Decimal` bounds instead of overflowing.
    ///
    /// The balance is carried forward in strictly increasing period order, so the result
    /// only depends on the charges themselves and never on their input order. Periods
    /// without charges produce no line and do not reset the running balance.
    pub fn from_charges(charges: &[Charge]) -> Self {
        let mut groups: BTreeMap<Period, PeriodGroup> = BTreeMap::new();
        for charge in charges {
            let group = groups.entry(charge.period).or_default();
            if charge.is_rent() {
                group.rent_due = group.rent_due.saturating_add(charge.amount_due);
                group.rent_settled = group.rent_settled.saturating_add(charge.amount_settled);
            } else {
                group.bills_due = group.bills_due.saturating_add(charge.amount_due);
                group.bills_settled = group.bills_settled.saturating_add(charge.amount_settled);
            }
            group.items.push(LineItem::from(charge));
        }

        let mut running = Decimal::ZERO;
        let mut lines = Vec::with_capacity(groups.len());
        for (period, mut group) in groups {
            group.items.sort_by(|a, b| {
                a.kind
                    .sort_key()
                    .cmp(&b.kind.sort_key())
                    .then_with(|| a.charge_id.cmp(&b.charge_id))
            });
            let period_due = group.rent_due.saturating_add(group.bills_due);
            let period_settled = group.rent_settled.saturating_add(group.bills_settled);
            let previous_balance = running;
            let period_balance = period_due.saturating_sub(period_settled);
            let cumulative_balance = previous_balance.saturating_add(period_balance);
            running = cumulative_balance;
            lines.push(StatementLine {
                period,
                period_due,
                period_settled,
                previous_balance,
                period_balance,
                cumulative_balance,
                rent_due: group.rent_due,
                rent_settled: group.rent_settled,
                bills_due: group.bills_due,
                bills_settled: group.bills_settled,
                items: group.items,
            });
        }

        tracing::debug!(
            charges = charges.len(),
            periods = lines.len(),
            closing_balance = %running,
            "statement computed"
        );
        Self { lines }
    }

    /// Lines oldest first.
    pub fn lines(&self) -> &[StatementLine] {
        &self.lines
    }

    /// Lines newest first, for display.
    pub fn newest_first(&self) -> impl Iterator<Item = &StatementLine> + '_ {
        self.lines.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn latest(&self) -> Option<&StatementLine> {
        self.lines.last()
    }

    pub fn line_for(&self, period: Period) -> Option<&StatementLine> {
        self.lines
            .binary_search_by(|line| line.period.cmp(&period))
            .ok()
            .map(|index| &self.lines[index])
    }

    /// Cumulative balance of the last line strictly before `period`, or zero.
    pub fn balance_before(&self, period: Period) -> Decimal {
        let index = self.lines.partition_point(|line| line.period < period);
        index
            .checked_sub(1)
            .map(|last| self.lines[last].cumulative_balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// Final carried balance; zero for a tenant without charges.
    pub fn closing_balance(&self) -> Decimal {
        self.latest()
            .map(|line| line.cumulative_balance)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn totals(&self) -> StatementTotals {
        self.lines
            .iter()
            .fold(StatementTotals::default(), |totals, line| StatementTotals {
                rent_due: totals.rent_due.saturating_add(line.rent_due),
                rent_settled: totals.rent_settled.saturating_add(line.rent_settled),
                bills_due: totals.bills_due.saturating_add(line.bills_due),
                bills_settled: totals.bills_settled.saturating_add(line.bills_settled),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{BillCategory, TenantId};
    use rust_decimal_macros::dec;

    fn period(year: i32, month: &str) -> Period {
        Period::new(year, month).unwrap()
    }

    #[test]
    fn empty_charge_set_yields_empty_statement() {
        let statement = Statement::from_charges(&[]);
        assert!(statement.is_empty());
        assert_eq!(statement.closing_balance(), Decimal::ZERO);
        assert_eq!(statement.balance_before(period(2024, "May")), Decimal::ZERO);
    }

    #[test]
    fn rent_and_bills_share_one_period_ledger() {
        let tenant = TenantId::from("t-1");
        let march = period(2024, "March");
        let charges = vec![
            Charge::bill(tenant.clone(), march, BillCategory::Electric, dec!(2500))
                .with_settled(dec!(500)),
            Charge::rent(tenant.clone(), march, dec!(10000)).with_settled(dec!(10000)),
            Charge::bill(tenant, march, BillCategory::Gas, dec!(800)),
        ];
        let statement = Statement::from_charges(&charges);
        let line = statement.line_for(march).expect("march line");
        assert_eq!(line.period_due, dec!(13300));
        assert_eq!(line.period_settled, dec!(10500));
        assert_eq!(line.period_balance, dec!(2800));
        assert_eq!(line.rent_due, dec!(10000));
        assert_eq!(line.bills_due, dec!(3300));
        assert!(matches!(line.items[0].kind, ChargeKind::Rent));
        assert_eq!(line.items.len(), 3);
    }

    #[test]
    fn overpayment_produces_negative_balance_carried_forward() {
        let tenant = TenantId::from("t-1");
        let charges = vec![
            Charge::rent(tenant.clone(), period(2024, "January"), dec!(1000))
                .with_settled(dec!(1500)),
            Charge::rent(tenant, period(2024, "February"), dec!(1000)),
        ];
        let statement = Statement::from_charges(&charges);
        let lines = statement.lines();
        assert_eq!(lines[0].cumulative_balance, dec!(-500));
        assert_eq!(lines[1].previous_balance, dec!(-500));
        assert_eq!(lines[1].cumulative_balance, dec!(500));
    }

    #[test]
    fn balance_before_uses_last_earlier_line() {
        let tenant = TenantId::from("t-1");
        let charges = vec![
            Charge::rent(tenant.clone(), period(2023, "November"), dec!(700)),
            Charge::rent(tenant, period(2024, "February"), dec!(300)),
        ];
        let statement = Statement::from_charges(&charges);
        assert_eq!(statement.balance_before(period(2023, "November")), Decimal::ZERO);
        assert_eq!(statement.balance_before(period(2024, "January")), dec!(700));
        assert_eq!(statement.balance_before(period(2024, "February")), dec!(700));
        assert_eq!(statement.balance_before(period(2024, "March")), dec!(1000));
    }

    #[test]
    fn newest_first_reverses_after_computation() {
        let tenant = TenantId::from("t-1");
        let charges = vec![
            Charge::rent(tenant.clone(), period(2024, "January"), dec!(100)),
            Charge::rent(tenant, period(2024, "February"), dec!(100)),
        ];
        let statement = Statement::from_charges(&charges);
        let newest: Vec<_> = statement.newest_first().map(|line| line.period).collect();
        assert_eq!(newest, vec![period(2024, "February"), period(2024, "January")]);
        assert_eq!(statement.latest().unwrap().cumulative_balance, dec!(200));
    }
}
