use rust_decimal::Decimal;

use crate::ledger::{Period, Statement, TenantId};

/// What one tenant settled during a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantCollection {
    pub tenant_id: TenantId,
    pub received: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodCollections {
    pub period: Period,
    pub tenants: Vec<TenantCollection>,
    pub total: Decimal,
}

/// Bill-only sums across a whole statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BillTotals {
    pub billed: Decimal,
    pub paid: Decimal,
    pub balance: Decimal,
}

pub struct CollectionService;

impl CollectionService {
    /// Amounts received per tenant for `period`, rent and bills combined.
    ///
    /// Tenants without charges in the period are listed with zero.
    pub fn received_for_period(
        statements: &[(TenantId, Statement)],
        period: Period,
    ) -> PeriodCollections {
        let tenants: Vec<TenantCollection> = statements
            .iter()
            .map(|(tenant_id, statement)| TenantCollection {
                tenant_id: tenant_id.clone(),
                received: statement
                    .line_for(period)
                    .map(|line| line.period_settled)
                    .unwrap_or(Decimal::ZERO),
            })
            .collect();
        let total = tenants
            .iter()
            .map(|tenant| tenant.received)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        PeriodCollections {
            period,
            tenants,
            total,
        }
    }

    pub fn bill_totals(statement: &Statement) -> BillTotals {
        let totals = statement.totals();
        BillTotals {
            billed: totals.bills_due,
            paid: totals.bills_settled,
            balance: totals.bills_due.saturating_sub(totals.bills_settled),
        }
    }
}
