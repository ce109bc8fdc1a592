use rust_decimal::Decimal;

use crate::ledger::{Charge, Statement, TenantId};
use crate::storage::ChargeStore;

use super::{outstanding_balance, ServiceResult};

/// The two balances the ledger reports for a tenant.
///
/// `outstanding_balance` follows the status labels; `statement_balance` follows the
/// amounts and carries overpayments as credit. Neither is treated as authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceComparison {
    pub outstanding_balance: Decimal,
    pub statement_balance: Decimal,
}

impl BalanceComparison {
    pub fn diverges(&self) -> bool {
        self.outstanding_balance != self.statement_balance
    }

    /// `statement_balance - outstanding_balance`.
    pub fn difference(&self) -> Decimal {
        self.statement_balance
            .saturating_sub(self.outstanding_balance)
    }
}

pub struct StatementService;

impl StatementService {
    pub fn statement_for<S>(store: &S, tenant_id: &TenantId) -> ServiceResult<Statement>
    where
        S: ChargeStore + ?Sized,
    {
        let charges = store.list_charges(tenant_id)?;
        Ok(Statement::from_charges(&charges))
    }

    /// Computes both balances over the same charge snapshot.
    pub fn compare(charges: &[Charge]) -> BalanceComparison {
        let comparison = BalanceComparison {
            outstanding_balance: outstanding_balance(charges),
            statement_balance: Statement::from_charges(charges).closing_balance(),
        };
        if comparison.diverges() {
            tracing::debug!(
                outstanding_balance = %comparison.outstanding_balance,
                statement_balance = %comparison.statement_balance,
                difference = %comparison.difference(),
                "balances diverge"
            );
        }
        comparison
    }

    pub fn compare_for<S>(store: &S, tenant_id: &TenantId) -> ServiceResult<BalanceComparison>
    where
        S: ChargeStore + ?Sized,
    {
        let charges = store.list_charges(tenant_id)?;
        Ok(Self::compare(&charges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{ChargeStatus, Period};
    use rust_decimal_macros::dec;

    #[test]
    fn short_paid_charge_marked_paid_diverges() {
        let tenant = TenantId::from("t-1");
        let january = Period::new(2024, "January").unwrap();
        let charges = vec![Charge::rent(tenant, january, dec!(10000))
            .with_settled(dec!(6000))
            .with_status(ChargeStatus::Paid)];
        let comparison = StatementService::compare(&charges);
        assert_eq!(comparison.outstanding_balance, Decimal::ZERO);
        assert_eq!(comparison.statement_balance, dec!(4000));
        assert!(comparison.diverges());
        assert_eq!(comparison.difference(), dec!(4000));
    }

    #[test]
    fn consistent_labels_agree() {
        let tenant = TenantId::from("t-1");
        let january = Period::new(2024, "January").unwrap();
        let charges = vec![Charge::rent(tenant, january, dec!(800)).with_settled(dec!(300))];
        assert!(!StatementService::compare(&charges).diverges());
    }
}
