pub mod charge_service;
pub mod collection_service;
pub mod reconcile_service;
pub mod statement_service;

pub use charge_service::{ChargeService, ChargeWrite, GeneratedRents};
pub use collection_service::{BillTotals, CollectionService, PeriodCollections, TenantCollection};
pub use reconcile_service::{
    outstanding_balance, BatchReconciliation, ChargeMutation, ReconcileOutcome, ReconcileService,
};
pub use statement_service::{BalanceComparison, StatementService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}
