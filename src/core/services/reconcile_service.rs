//! Keeps each tenant's cached outstanding balance in line with its charges.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::ledger::{Charge, TenantId};
use crate::storage::{ChargeStore, TenantStore};

/// Amount still owed on charges whose status says they are unsettled.
///
/// Paid charges contribute nothing even when short-paid, and overpayments never offset
/// other charges. This is deliberately not the statement's closing balance.
pub fn outstanding_balance(charges: &[Charge]) -> Decimal {
    charges
        .iter()
        .filter(|charge| charge.status.counts_toward_outstanding())
        .map(Charge::remaining)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// A charge write that invalidates cached balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeMutation {
    Created {
        tenant_id: TenantId,
        charge_id: Uuid,
    },
    Updated {
        tenant_id: TenantId,
        /// Set when the update moved the charge away from another tenant.
        previous_tenant_id: Option<TenantId>,
        charge_id: Uuid,
    },
    Deleted {
        tenant_id: TenantId,
        charge_id: Uuid,
    },
}

impl ChargeMutation {
    pub fn created(charge: &Charge) -> Self {
        Self::Created {
            tenant_id: charge.tenant_id.clone(),
            charge_id: charge.id,
        }
    }

    pub fn updated(previous: &Charge, current: &Charge) -> Self {
        Self::Updated {
            tenant_id: current.tenant_id.clone(),
            previous_tenant_id: (previous.tenant_id != current.tenant_id)
                .then(|| previous.tenant_id.clone()),
            charge_id: current.id,
        }
    }

    pub fn deleted(charge: &Charge) -> Self {
        Self::Deleted {
            tenant_id: charge.tenant_id.clone(),
            charge_id: charge.id,
        }
    }

    pub fn charge_id(&self) -> Uuid {
        match self {
            Self::Created { charge_id, .. }
            | Self::Updated { charge_id, .. }
            | Self::Deleted { charge_id, .. } => *charge_id,
        }
    }

    /// Tenants whose balance must be recomputed, current owner first.
    pub fn affected_tenants(&self) -> Vec<&TenantId> {
        match self {
            Self::Created { tenant_id, .. } | Self::Deleted { tenant_id, .. } => vec![tenant_id],
            Self::Updated {
                tenant_id,
                previous_tenant_id,
                ..
            } => std::iter::once(tenant_id)
                .chain(previous_tenant_id.as_ref())
                .collect(),
        }
    }
}

/// Result of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub tenant_id: TenantId,
    pub outstanding_balance: Decimal,
    /// False when the balance could not be written back; the cache stays stale.
    pub persisted: bool,
}

/// Per-tenant results of [`ReconcileService::reconcile_all`].
#[derive(Debug, Default)]
pub struct BatchReconciliation {
    pub outcomes: Vec<ReconcileOutcome>,
    pub failures: Vec<(TenantId, ServiceError)>,
}

impl BatchReconciliation {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.outcomes.iter().all(|outcome| outcome.persisted)
    }
}

pub struct ReconcileService;

impl ReconcileService {
    /// Recomputes the tenant's outstanding balance from the store and writes it back.
    ///
    /// A failed read aborts without touching the cache. A failed write is logged and
    /// reported through [`ReconcileOutcome::persisted`]; it is not retried.
    pub fn reconcile<S>(store: &S, tenant_id: &TenantId) -> ServiceResult<ReconcileOutcome>
    where
        S: ChargeStore + ?Sized,
    {
        let charges = store.list_charges(tenant_id)?;
        let balance = outstanding_balance(&charges);
        let persisted = match store.write_outstanding_balance(tenant_id, balance) {
            Ok(()) => {
                tracing::info!(
                    tenant = %tenant_id,
                    charges = charges.len(),
                    outstanding_balance = %balance,
                    "outstanding balance reconciled"
                );
                true
            }
            Err(err) => {
                tracing::warn!(
                    tenant = %tenant_id,
                    outstanding_balance = %balance,
                    error = %err,
                    "failed to persist outstanding balance"
                );
                false
            }
        };
        Ok(ReconcileOutcome {
            tenant_id: tenant_id.clone(),
            outstanding_balance: balance,
            persisted,
        })
    }

    /// Reconciles every tenant a charge mutation touched.
    pub fn on_mutation<S>(
        store: &S,
        mutation: &ChargeMutation,
    ) -> ServiceResult<Vec<ReconcileOutcome>>
    where
        S: ChargeStore + ?Sized,
    {
        tracing::debug!(charge = %mutation.charge_id(), ?mutation, "charge mutated");
        mutation
            .affected_tenants()
            .into_iter()
            .map(|tenant_id| Self::reconcile(store, tenant_id))
            .collect()
    }

    /// Reconciles every tenant the store knows about, continuing past failures.
    pub fn reconcile_all<S>(store: &S) -> ServiceResult<BatchReconciliation>
    where
        S: ChargeStore + TenantStore + ?Sized,
    {
        let tenants = store.list_tenants()?;
        let mut batch = BatchReconciliation::default();
        for tenant in tenants {
            match Self::reconcile(store, &tenant.id) {
                Ok(outcome) => batch.outcomes.push(outcome),
                Err(err) => {
                    tracing::warn!(tenant = %tenant.id, error = %err, "reconciliation failed");
                    batch.failures.push((tenant.id, err));
                }
            }
        }
        tracing::info!(
            reconciled = batch.outcomes.len(),
            failed = batch.failures.len(),
            "balances recalculated"
        );
        Ok(batch)
    }
}
