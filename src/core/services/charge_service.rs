//! Business logic helpers for recording charges and settlements.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::ledger::{Charge, RentSchedule, Tenant, TenantId};
use crate::storage::ChargeRepository;

use super::reconcile_service::{ChargeMutation, ReconcileOutcome, ReconcileService};

/// A stored charge together with the reconciliations its write triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeWrite {
    pub charge: Charge,
    pub outcomes: Vec<ReconcileOutcome>,
}

/// Rent charges created for a tenancy window.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRents {
    pub charges: Vec<Charge>,
    pub outcome: ReconcileOutcome,
}

/// Writes charges and reconciles the affected tenants before reporting success.
pub struct ChargeService;

impl ChargeService {
    pub fn create<S>(store: &S, charge: Charge) -> ServiceResult<ChargeWrite>
    where
        S: ChargeRepository + ?Sized,
    {
        validate_amounts(&charge)?;
        store.save_charge(&charge)?;
        let outcomes = ReconcileService::on_mutation(store, &ChargeMutation::created(&charge))?;
        Ok(ChargeWrite { charge, outcomes })
    }

    /// Replaces a stored charge of the same tenant.
    pub fn update<S>(store: &S, charge: Charge) -> ServiceResult<ChargeWrite>
    where
        S: ChargeRepository + ?Sized,
    {
        validate_amounts(&charge)?;
        let previous = find(store, &charge.tenant_id, charge.id)?;
        store.save_charge(&charge)?;
        let outcomes =
            ReconcileService::on_mutation(store, &ChargeMutation::updated(&previous, &charge))?;
        Ok(ChargeWrite { charge, outcomes })
    }

    /// Moves a charge to another tenant and reconciles both of them.
    pub fn reassign<S>(
        store: &S,
        from: &TenantId,
        charge_id: Uuid,
        to: TenantId,
    ) -> ServiceResult<ChargeWrite>
    where
        S: ChargeRepository + ?Sized,
    {
        if &to == from {
            return Err(ServiceError::Invalid(
                "Charge already belongs to this tenant".into(),
            ));
        }
        let previous = find(store, from, charge_id)?;
        let mut charge = previous.clone();
        charge.tenant_id = to;
        store.save_charge(&charge)?;
        store.delete_charge(from, charge_id)?;
        let outcomes =
            ReconcileService::on_mutation(store, &ChargeMutation::updated(&previous, &charge))?;
        Ok(ChargeWrite { charge, outcomes })
    }

    /// Removes the charge and returns it as it was stored.
    pub fn delete<S>(store: &S, tenant_id: &TenantId, charge_id: Uuid) -> ServiceResult<ChargeWrite>
    where
        S: ChargeRepository + ?Sized,
    {
        let charge = store
            .delete_charge(tenant_id, charge_id)?
            .ok_or_else(|| ServiceError::Invalid("Charge not found".into()))?;
        let outcomes = ReconcileService::on_mutation(store, &ChargeMutation::deleted(&charge))?;
        Ok(ChargeWrite { charge, outcomes })
    }

    /// Adds a received or paid amount to the charge.
    pub fn record_settlement<S>(
        store: &S,
        tenant_id: &TenantId,
        charge_id: Uuid,
        amount: Decimal,
        on: NaiveDate,
    ) -> ServiceResult<ChargeWrite>
    where
        S: ChargeRepository + ?Sized,
    {
        if amount < Decimal::ZERO {
            return Err(ServiceError::Invalid(
                "Settlement amount must not be negative".into(),
            ));
        }
        Self::modify(store, tenant_id, charge_id, |charge| {
            charge.record_settlement(amount, on)
        })
    }

    pub fn mark_paid<S>(
        store: &S,
        tenant_id: &TenantId,
        charge_id: Uuid,
        on: NaiveDate,
    ) -> ServiceResult<ChargeWrite>
    where
        S: ChargeRepository + ?Sized,
    {
        Self::modify(store, tenant_id, charge_id, |charge| charge.mark_paid(on))
    }

    /// Stores a pending rent charge for every month of the tenancy that lacks one.
    pub fn generate_tenancy_rents<S>(store: &S, tenant: &Tenant) -> ServiceResult<GeneratedRents>
    where
        S: ChargeRepository + ?Sized,
    {
        let window = tenant
            .tenancy
            .as_ref()
            .ok_or_else(|| ServiceError::Invalid("Tenant has no tenancy window".into()))?;
        let existing = store.list_charges(&tenant.id)?;
        let charges = RentSchedule::plan(tenant, window, &existing);
        for charge in &charges {
            store.save_charge(charge)?;
        }
        tracing::info!(
            tenant = %tenant.id,
            generated = charges.len(),
            "rent charges generated"
        );
        let outcome = ReconcileService::reconcile(store, &tenant.id)?;
        Ok(GeneratedRents { charges, outcome })
    }

    fn modify<S, F>(
        store: &S,
        tenant_id: &TenantId,
        charge_id: Uuid,
        mutator: F,
    ) -> ServiceResult<ChargeWrite>
    where
        S: ChargeRepository + ?Sized,
        F: FnOnce(&mut Charge),
    {
        let previous = find(store, tenant_id, charge_id)?;
        let mut charge = previous.clone();
        mutator(&mut charge);
        store.save_charge(&charge)?;
        let outcomes =
            ReconcileService::on_mutation(store, &ChargeMutation::updated(&previous, &charge))?;
        Ok(ChargeWrite { charge, outcomes })
    }
}

fn find<S>(store: &S, tenant_id: &TenantId, charge_id: Uuid) -> ServiceResult<Charge>
where
    S: ChargeRepository + ?Sized,
{
    store
        .find_charge(tenant_id, charge_id)?
        .ok_or_else(|| ServiceError::Invalid("Charge not found".into()))
}

fn validate_amounts(charge: &Charge) -> ServiceResult<()> {
    if charge.amount_due < Decimal::ZERO || charge.amount_settled < Decimal::ZERO {
        return Err(ServiceError::Invalid("Amounts must not be negative".into()));
    }
    Ok(())
}
