pub mod json_backend;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    errors::LedgerError,
    ledger::{Charge, Tenant, TenantId},
};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Minimal persistence contract the reconciler runs against.
pub trait ChargeStore: Send + Sync {
    /// Every charge recorded for the tenant, in no particular order.
    fn list_charges(&self, tenant_id: &TenantId) -> Result<Vec<Charge>>;

    /// Upserts the cached outstanding balance on the tenant record.
    fn write_outstanding_balance(&self, tenant_id: &TenantId, amount: Decimal) -> Result<()>;
}

/// Charge writes issued by the surrounding application.
pub trait ChargeRepository: ChargeStore {
    /// Inserts the charge, or replaces the tenant's charge with the same id.
    fn save_charge(&self, charge: &Charge) -> Result<()>;

    /// Removes the charge and returns it, or `None` when the tenant has no such charge.
    fn delete_charge(&self, tenant_id: &TenantId, charge_id: Uuid) -> Result<Option<Charge>>;

    fn find_charge(&self, tenant_id: &TenantId, charge_id: Uuid) -> Result<Option<Charge>> {
        Ok(self
            .list_charges(tenant_id)?
            .into_iter()
            .find(|charge| charge.id == charge_id))
    }
}

/// Tenant records, including the cached outstanding balance.
pub trait TenantStore: Send + Sync {
    fn load_tenant(&self, tenant_id: &TenantId) -> Result<Option<Tenant>>;
    fn save_tenant(&self, tenant: &Tenant) -> Result<()>;
    fn list_tenants(&self) -> Result<Vec<Tenant>>;
}

pub use json_backend::JsonStore;
