use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    config::LedgerConfig,
    core::utils::ensure_dir,
    errors::LedgerError,
    ledger::{Charge, Tenant, TenantId},
};

use super::{ChargeRepository, ChargeStore, Result, TenantStore};

const DOCUMENT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const TENANTS_DIR: &str = "tenants";
const CHARGES_DIR: &str = "charges";

/// File-backed store: one tenant document and one charge array per tenant.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
    tenants_dir: PathBuf,
    charges_dir: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let tenants_dir = root.join(TENANTS_DIR);
        let charges_dir = root.join(CHARGES_DIR);
        ensure_dir(&tenants_dir)?;
        ensure_dir(&charges_dir)?;
        Ok(Self {
            root,
            tenants_dir,
            charges_dir,
        })
    }

    pub fn from_config(config: &LedgerConfig) -> Result<Self> {
        Self::new(config.resolve_store_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tenant_path(&self, tenant_id: &TenantId) -> Result<PathBuf> {
        Ok(self.tenants_dir.join(document_name(tenant_id)?))
    }

    pub fn charges_path(&self, tenant_id: &TenantId) -> Result<PathBuf> {
        Ok(self.charges_dir.join(document_name(tenant_id)?))
    }

    fn read_charges(&self, tenant_id: &TenantId) -> Result<Vec<Charge>> {
        let path = self.charges_path(tenant_id)?;
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let charges: Vec<Charge> = serde_json::from_str(&data)?;
        if let Some(stray) = charges.iter().find(|charge| &charge.tenant_id != tenant_id) {
            return Err(LedgerError::Store(format!(
                "charge {} in {} belongs to tenant {}",
                stray.id,
                path.display(),
                stray.tenant_id
            )));
        }
        Ok(charges)
    }

    fn write_charges(&self, tenant_id: &TenantId, charges: &[Charge]) -> Result<()> {
        let path = self.charges_path(tenant_id)?;
        let data = serde_json::to_string_pretty(charges)?;
        write_atomic(&path, &data)?;
        tracing::info!(
            tenant = %tenant_id,
            charges = charges.len(),
            path = %path.display(),
            "charges written"
        );
        Ok(())
    }

    fn read_tenant(path: &Path) -> Result<Option<Tenant>> {
        match fs::read_to_string(path) {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl ChargeStore for JsonStore {
    fn list_charges(&self, tenant_id: &TenantId) -> Result<Vec<Charge>> {
        self.read_charges(tenant_id)
    }

    /// A tenant without a document gets a minimal one named after its id.
    fn write_outstanding_balance(&self, tenant_id: &TenantId, amount: Decimal) -> Result<()> {
        let mut tenant = self
            .load_tenant(tenant_id)?
            .unwrap_or_else(|| Tenant::new(tenant_id.clone(), tenant_id.as_str()));
        tenant.outstanding_balance = amount;
        self.save_tenant(&tenant)
    }
}

impl ChargeRepository for JsonStore {
    fn save_charge(&self, charge: &Charge) -> Result<()> {
        let mut charges = self.read_charges(&charge.tenant_id)?;
        match charges.iter_mut().find(|existing| existing.id == charge.id) {
            Some(existing) => *existing = charge.clone(),
            None => charges.push(charge.clone()),
        }
        self.write_charges(&charge.tenant_id, &charges)
    }

    fn delete_charge(&self, tenant_id: &TenantId, charge_id: Uuid) -> Result<Option<Charge>> {
        let mut charges = self.read_charges(tenant_id)?;
        let Some(index) = charges.iter().position(|charge| charge.id == charge_id) else {
            return Ok(None);
        };
        let removed = charges.remove(index);
        self.write_charges(tenant_id, &charges)?;
        Ok(Some(removed))
    }
}

impl TenantStore for JsonStore {
    fn load_tenant(&self, tenant_id: &TenantId) -> Result<Option<Tenant>> {
        Self::read_tenant(&self.tenant_path(tenant_id)?)
    }

    fn save_tenant(&self, tenant: &Tenant) -> Result<()> {
        let path = self.tenant_path(&tenant.id)?;
        let data = serde_json::to_string_pretty(tenant)?;
        write_atomic(&path, &data)?;
        tracing::info!(
            tenant = %tenant.id,
            outstanding_balance = %tenant.outstanding_balance,
            "tenant written"
        );
        Ok(())
    }

    /// Unreadable tenant documents are skipped with a warning.
    fn list_tenants(&self) -> Result<Vec<Tenant>> {
        let mut tenants = Vec::new();
        for entry in fs::read_dir(&self.tenants_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            match Self::read_tenant(&path) {
                Ok(Some(tenant)) => tenants.push(tenant),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping tenant document");
                }
            }
        }
        tenants.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tenants)
    }
}

/// File name for a tenant's documents. Ids must be usable verbatim as file stems.
fn document_name(tenant_id: &TenantId) -> Result<String> {
    let id = tenant_id.as_str();
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(LedgerError::InvalidRef(format!(
            "tenant id `{id}` cannot name a store document"
        )));
    }
    Ok(format!("{id}.{DOCUMENT_EXTENSION}"))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
