//! Monthly rent planning for a tenancy window.

use std::collections::HashSet;

use chrono::Months;

use super::{
    charge::Charge,
    period::Period,
    tenant::{TenancyWindow, Tenant},
};

pub const AUTO_GENERATED_NOTE: &str = "Auto-generated rent entry";

/// Derives the rent charges a tenancy implies. Never touches storage.
pub struct RentSchedule;

impl RentSchedule {
    /// Periods covered by the window, stepping one calendar month from the start date
    /// while the stepped date does not pass the end date.
    pub fn periods(window: &TenancyWindow) -> Vec<Period> {
        let mut periods = Vec::new();
        let mut step = 0u32;
        while let Some(date) = window.start.checked_add_months(Months::new(step)) {
            if date > window.end {
                break;
            }
            periods.push(Period::from_date(date));
            step += 1;
        }
        periods
    }

    /// Pending rent drafts for every period in the window that has no rent charge yet.
    pub fn plan(tenant: &Tenant, window: &TenancyWindow, existing: &[Charge]) -> Vec<Charge> {
        let taken: HashSet<Period> = existing
            .iter()
            .filter(|charge| charge.is_rent() && charge.tenant_id == tenant.id)
            .map(|charge| charge.period)
            .collect();
        Self::periods(window)
            .into_iter()
            .filter(|period| !taken.contains(period))
            .map(|period| {
                Charge::rent(tenant.id.clone(), period, tenant.monthly_rent_baseline)
                    .with_notes(AUTO_GENERATED_NOTE)
            })
            .collect()
    }
}
