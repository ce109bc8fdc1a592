//! Ledger domain models and the pure statement engine.

pub mod charge;
pub mod period;
pub mod schedule;
pub mod statement;
pub mod tenant;

pub use charge::{BillCategory, Charge, ChargeKind, ChargeStatus};
pub use period::{sort_newest_first, sort_oldest_first, Month, Period, MONTH_NAMES};
pub use schedule::{RentSchedule, AUTO_GENERATED_NOTE};
pub use statement::{LineItem, Statement, StatementLine, StatementTotals};
pub use tenant::{TenancyWindow, Tenant, TenantId};
