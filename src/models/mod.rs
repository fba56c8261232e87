pub mod maintenance;
pub mod number;
pub mod record;
pub mod reference;
pub mod status;

pub use maintenance::{MaintenanceField, MaintenanceRecord, MAINTENANCE_SHEET};
pub use number::FlexNumber;
pub use record::{DailyField, DailySection, MosqueRecord, DAILY_SHEET};
pub use reference::{DayInfo, MosqueInfo, SiteType};
pub use status::ApprovalStatus;
