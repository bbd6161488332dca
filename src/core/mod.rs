pub mod client;
pub mod session;

pub use crate::domain::model::{ConsultationRecord, DashboardStats, Patient};
pub use crate::domain::ports::{ConfigProvider, SessionStore};
pub use crate::utils::error::Result;
