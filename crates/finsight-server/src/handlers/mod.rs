//! Request handlers

mod dashboard;
mod documents;

pub use dashboard::{ai_health, clear_dashboard, get_dashboard, DashboardView};
pub use documents::upload_document;
