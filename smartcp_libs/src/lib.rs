pub mod codeforces;
pub mod dashboard;
pub mod error;
pub mod progress;
pub mod stats;
pub mod store;
pub mod suggest;

pub use dashboard::Dashboard;
pub use error::DashboardError;
