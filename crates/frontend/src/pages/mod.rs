//! Page components.

mod dashboard;
mod login;
mod tasks;

pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use tasks::TasksPage;
