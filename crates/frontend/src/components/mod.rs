//! Reusable UI components.

mod loading;
mod loading_bar;
mod stat_card;
mod task_row;
mod timestamp;
mod toast;

pub use loading::Loading;
pub use loading_bar::LoadingBar;
pub use stat_card::StatCard;
pub use task_row::TaskRow;
pub use timestamp::{ShiftDuration, Timestamp};
pub use toast::Toast;
