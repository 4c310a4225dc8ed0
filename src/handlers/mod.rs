// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod auth;
mod habits;
mod health;
mod metrics;
mod root;
mod shared_types;
mod streaks;


// Core handlers
pub use health::health_check;
pub use metrics::{metrics_handler, track_http_metrics};
pub use root::root_handler;

// Habit handlers
pub use habits::{check_in, create_habit, get_habit, list_checkins, list_habits, update_habit};

// Streak handlers
pub use streaks::get_streak;

pub use auth::AuthUser;
pub use shared_types::{ApiError, ErrorResponse};
