mod checkin;
mod error;
mod habit;
mod metrics;
mod repository;
mod session;
pub mod streak;

// Habit and check-in operations
pub use checkin::{
    check_in, create_habit, get_habit, list_checkins, list_habits, streak_summary, update_habit,
    CheckinReceipt, CreateHabitInput, UpdateHabitInput,
};
pub use error::{HabitError, HabitResult};
pub use habit::{
    CheckinLog, Frequency, Habit, HabitChanges, NewHabit, StreakSnapshot, StreakSummary,
};

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose storage and session abstractions
pub use repository::{CheckinWrite, CheckinWriteOutcome, HabitRepository, RepositoryPtr};
pub use session::{SessionInfo, SessionStore, SessionStorePtr};
