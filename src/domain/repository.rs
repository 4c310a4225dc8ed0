use super::habit::{CheckinLog, Habit, HabitChanges, StreakSnapshot};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// A check-in ready to be persisted together with its streak update.
#[derive(Debug, Clone)]
pub struct CheckinWrite {
    // ---
    pub log: CheckinLog,

    /// `last_checkin` the streak was computed from. The habit is only
    /// updated if it still holds this value.
    pub expected_last_checkin: Option<DateTime<Utc>>,
    pub streak: i32,
}

/// Outcome of [`HabitRepository::record_checkin`].
#[derive(Debug, Clone)]
pub enum CheckinWriteOutcome {
    // ---
    /// Log row inserted and habit updated.
    Recorded { log: CheckinLog, habit: Habit },

    /// A log row for the same (habit, user, UTC day) already exists.
    AlreadyCheckedIn,

    /// The habit's `last_checkin` changed since it was read, or the habit vanished.
    Stale,
}

/// Abstraction for habit, check-in and snapshot persistence.
///
/// Every lookup is scoped by the owning user; a habit owned by someone else
/// is indistinguishable from a missing one.
#[async_trait::async_trait]
pub trait HabitRepository: Send + Sync {
    // ---
    /// Insert a new habit.
    async fn create_habit(&self, habit: Habit) -> Result<Habit>;

    /// All habits of a user, newest first.
    async fn list_habits(&self, user_id: Uuid) -> Result<Vec<Habit>>;

    /// Get a habit owned by `user_id`.
    async fn get_habit(&self, habit_id: Uuid, user_id: Uuid) -> Result<Option<Habit>>;

    /// Apply user-editable changes. `None` when no such habit is owned by the user.
    async fn update_habit(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        changes: HabitChanges,
    ) -> Result<Option<Habit>>;

    /// First check-in of the habit in `[start, end)`, if any.
    async fn find_checkin_between(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<CheckinLog>>;

    /// Insert the log row and update the habit's streak as one unit.
    ///
    /// Implementations must reject a second row for the same UTC day and
    /// must not touch the habit unless its `last_checkin` still equals
    /// `expected_last_checkin`. Nothing is written unless both succeed.
    async fn record_checkin(&self, write: CheckinWrite) -> Result<CheckinWriteOutcome>;

    /// Check-in history of a habit, newest first.
    async fn list_checkins(&self, habit_id: Uuid, user_id: Uuid) -> Result<Vec<CheckinLog>>;

    /// Streak snapshot for the (habit, user) pair, if one has been stored.
    async fn get_streak_snapshot(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<StreakSnapshot>>;

    /// Verify the backing store is reachable.
    async fn ping(&self) -> Result<()>;
}

/// Type alias for any backend that implements HabitRepository.
pub type RepositoryPtr = Arc<dyn HabitRepository>;
