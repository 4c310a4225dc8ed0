//! Habit operations and the check-in flow.
//!
//! A check-in goes through three gates before anything is written: the
//! habit must be owned by the caller, it must be enabled, and it must not
//! already have a check-in inside the current UTC day. The streak is then
//! computed from the habit as read and persisted together with the log row
//! through [`HabitRepository::record_checkin`], which refuses the write if
//! another request got there first.

use super::error::{HabitError, HabitResult};
use super::habit::{CheckinLog, Frequency, Habit, HabitChanges, NewHabit, StreakSummary};
use super::repository::{CheckinWrite, CheckinWriteOutcome, HabitRepository};
use super::streak::{next_streak, utc_day_window};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Unvalidated habit creation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitInput {
    // ---
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub target: Option<i32>,
}

/// Unvalidated habit update request. Absent fields are left unchanged.
///
/// `description` is tri-state: absent keeps it, `null` clears it, a string
/// replaces it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitInput {
    // ---
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,
    pub frequency: Option<String>,
    pub target: Option<i32>,
    pub enabled: Option<bool>,
}

/// Maps a present field to `Some`, keeping an explicit `null` apart from
/// an absent one (which `#[serde(default)]` turns into `None`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// What a successful check-in produced.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinReceipt {
    // ---
    pub log: CheckinLog,
    pub habit: Habit,
}

fn parse_frequency(raw: Option<String>) -> HabitResult<Option<Frequency>> {
    // ---
    raw.map(|value| value.parse::<Frequency>().map_err(HabitError::Validation))
        .transpose()
}

fn validate_target(target: Option<i32>) -> HabitResult<Option<i32>> {
    // ---
    match target {
        Some(value) if value < 1 => Err(HabitError::Validation(
            "Target must be at least 1".to_string(),
        )),
        other => Ok(other),
    }
}

impl CreateHabitInput {
    // ---
    fn validate(self) -> HabitResult<NewHabit> {
        // ---
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| HabitError::Validation("Title is required".to_string()))?;

        Ok(NewHabit {
            title,
            description: self.description,
            frequency: parse_frequency(self.frequency)?.unwrap_or_default(),
            target: validate_target(self.target)?.unwrap_or(1),
        })
    }
}

impl UpdateHabitInput {
    // ---
    fn validate(self) -> HabitResult<HabitChanges> {
        // ---
        let title = match self.title {
            Some(t) if t.trim().is_empty() => {
                return Err(HabitError::Validation("Title cannot be empty".to_string()));
            }
            other => other.map(|t| t.trim().to_string()),
        };

        Ok(HabitChanges {
            title,
            description: self.description,
            frequency: parse_frequency(self.frequency)?,
            target: validate_target(self.target)?,
            enabled: self.enabled,
        })
    }
}

/// Create a habit for `user_id`.
pub async fn create_habit(
    repo: &dyn HabitRepository,
    user_id: Uuid,
    input: CreateHabitInput,
) -> HabitResult<Habit> {
    // ---
    let new_habit = input.validate()?;
    let habit = repo.create_habit(Habit::new(user_id, new_habit)).await?;

    tracing::info!("Created habit {} for user {}", habit.id, user_id);
    Ok(habit)
}

/// All habits of `user_id`, newest first.
pub async fn list_habits(repo: &dyn HabitRepository, user_id: Uuid) -> HabitResult<Vec<Habit>> {
    // ---
    Ok(repo.list_habits(user_id).await?)
}

/// A single habit owned by `user_id`.
pub async fn get_habit(
    repo: &dyn HabitRepository,
    habit_id: Uuid,
    user_id: Uuid,
) -> HabitResult<Habit> {
    // ---
    repo.get_habit(habit_id, user_id)
        .await?
        .ok_or(HabitError::NotFound)
}

/// Update the user-editable fields of a habit.
pub async fn update_habit(
    repo: &dyn HabitRepository,
    habit_id: Uuid,
    user_id: Uuid,
    input: UpdateHabitInput,
) -> HabitResult<Habit> {
    // ---
    let changes = input.validate()?;

    repo.update_habit(habit_id, user_id, changes)
        .await?
        .ok_or(HabitError::NotFound)
}

/// Record the check-in of `habit_id` at `now` and advance its streak.
pub async fn check_in(
    repo: &dyn HabitRepository,
    habit_id: Uuid,
    user_id: Uuid,
    now: DateTime<Utc>,
    note: Option<String>,
) -> HabitResult<CheckinReceipt> {
    // ---
    let habit = repo
        .get_habit(habit_id, user_id)
        .await?
        .ok_or(HabitError::NotFound)?;

    if !habit.enabled {
        return Err(HabitError::HabitDisabled);
    }

    let (day_start, day_end) = utc_day_window(now);
    if repo
        .find_checkin_between(habit_id, user_id, day_start, day_end)
        .await?
        .is_some()
    {
        tracing::debug!("Habit {} already checked in on {}", habit_id, day_start.date_naive());
        return Err(HabitError::DuplicateCheckin);
    }

    let update = next_streak(habit.streak, habit.last_checkin, now);
    let write = CheckinWrite {
        log: CheckinLog::new(habit_id, user_id, update.last_checkin, note),
        expected_last_checkin: habit.last_checkin,
        streak: update.streak,
    };

    match repo.record_checkin(write).await? {
        CheckinWriteOutcome::Recorded { log, habit } => {
            tracing::info!(
                "Checked in habit {} for user {}, streak now {}",
                habit.id,
                user_id,
                habit.streak
            );
            Ok(CheckinReceipt { log, habit })
        }
        CheckinWriteOutcome::AlreadyCheckedIn => Err(HabitError::DuplicateCheckin),
        CheckinWriteOutcome::Stale => {
            tracing::warn!("Habit {} changed during check-in", habit_id);
            Err(HabitError::Conflict(
                "Habit was modified concurrently, please retry".to_string(),
            ))
        }
    }
}

/// Streak summary of a habit: its snapshot when one exists, otherwise a
/// summary derived from the habit record.
pub async fn streak_summary(
    repo: &dyn HabitRepository,
    habit_id: Uuid,
    user_id: Uuid,
) -> HabitResult<StreakSummary> {
    // ---
    if let Some(snapshot) = repo.get_streak_snapshot(habit_id, user_id).await? {
        return Ok(snapshot.into());
    }

    let habit = repo
        .get_habit(habit_id, user_id)
        .await?
        .ok_or(HabitError::NotFound)?;

    Ok(StreakSummary::from(&habit))
}

/// Check-in history of a habit owned by `user_id`, newest first.
pub async fn list_checkins(
    repo: &dyn HabitRepository,
    habit_id: Uuid,
    user_id: Uuid,
) -> HabitResult<Vec<CheckinLog>> {
    // ---
    if repo.get_habit(habit_id, user_id).await?.is_none() {
        return Err(HabitError::NotFound);
    }

    Ok(repo.list_checkins(habit_id, user_id).await?)
}
