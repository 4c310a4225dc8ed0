use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How often a habit is meant to be performed.
///
/// Streaks are always counted in UTC calendar days regardless of the
/// frequency; the value is stored for display and future scheduling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    // ---
    #[default]
    Daily,
    Weekly,
    Custom,
}

impl Frequency {
    // ---
    pub fn as_str(&self) -> &'static str {
        // ---
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            other => Err(format!("Invalid frequency: {other}")),
        }
    }
}

/// A habit owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    // ---
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub target: i32,
    pub enabled: bool,

    /// Consecutive UTC days with a check-in. Never negative.
    pub streak: i32,

    /// `None` until the first check-in.
    pub last_checkin: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    // ---
    /// Builds a habit from a validated creation request, with a zero streak.
    pub fn new(user_id: Uuid, new_habit: NewHabit) -> Self {
        // ---
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: new_habit.title,
            description: new_habit.description,
            frequency: new_habit.frequency,
            target: new_habit.target,
            enabled: true,
            streak: 0,
            last_checkin: None,
            created_at: Utc::now(),
        }
    }

    /// Applies the user-editable fields of `changes`, leaving the rest untouched.
    pub fn apply(&mut self, changes: HabitChanges) {
        // ---
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(frequency) = changes.frequency {
            self.frequency = frequency;
        }
        if let Some(target) = changes.target {
            self.target = target;
        }
        if let Some(enabled) = changes.enabled {
            self.enabled = enabled;
        }
    }
}

/// Validated input for creating a habit.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHabit {
    // ---
    pub title: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub target: i32,
}

/// Validated partial update of a habit.
///
/// Only these fields may change through an update; `streak` and
/// `last_checkin` belong to the check-in path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitChanges {
    // ---
    pub title: Option<String>,

    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub frequency: Option<Frequency>,
    pub target: Option<i32>,
    pub enabled: Option<bool>,
}

/// A single check-in event. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinLog {
    // ---
    pub id: Uuid,
    pub habit_id: Uuid,
    pub user_id: Uuid,

    /// The moment of the check-in.
    pub date: DateTime<Utc>,
    pub success: bool,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CheckinLog {
    // ---
    pub fn new(habit_id: Uuid, user_id: Uuid, date: DateTime<Utc>, note: Option<String>) -> Self {
        // ---
        Self {
            id: Uuid::new_v4(),
            habit_id,
            user_id,
            date,
            success: true,
            note,
            created_at: date,
        }
    }
}

/// Denormalized streak summary for one (habit, user) pair.
///
/// Nothing in this service writes snapshots; they are read when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSnapshot {
    // ---
    pub habit_id: Uuid,
    pub user_id: Uuid,
    pub streak: i32,
    pub total_check_ins: i64,
    pub last_checkin: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Streak summary returned by the lookup endpoint.
///
/// `fallback` is true when the summary was derived from the habit record
/// because no snapshot exists; `total_check_ins` is then unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    // ---
    pub habit: Uuid,
    pub user: Uuid,
    pub streak: i32,
    pub total_check_ins: Option<i64>,
    pub last_checkin: Option<DateTime<Utc>>,
    pub fallback: bool,
}

impl From<StreakSnapshot> for StreakSummary {
    fn from(snapshot: StreakSnapshot) -> Self {
        // ---
        Self {
            habit: snapshot.habit_id,
            user: snapshot.user_id,
            streak: snapshot.streak,
            total_check_ins: Some(snapshot.total_check_ins),
            last_checkin: snapshot.last_checkin,
            fallback: false,
        }
    }
}

impl From<&Habit> for StreakSummary {
    fn from(habit: &Habit) -> Self {
        // ---
        Self {
            habit: habit.id,
            user: habit.user_id,
            streak: habit.streak,
            total_check_ins: None,
            last_checkin: habit.last_checkin,
            fallback: true,
        }
    }
}
