//! In-process habit store.
//!
//! Holds everything behind a single `RwLock`, so `record_checkin` runs its
//! duplicate and compare-and-set checks and both writes under one write
//! guard. Used for local development (`HABIT_STORAGE_TYPE=memory`) and tests.

use crate::domain::streak::start_of_utc_day;
use crate::domain::{
    CheckinLog, CheckinWrite, CheckinWriteOutcome, Habit, HabitChanges, HabitRepository,
    StreakSnapshot,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Store {
    habits: HashMap<Uuid, Habit>,
    checkins: Vec<CheckinLog>,
    snapshots: HashMap<(Uuid, Uuid), StreakSnapshot>,
}

#[derive(Default)]
pub struct MemoryRepository {
    // ---
    store: RwLock<Store>,
}

impl MemoryRepository {
    // ---
    pub fn new() -> Self {
        // ---
        Self::default()
    }

    /// Store a streak snapshot, replacing any existing one for the pair.
    pub async fn put_snapshot(&self, snapshot: StreakSnapshot) {
        // ---
        let mut store = self.store.write().await;
        store
            .snapshots
            .insert((snapshot.habit_id, snapshot.user_id), snapshot);
    }
}

#[async_trait::async_trait]
impl HabitRepository for MemoryRepository {
    // ---
    async fn create_habit(&self, habit: Habit) -> Result<Habit> {
        // ---
        let mut store = self.store.write().await;
        store.habits.insert(habit.id, habit.clone());
        Ok(habit)
    }

    async fn list_habits(&self, user_id: Uuid) -> Result<Vec<Habit>> {
        // ---
        let store = self.store.read().await;
        let mut habits: Vec<Habit> = store
            .habits
            .values()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect();
        habits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(habits)
    }

    async fn get_habit(&self, habit_id: Uuid, user_id: Uuid) -> Result<Option<Habit>> {
        // ---
        let store = self.store.read().await;
        Ok(store
            .habits
            .get(&habit_id)
            .filter(|h| h.user_id == user_id)
            .cloned())
    }

    async fn update_habit(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        changes: HabitChanges,
    ) -> Result<Option<Habit>> {
        // ---
        let mut store = self.store.write().await;
        let Some(habit) = store
            .habits
            .get_mut(&habit_id)
            .filter(|h| h.user_id == user_id)
        else {
            return Ok(None);
        };

        habit.apply(changes);
        Ok(Some(habit.clone()))
    }

    async fn find_checkin_between(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<CheckinLog>> {
        // ---
        let store = self.store.read().await;
        Ok(store
            .checkins
            .iter()
            .find(|c| {
                c.habit_id == habit_id && c.user_id == user_id && c.date >= start && c.date < end
            })
            .cloned())
    }

    async fn record_checkin(&self, write: CheckinWrite) -> Result<CheckinWriteOutcome> {
        // ---
        let mut store = self.store.write().await;
        let log = write.log;
        let day = start_of_utc_day(log.date);

        let duplicate = store.checkins.iter().any(|c| {
            c.habit_id == log.habit_id
                && c.user_id == log.user_id
                && start_of_utc_day(c.date) == day
        });
        if duplicate {
            return Ok(CheckinWriteOutcome::AlreadyCheckedIn);
        }

        let Some(habit) = store
            .habits
            .get_mut(&log.habit_id)
            .filter(|h| h.user_id == log.user_id)
        else {
            return Ok(CheckinWriteOutcome::Stale);
        };
        if habit.last_checkin != write.expected_last_checkin {
            return Ok(CheckinWriteOutcome::Stale);
        }

        habit.streak = write.streak;
        habit.last_checkin = Some(log.date);
        let habit = habit.clone();
        store.checkins.push(log.clone());

        Ok(CheckinWriteOutcome::Recorded { log, habit })
    }

    async fn list_checkins(&self, habit_id: Uuid, user_id: Uuid) -> Result<Vec<CheckinLog>> {
        // ---
        let store = self.store.read().await;
        let mut logs: Vec<CheckinLog> = store
            .checkins
            .iter()
            .filter(|c| c.habit_id == habit_id && c.user_id == user_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(logs)
    }

    async fn get_streak_snapshot(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<StreakSnapshot>> {
        // ---
        let store = self.store.read().await;
        Ok(store.snapshots.get(&(habit_id, user_id)).cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
