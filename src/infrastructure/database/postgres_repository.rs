use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    CheckinLog, CheckinWrite, CheckinWriteOutcome, Frequency, Habit, HabitChanges,
    HabitRepository, RepositoryPtr, StreakSnapshot,
};

const HABIT_COLUMNS: &str = "id, user_id, title, description, frequency, target, enabled, \
                             streak, last_checkin, created_at";

const CHECKIN_COLUMNS: &str = "id, habit_id, user_id, date, success, note, created_at";

#[derive(sqlx::FromRow)]
struct HabitRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    frequency: String,
    target: i32,
    enabled: bool,
    streak: i32,
    last_checkin: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<HabitRow> for Habit {
    type Error = anyhow::Error;

    fn try_from(r: HabitRow) -> Result<Self> {
        // ---
        let frequency = r
            .frequency
            .parse::<Frequency>()
            .map_err(|e| anyhow!("habit {}: {}", r.id, e))?;

        Ok(Habit {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            description: r.description,
            frequency,
            target: r.target,
            enabled: r.enabled,
            streak: r.streak,
            last_checkin: r.last_checkin,
            created_at: r.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CheckinRow {
    id: Uuid,
    habit_id: Uuid,
    user_id: Uuid,
    date: DateTime<Utc>,
    success: bool,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CheckinRow> for CheckinLog {
    fn from(r: CheckinRow) -> Self {
        // ---
        CheckinLog {
            id: r.id,
            habit_id: r.habit_id,
            user_id: r.user_id,
            date: r.date,
            success: r.success,
            note: r.note,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SnapshotRow {
    habit_id: Uuid,
    user_id: Uuid,
    streak: i32,
    total_check_ins: i64,
    last_checkin: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub fn create_postgres_repository(pool: PgPool) -> RepositoryPtr {
    // ---
    std::sync::Arc::new(PostgresRepository::new(pool))
}

pub struct PostgresRepository {
    // ---
    pool: PgPool,
}

impl PostgresRepository {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

#[async_trait::async_trait]
impl HabitRepository for PostgresRepository {
    // ---
    async fn create_habit(&self, habit: Habit) -> Result<Habit> {
        // ---
        sqlx::query(
            "INSERT INTO habits (id, user_id, title, description, frequency, target, enabled,
                                 streak, last_checkin, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(habit.id)
        .bind(habit.user_id)
        .bind(&habit.title)
        .bind(&habit.description)
        .bind(habit.frequency.as_str())
        .bind(habit.target)
        .bind(habit.enabled)
        .bind(habit.streak)
        .bind(habit.last_checkin)
        .bind(habit.created_at)
        .execute(&self.pool)
        .await?;

        Ok(habit)
    }

    async fn list_habits(&self, user_id: Uuid) -> Result<Vec<Habit>> {
        // ---
        let rows = sqlx::query_as::<_, HabitRow>(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Habit::try_from).collect()
    }

    async fn get_habit(&self, habit_id: Uuid, user_id: Uuid) -> Result<Option<Habit>> {
        // ---
        let row = sqlx::query_as::<_, HabitRow>(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE id = $1 AND user_id = $2"
        ))
        .bind(habit_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Habit::try_from).transpose()
    }

    async fn update_habit(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        changes: HabitChanges,
    ) -> Result<Option<Habit>> {
        // ---
        let row = sqlx::query_as::<_, HabitRow>(&format!(
            "UPDATE habits
             SET title = COALESCE($1, title),
                 description = CASE WHEN $2 THEN $3 ELSE description END,
                 frequency = COALESCE($4, frequency),
                 target = COALESCE($5, target),
                 enabled = COALESCE($6, enabled)
             WHERE id = $7 AND user_id = $8
             RETURNING {HABIT_COLUMNS}"
        ))
        .bind(changes.title)
        .bind(changes.description.is_some())
        .bind(changes.description.flatten())
        .bind(changes.frequency.map(|f| f.as_str()))
        .bind(changes.target)
        .bind(changes.enabled)
        .bind(habit_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Habit::try_from).transpose()
    }

    async fn find_checkin_between(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<CheckinLog>> {
        // ---
        let row = sqlx::query_as::<_, CheckinRow>(&format!(
            "SELECT {CHECKIN_COLUMNS} FROM checkin_logs
             WHERE habit_id = $1 AND user_id = $2 AND date >= $3 AND date < $4
             LIMIT 1"
        ))
        .bind(habit_id)
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CheckinLog::from))
    }

    async fn record_checkin(&self, write: CheckinWrite) -> Result<CheckinWriteOutcome> {
        // ---
        let log = write.log;
        let mut tx = self.pool.begin().await?;

        // The unique (habit_id, user_id, checkin_day) constraint settles
        // same-day races; the loser inserts nothing.
        let inserted = sqlx::query_as::<_, CheckinRow>(&format!(
            "INSERT INTO checkin_logs (id, habit_id, user_id, date, checkin_day, success, note, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (habit_id, user_id, checkin_day) DO NOTHING
             RETURNING {CHECKIN_COLUMNS}"
        ))
        .bind(log.id)
        .bind(log.habit_id)
        .bind(log.user_id)
        .bind(log.date)
        .bind(log.date.date_naive())
        .bind(log.success)
        .bind(&log.note)
        .bind(log.created_at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(log_row) = inserted else {
            tx.rollback().await?;
            return Ok(CheckinWriteOutcome::AlreadyCheckedIn);
        };

        let habit_row = sqlx::query_as::<_, HabitRow>(&format!(
            "UPDATE habits SET streak = $1, last_checkin = $2
             WHERE id = $3 AND user_id = $4 AND last_checkin IS NOT DISTINCT FROM $5
             RETURNING {HABIT_COLUMNS}"
        ))
        .bind(write.streak)
        .bind(log.date)
        .bind(log.habit_id)
        .bind(log.user_id)
        .bind(write.expected_last_checkin)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(habit_row) = habit_row else {
            tx.rollback().await?;
            return Ok(CheckinWriteOutcome::Stale);
        };

        tx.commit().await?;

        Ok(CheckinWriteOutcome::Recorded {
            log: log_row.into(),
            habit: habit_row.try_into()?,
        })
    }

    async fn list_checkins(&self, habit_id: Uuid, user_id: Uuid) -> Result<Vec<CheckinLog>> {
        // ---
        let rows = sqlx::query_as::<_, CheckinRow>(&format!(
            "SELECT {CHECKIN_COLUMNS} FROM checkin_logs
             WHERE habit_id = $1 AND user_id = $2
             ORDER BY date DESC"
        ))
        .bind(habit_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CheckinLog::from).collect())
    }

    async fn get_streak_snapshot(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<StreakSnapshot>> {
        // ---
        let row = sqlx::query_as::<_, SnapshotRow>(
            "SELECT habit_id, user_id, streak, total_check_ins, last_checkin, created_at, updated_at
             FROM streak_snapshots WHERE habit_id = $1 AND user_id = $2",
        )
        .bind(habit_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| StreakSnapshot {
            habit_id: r.habit_id,
            user_id: r.user_id,
            streak: r.streak,
            total_check_ins: r.total_check_ins,
            last_checkin: r.last_checkin,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }))
    }

    async fn ping(&self) -> Result<()> {
        // ---
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
