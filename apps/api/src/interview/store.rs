use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{AnyPool, FromRow};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::models::interview::{InterviewMode, InterviewRecord, RecentUpdate, Review};

// The Any driver cannot decode SQL NULL into Option<T> on SQLite, and hands
// MySQL TEXT columns over as blobs. Nullable columns are therefore coalesced
// to sentinels and notes are cast to character data in SQL.
const RECORD_COLUMNS: &str = "id, name, emailid, interview_mode, \
    COALESCE(interview_status, '') AS interview_status, \
    CAST(COALESCE(good_points, '') AS CHAR(4000)) AS good_points, \
    CAST(COALESCE(bad_points, '') AS CHAR(4000)) AS bad_points, \
    CAST(COALESCE(overall, '') AS CHAR(4000)) AS overall, \
    COALESCE(last_updated, -1) AS last_updated";

/// Raw row shape. Empty notes and status, and a negative stamp, stand for NULL.
#[derive(FromRow)]
struct InterviewRow {
    id: i64,
    name: String,
    emailid: String,
    interview_mode: String,
    interview_status: String,
    good_points: String,
    bad_points: String,
    overall: String,
    last_updated: i64,
}

impl TryFrom<InterviewRow> for InterviewRecord {
    type Error = anyhow::Error;

    fn try_from(row: InterviewRow) -> Result<Self> {
        Ok(InterviewRecord {
            id: row.id,
            interview_mode: row.interview_mode.parse()?,
            interview_status: match row.interview_status.as_str() {
                "" => Default::default(),
                s => s.parse()?,
            },
            last_updated: stamp_to_time(row.last_updated),
            name: row.name,
            email: row.emailid,
            good_points: non_empty(row.good_points),
            bad_points: non_empty(row.bad_points),
            overall: non_empty(row.overall),
        })
    }
}

#[derive(FromRow)]
struct RecentUpdateRow {
    name: String,
    interview_mode: String,
    last_updated: i64,
}

/// Result of [`InterviewStore::upsert_submission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted {
    pub id: i64,
    pub created: bool,
}

/// CRUD over the `interview` table.
///
/// Cheap to clone; clones share the pool, the writer lock and the clock.
#[derive(Clone)]
pub struct InterviewStore {
    pool: AnyPool,
    read_timeout: Duration,
    write_timeout: Duration,
    writer: Arc<Mutex<()>>,
    last_stamp: Arc<AtomicI64>,
}

impl InterviewStore {
    pub fn new(pool: AnyPool, config: &DatabaseConfig) -> Self {
        InterviewStore {
            pool,
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
            writer: Arc::new(Mutex::new(())),
            last_stamp: Arc::new(AtomicI64::new(i64::MIN)),
        }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Every candidate name on record, in storage order.
    pub async fn list_names(&self) -> Result<Vec<String>> {
        bounded(
            self.read_timeout,
            "list names",
            sqlx::query_scalar::<_, String>("SELECT name FROM interview").fetch_all(&self.pool),
        )
        .await
    }

    /// (name, mode, last_updated) for every record, newest first.
    pub async fn list_recent_updates(&self) -> Result<Vec<RecentUpdate>> {
        let rows = bounded(
            self.read_timeout,
            "list recent updates",
            sqlx::query_as::<_, RecentUpdateRow>(
                r#"
                SELECT name, interview_mode, COALESCE(last_updated, -1) AS last_updated
                FROM interview
                ORDER BY last_updated DESC
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await?;

        rows.into_iter()
            .map(|row| -> Result<RecentUpdate> {
                Ok(RecentUpdate {
                    interview_mode: row.interview_mode.parse()?,
                    last_updated: stamp_to_time(row.last_updated),
                    name: row.name,
                })
            })
            .collect()
    }

    pub async fn get_details(&self, name: &str) -> Result<Option<InterviewRecord>> {
        let row = bounded(
            self.read_timeout,
            "get details",
            sqlx::query_as::<_, InterviewRow>(&format!(
                "SELECT {RECORD_COLUMNS} FROM interview WHERE name = ? ORDER BY id LIMIT 1"
            ))
            .bind(name)
            .fetch_optional(&self.pool),
        )
        .await?;

        row.map(InterviewRecord::try_from)
            .transpose()
            .with_context(|| format!("Stored record for '{name}' is malformed"))
    }

    /// Inserts a Pending record for `name`, or resets the existing one to Pending
    /// with the new email and mode.
    ///
    /// Submissions are serialised by the store's writer lock, so two concurrent
    /// calls for the same name through one store cannot both insert.
    pub async fn upsert_submission(
        &self,
        name: &str,
        email: &str,
        mode: InterviewMode,
    ) -> Result<Upserted> {
        let _guard = self.writer.lock().await;

        let upserted = match self.find_id(name).await? {
            Some(id) => {
                self.update_submission(id, email, mode).await?;
                Upserted { id, created: false }
            }
            None => {
                let id = self.insert_submission(name, email, mode).await?;
                Upserted { id, created: true }
            }
        };

        info!(
            "Recorded submission for {name} (id {}, mode {mode}, created: {})",
            upserted.id, upserted.created
        );
        Ok(upserted)
    }

    /// Overwrites status and notes for `name`. Returns false when no record matched.
    pub async fn update_review(&self, name: &str, review: &Review) -> Result<bool> {
        let stamp = self.next_stamp();
        let result = bounded(
            self.write_timeout,
            "update review",
            sqlx::query(
                r#"
                UPDATE interview
                SET interview_status = ?, good_points = ?, bad_points = ?, overall = ?, last_updated = ?
                WHERE name = ?
                "#,
            )
            .bind(review.status.as_str())
            .bind(review.good_points.as_str())
            .bind(review.bad_points.as_str())
            .bind(review.overall.as_str())
            .bind(stamp)
            .bind(name)
            .execute(&self.pool),
        )
        .await?;

        let matched = result.rows_affected() > 0;
        if matched {
            info!("Saved review for {name}: {}", review.status);
        } else {
            debug!("Review for {name} matched no record");
        }
        Ok(matched)
    }

    async fn find_id(&self, name: &str) -> Result<Option<i64>> {
        bounded(
            self.read_timeout,
            "find record",
            sqlx::query_scalar::<_, i64>("SELECT id FROM interview WHERE name = ? ORDER BY id LIMIT 1")
                .bind(name)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn insert_submission(&self, name: &str, email: &str, mode: InterviewMode) -> Result<i64> {
        let stamp = self.next_stamp();
        let result = bounded(
            self.write_timeout,
            "insert submission",
            sqlx::query(
                r#"
                INSERT INTO interview (name, emailid, interview_mode, interview_status, last_updated)
                VALUES (?, ?, ?, 'Pending', ?)
                "#,
            )
            .bind(name)
            .bind(email)
            .bind(mode.as_str())
            .bind(stamp)
            .execute(&self.pool),
        )
        .await?;

        // The row is committed at this point; SQLite through the Any driver
        // reports no insert id, so read it back instead of failing.
        match result.last_insert_id() {
            Some(id) => Ok(id),
            None => self.newest_id(name).await?.ok_or_else(|| {
                anyhow!("Inserted record for '{name}' could not be read back")
            }),
        }
    }

    async fn newest_id(&self, name: &str) -> Result<Option<i64>> {
        bounded(
            self.read_timeout,
            "read back new record",
            sqlx::query_scalar::<_, i64>(
                "SELECT id FROM interview WHERE name = ? ORDER BY id DESC LIMIT 1",
            )
            .bind(name)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn update_submission(&self, id: i64, email: &str, mode: InterviewMode) -> Result<()> {
        let stamp = self.next_stamp();
        bounded(
            self.write_timeout,
            "update submission",
            sqlx::query(
                r#"
                UPDATE interview
                SET emailid = ?, interview_mode = ?, interview_status = 'Pending', last_updated = ?
                WHERE id = ?
                "#,
            )
            .bind(email)
            .bind(mode.as_str())
            .bind(stamp)
            .bind(id)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    /// Current time in Unix microseconds, strictly greater than any stamp issued before.
    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_micros();
        let prev = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev.saturating_add(1)))
            })
            .unwrap_or(now);
        now.max(prev.saturating_add(1))
    }
}

async fn bounded<T, F>(limit: Duration, op: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.with_context(|| format!("Failed to {op}")),
        Err(_) => Err(anyhow!("Timed out after {limit:?} trying to {op}")),
    }
}

/// Negative stamps are the SQL-side stand-in for a missing `last_updated`.
fn stamp_to_time(stamp: i64) -> Option<DateTime<Utc>> {
    if stamp < 0 {
        None
    } else {
        from_micros(stamp)
    }
}

fn non_empty(note: String) -> Option<String> {
    Some(note).filter(|n| !n.is_empty())
}

fn from_micros(micros: i64) -> Option<DateTime<Utc>> {
    let secs = micros.div_euclid(1_000_000);
    let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).ok()?;
    DateTime::from_timestamp(secs, nanos)
}
