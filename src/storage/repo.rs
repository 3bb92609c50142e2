//! Experience repository backed by SQLite.
//!
//! `ExperienceRepo` is the concrete sink the flusher writes chunks into. Each
//! chunk is inserted inside one transaction, so a chunk is either fully
//! persisted or not at all. Large chunks are split across several multi-row
//! statements to stay under SQLite's bound-parameter limit.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::models::Experience;

use super::sink::ChunkSink;

const SELECT_COLUMNS: &str = "SELECT id, user_id, type, from_at, to_at, level FROM experiences";

/// SQLite's default `SQLITE_MAX_VARIABLE_NUMBER` (3.32 and later).
const SQLITE_MAX_VARIABLES: usize = 32766;

/// Bound parameters per inserted row.
const COLUMNS_PER_ROW: usize = 6;

/// Rows per `INSERT` statement.
pub(crate) const MAX_ROWS_PER_STATEMENT: usize = SQLITE_MAX_VARIABLES / COLUMNS_PER_ROW;

/// Experience storage over a SQLite pool.
#[derive(Debug, Clone)]
pub struct ExperienceRepo {
    pool: SqlitePool,
}

impl ExperienceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        ExperienceRepo { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Inserts all `experiences` atomically.
    ///
    /// An id that already exists fails the whole call and nothing is inserted.
    pub async fn add_experiences(&self, experiences: &[Experience]) -> Result<(), DatabaseError> {
        if experiences.is_empty() {
            return Ok(());
        }

        let rows = experiences
            .iter()
            .map(ExperienceRow::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::SqlError)?;

        for batch in rows.chunks(MAX_ROWS_PER_STATEMENT) {
            let mut query_builder: QueryBuilder<'_, Sqlite> =
                QueryBuilder::new("INSERT INTO experiences (id, user_id, type, from_at, to_at, level) ");
            query_builder.push_values(batch, |mut b, row| {
                b.push_bind(row.id)
                    .push_bind(row.user_id)
                    .push_bind(row.kind)
                    .push_bind(row.from_at.as_str())
                    .push_bind(row.to_at.as_str())
                    .push_bind(row.level);
            });
            // dropping tx on error rolls back earlier statements of this chunk
            query_builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(DatabaseError::SqlError)?;
        }

        tx.commit().await.map_err(DatabaseError::SqlError)?;

        log::debug!("Inserted {} experiences", experiences.len());
        Ok(())
    }

    /// Returns up to `limit` experiences ordered by id, skipping `offset`.
    pub async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Experience>, DatabaseError> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY id LIMIT ? OFFSET ?"))
            .bind(to_i64(limit, "limit")?)
            .bind(to_i64(offset, "offset")?)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::SqlError)?;

        rows.iter().map(experience_from_row).collect()
    }

    /// Looks up one experience by id.
    pub async fn describe(&self, id: u64) -> Result<Option<Experience>, DatabaseError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(to_i64(id, "id")?)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::SqlError)?;

        row.as_ref().map(experience_from_row).transpose()
    }

    /// Deletes one experience. Returns whether a row was removed.
    pub async fn remove(&self, id: u64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = ?")
            .bind(to_i64(id, "id")?)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::SqlError)?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<u64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM experiences")
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::SqlError)?;

        Ok(count.max(0) as u64)
    }
}

impl ChunkSink for ExperienceRepo {
    async fn write_chunk(&self, chunk: &[Experience]) -> Result<(), DatabaseError> {
        self.add_experiences(chunk).await
    }
}

/// Column values of one `experiences` row.
struct ExperienceRow {
    id: i64,
    user_id: i64,
    kind: i64,
    from_at: String,
    to_at: String,
    level: i64,
}

impl TryFrom<&Experience> for ExperienceRow {
    type Error = DatabaseError;

    fn try_from(e: &Experience) -> Result<Self, Self::Error> {
        Ok(ExperienceRow {
            id: to_i64(e.id, "id")?,
            user_id: to_i64(e.user_id, "user_id")?,
            kind: to_i64(e.kind, "type")?,
            from_at: to_timestamp_text(&e.from),
            to_at: to_timestamp_text(&e.to),
            level: to_i64(e.level, "level")?,
        })
    }
}

fn to_i64(value: u64, column: &str) -> Result<i64, DatabaseError> {
    i64::try_from(value)
        .map_err(|_| DatabaseError::InvalidRow(format!("{column} {value} exceeds i64::MAX")))
}

fn to_u64(value: i64, column: &str) -> Result<u64, DatabaseError> {
    u64::try_from(value)
        .map_err(|_| DatabaseError::InvalidRow(format!("{column} {value} is negative")))
}

fn to_timestamp_text(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn to_datetime(text: &str, column: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::InvalidRow(format!("{column} {text:?} is not a timestamp: {e}")))
}

fn experience_from_row(row: &SqliteRow) -> Result<Experience, DatabaseError> {
    Ok(Experience {
        id: to_u64(row.try_get("id")?, "id")?,
        user_id: to_u64(row.try_get("user_id")?, "user_id")?,
        kind: to_u64(row.try_get("type")?, "type")?,
        from: to_datetime(row.try_get("from_at")?, "from_at")?,
        to: to_datetime(row.try_get("to_at")?, "to_at")?,
        level: to_u64(row.try_get("level")?, "level")?,
    })
}
