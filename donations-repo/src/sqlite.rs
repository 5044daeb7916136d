//! SQLite repository adapter.

use async_trait::async_trait;
use chrono::SubsecRound;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use donations_types::{Donation, DonationId, DonationRepository, NewDonation, RepoError, User};

use crate::types::{SqliteDonation, SqliteUser, format_timestamp};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

const MIGRATION: &str = include_str!("../migrations/0001_create_donations.sql");

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in MIGRATION.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt).execute(pool).await?;
        }
    }
    Ok(())
}

/// Directory that must exist before an on-disk database URL can be opened.
pub(crate) fn database_dir(database_url: &str) -> Option<&Path> {
    database_url
        .strip_prefix("sqlite://")
        .and_then(|rest| rest.split('?').next())
        .filter(|path| *path != ":memory:")
        .and_then(|path| Path::new(path).parent())
        .filter(|dir| !dir.as_os_str().is_empty())
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        if let Some(dir) = database_dir(database_url) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Each in-memory connection is its own database, so pin the pool to one.
        let in_memory = database_url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new().max_connections(5);
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options
            .connect_with(options)
            .await?;

        run_migrations(&pool).await?;
        tracing::info!("connected to SQLite");

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl DonationRepository for SqliteRepo {
    async fn create_donation(&self, donation: NewDonation) -> Result<Donation, RepoError> {
        let id = Uuid::new_v4();
        // TEXT timestamps hold microseconds; return exactly what is stored.
        let now = chrono::Utc::now().trunc_subsecs(6);

        sqlx::query(
            r#"INSERT INTO donations (id, name, amount, method, reference, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(&donation.name)
        .bind(donation.amount.value())
        .bind(donation.method.as_str())
        .bind(&donation.reference)
        .bind(format_timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(Donation::from_parts(DonationId::from_uuid(id), donation, now))
    }

    async fn list_donations(&self) -> Result<Vec<Donation>, RepoError> {
        // rowid breaks ties between donations stored within the same microsecond.
        let rows: Vec<SqliteDonation> = sqlx::query_as(
            r#"SELECT id, name, amount, method, reference, created_at
               FROM donations ORDER BY created_at DESC, rowid DESC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(SqliteDonation::into_domain).collect()
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let rows: Vec<SqliteUser> =
            sqlx::query_as(r#"SELECT id, name, email, created_at FROM users ORDER BY created_at"#)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(SqliteUser::into_domain).collect()
    }
}
