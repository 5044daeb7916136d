//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use donations_types::{Donation, DonationRepository, NewDonation, RepoError, User};

use crate::types::{PgDonation, PgUser};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_donations_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Connects and runs migrations.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        tracing::info!("connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
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
impl DonationRepository for PostgresRepo {
    async fn create_donation(&self, donation: NewDonation) -> Result<Donation, RepoError> {
        let row: PgDonation = sqlx::query_as(
            r#"INSERT INTO donations (id, name, amount, method, reference, created_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, name, amount, method, reference, created_at"#,
        )
        .bind(Uuid::new_v4())
        .bind(&donation.name)
        .bind(donation.amount.value())
        .bind(donation.method.as_str())
        .bind(&donation.reference)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.into_domain()
    }

    async fn list_donations(&self) -> Result<Vec<Donation>, RepoError> {
        let rows: Vec<PgDonation> = sqlx::query_as(
            r#"SELECT id, name, amount, method, reference, created_at
               FROM donations ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(PgDonation::into_domain).collect()
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let rows: Vec<PgUser> =
            sqlx::query_as(r#"SELECT id, name, email, created_at FROM users ORDER BY created_at"#)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(PgUser::into_domain).collect())
    }
}
