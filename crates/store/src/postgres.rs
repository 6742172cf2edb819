//! Postgres-backed user store.
//!
//! Queries are bound at runtime to avoid a compile-time database
//! requirement. Dedup rests on the unique constraint over `external_id`:
//! the race between two concurrent first page views resolves in the
//! database, and the losing insert is a successful no-op.

use async_trait::async_trait;
use relay_core::{Error, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use crate::record::UserRecord;
use crate::UserStore;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id                BIGSERIAL PRIMARY KEY,
    content_id        TEXT NOT NULL DEFAULT '',
    external_id       TEXT NOT NULL UNIQUE,
    client_ip_address TEXT NOT NULL DEFAULT '',
    client_user_agent TEXT NOT NULL DEFAULT '',
    fbc               TEXT NOT NULL DEFAULT '',
    fbp               TEXT NOT NULL DEFAULT '',
    country           TEXT NOT NULL DEFAULT '',
    st                TEXT NOT NULL DEFAULT '',
    ct                TEXT NOT NULL DEFAULT '',
    zp                TEXT NOT NULL DEFAULT '',
    first_name        TEXT NOT NULL DEFAULT '',
    last_name         TEXT NOT NULL DEFAULT '',
    email             TEXT NOT NULL DEFAULT '',
    phone             TEXT NOT NULL DEFAULT '',
    created_at        TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const INSERT_USER: &str = r#"
INSERT INTO users (
    content_id, external_id, client_ip_address, client_user_agent,
    fbc, fbp, country, st, ct, zp,
    first_name, last_name, email, phone
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
ON CONFLICT (external_id) DO NOTHING
"#;

const SELECT_USER: &str = r#"
SELECT content_id, external_id, client_ip_address, client_user_agent,
       fbc, fbp, country, st, ct, zp,
       first_name, last_name, email, phone
FROM users
WHERE external_id = $1
"#;

/// Postgres implementation of [`UserStore`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Connect to the database.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| Error::store(format!("connection failed: {e}")))?;

        info!("user store connected");
        Ok(Self { pool })
    }

    /// Create the users table if it does not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::store(format!("schema init failed: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query(SELECT_USER)
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::store(format!("lookup failed: {e}")))?;

        Ok(row.map(|r| UserRecord {
            content_id: r.get("content_id"),
            external_id: r.get("external_id"),
            client_ip_address: r.get("client_ip_address"),
            client_user_agent: r.get("client_user_agent"),
            fbc: r.get("fbc"),
            fbp: r.get("fbp"),
            country: r.get("country"),
            st: r.get("st"),
            ct: r.get("ct"),
            zp: r.get("zp"),
            first_name: r.get("first_name"),
            last_name: r.get("last_name"),
            email: r.get("email"),
            phone: r.get("phone"),
        }))
    }

    async fn ensure_user(&self, record: &UserRecord) -> Result<()> {
        if record.external_id.is_empty() {
            return Ok(());
        }

        let result = sqlx::query(INSERT_USER)
            .bind(&record.content_id)
            .bind(&record.external_id)
            .bind(&record.client_ip_address)
            .bind(&record.client_user_agent)
            .bind(&record.fbc)
            .bind(&record.fbp)
            .bind(&record.country)
            .bind(&record.st)
            .bind(&record.ct)
            .bind(&record.zp)
            .bind(&record.first_name)
            .bind(&record.last_name)
            .bind(&record.email)
            .bind(&record.phone)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::store(format!("insert failed: {e}")))?;

        if result.rows_affected() == 0 {
            debug!(external_id = %record.external_id, "user already tracked, keeping first snapshot");
        }

        Ok(())
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
