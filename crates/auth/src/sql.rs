use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::backend::AuthBackend;
use crate::error::AuthError;
use crate::types::{generate_key, AuthLevel, KeyType, KeyUsage};

/// Mirrors `auth/sql.go`'s `SqlAuthProvider`: a `keys` + `method_usages`
/// table pair, master-key short-circuit handled one layer up in
/// [`crate::Authenticator`].
pub struct SqlAuth {
    pool: PgPool,
    key_type: KeyType,
}

impl SqlAuth {
    pub fn new(pool: PgPool, key_type: KeyType) -> Self {
        Self { pool, key_type }
    }

    /// Connects and runs migrations in one step, for callers that don't
    /// already hold a pool for this database.
    pub async fn connect(database_url: &str, key_type: KeyType) -> Result<Self, AuthError> {
        let pool = PgPoolOptions::new().max_connections(5).connect(database_url).await?;
        let auth = Self::new(pool, key_type);
        auth.init().await?;
        Ok(auth)
    }

    pub async fn init(&self) -> Result<(), AuthError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthBackend for SqlAuth {
    async fn resolve(&self, key: &str) -> Result<AuthLevel, AuthError> {
        let found: Option<String> = sqlx::query_scalar("SELECT key FROM keys WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match found {
            Some(_) => Ok(AuthLevel::Basic),
            None => Err(AuthError::InvalidKey),
        }
    }

    async fn register(&self) -> Result<String, AuthError> {
        let key = generate_key(self.key_type);
        sqlx::query("INSERT INTO keys (key) VALUES ($1)")
            .bind(&key)
            .execute(&self.pool)
            .await?;
        Ok(key)
    }

    async fn update_usage(&self, key: &str, delta: &KeyUsage) -> Result<(), AuthError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE keys SET call_count = call_count + $1, last_access = $2, last_ip = $3 WHERE key = $4",
        )
        .bind(delta.requests as i64)
        .bind(delta.last_access)
        .bind(&delta.last_ip)
        .bind(key)
        .execute(&mut *tx)
        .await?;

        for (method, count) in &delta.method_usage {
            sqlx::query(
                r#"
                INSERT INTO method_usages (key, method_name, usage_count)
                VALUES ($1, $2, $3)
                ON CONFLICT (key, method_name)
                DO UPDATE SET usage_count = method_usages.usage_count + EXCLUDED.usage_count
                "#,
            )
            .bind(key)
            .bind(method)
            .bind(*count as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
