use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::alert::ALERT_CAP;
pub use repositories::user::{NewUser, ProvisionError, Role, User};
pub use repositories::worklog::NewWorkLog;

use crate::config::SecurityConfig;
use crate::entities::{alerts, work_logs};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Every pooled connection to an in-memory database would see its own
        // empty schema, so memory URLs get exactly one connection.
        let (max_connections, min_connections) = if db_url.contains(":memory:") {
            (1, 1)
        } else {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn worklog_repo(&self) -> repositories::worklog::WorkLogRepository {
        repositories::worklog::WorkLogRepository::new(self.conn.clone())
    }

    fn alert_repo(&self) -> repositories::alert::AlertRepository {
        repositories::alert::AlertRepository::new(self.conn.clone())
    }

    pub async fn create_user(
        &self,
        user: NewUser<'_>,
        security: &SecurityConfig,
    ) -> Result<User, ProvisionError> {
        self.user_repo().create(user, security).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn add_work_log(&self, entry: NewWorkLog) -> Result<()> {
        self.worklog_repo().add(entry).await
    }

    pub async fn list_work_logs(&self) -> Result<Vec<work_logs::Model>> {
        self.worklog_repo().list_all().await
    }

    pub async fn list_work_logs_for(&self, username: &str) -> Result<Vec<work_logs::Model>> {
        self.worklog_repo().list_for_member(username).await
    }

    pub async fn push_alert(&self, message: &str) -> Result<()> {
        self.alert_repo().push(message).await
    }

    pub async fn recent_alerts(&self) -> Result<Vec<alerts::Model>> {
        self.alert_repo().recent().await
    }
}
