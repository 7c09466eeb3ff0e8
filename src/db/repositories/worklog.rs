use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::work_logs;

/// A new work entry as accepted from a submission. `team_member` must come
/// from the session identity, never from client input.
#[derive(Debug, Clone, Default)]
pub struct NewWorkLog {
    pub team_member: String,
    pub function: String,
    pub date: Option<String>,
    pub file_number: Option<String>,
    pub status: Option<String>,
    pub tier1_escalation_reason: Option<String>,
    pub im_escalation_reason: Option<String>,
    pub department: Option<String>,
    pub comments: Option<String>,
}

pub struct WorkLogRepository {
    conn: DatabaseConnection,
}

impl WorkLogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert one immutable entry. There is no update or delete.
    pub async fn add(&self, entry: NewWorkLog) -> Result<()> {
        let active = work_logs::ActiveModel {
            team_member: Set(entry.team_member),
            function: Set(entry.function),
            date: Set(entry.date),
            file_number: Set(entry.file_number),
            status: Set(entry.status),
            tier1_escalation_reason: Set(entry.tier1_escalation_reason),
            im_escalation_reason: Set(entry.im_escalation_reason),
            department: Set(entry.department),
            comments: Set(entry.comments),
            created_at: Set(super::timestamp()),
            ..Default::default()
        };

        work_logs::Entity::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert work log")?;

        Ok(())
    }

    /// All entries, newest first.
    pub async fn list_all(&self) -> Result<Vec<work_logs::Model>> {
        let logs = work_logs::Entity::find()
            .order_by_desc(work_logs::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list work logs")?;

        Ok(logs)
    }

    /// One member's entries, newest first.
    pub async fn list_for_member(&self, username: &str) -> Result<Vec<work_logs::Model>> {
        let logs = work_logs::Entity::find()
            .filter(work_logs::Column::TeamMember.eq(username))
            .order_by_desc(work_logs::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list work logs for member")?;

        Ok(logs)
    }
}
