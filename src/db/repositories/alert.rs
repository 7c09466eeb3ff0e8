use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::entities::alerts;

/// Maximum number of alerts retained in the feed.
pub const ALERT_CAP: u64 = 50;

pub struct AlertRepository {
    conn: DatabaseConnection,
}

impl AlertRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Append an alert and trim the feed to the cap. Insert and trim share
    /// one transaction, so either both apply or neither does.
    pub async fn push(&self, message: &str) -> Result<()> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to open alert transaction")?;

        let active = alerts::ActiveModel {
            message: Set(message.to_string()),
            created_at: Set(super::timestamp()),
            ..Default::default()
        };

        alerts::Entity::insert(active)
            .exec(&txn)
            .await
            .context("Failed to insert alert")?;

        let total = alerts::Entity::find()
            .count(&txn)
            .await
            .context("Failed to count alerts")?;

        if total > ALERT_CAP {
            let stale: Vec<i64> = alerts::Entity::find()
                .order_by_asc(alerts::Column::Id)
                .limit(total - ALERT_CAP)
                .all(&txn)
                .await
                .context("Failed to find stale alerts")?
                .into_iter()
                .map(|alert| alert.id)
                .collect();

            alerts::Entity::delete_many()
                .filter(alerts::Column::Id.is_in(stale))
                .exec(&txn)
                .await
                .context("Failed to evict stale alerts")?;
        }

        txn.commit()
            .await
            .context("Failed to commit alert transaction")?;

        Ok(())
    }

    /// The retained feed, most recent first.
    pub async fn recent(&self) -> Result<Vec<alerts::Model>> {
        let alerts = alerts::Entity::find()
            .order_by_desc(alerts::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list alerts")?;

        Ok(alerts)
    }
}
