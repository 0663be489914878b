use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use klypp_core::notifications::{
    Device, NewDevice, NewNotification, Notification, NotificationRepositoryTrait,
};
use klypp_core::errors::DatabaseError;
use klypp_core::Result;

use super::model::{DeviceDB, NotificationDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{devices, notifications};

/// Inserts a notification on an existing connection. Used by the
/// membership and plan repositories to persist lifecycle notifications in
/// the same transaction as the state change they accompany.
pub(crate) fn insert_notification_in_tx(
    conn: &mut SqliteConnection,
    new_notification: NewNotification,
) -> Result<NotificationDB> {
    let notification_db = NotificationDB::from_new(new_notification);
    diesel::insert_into(notifications::table)
        .values(&notification_db)
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(notification_db)
}

pub struct NotificationRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl NotificationRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        NotificationRepository { pool, writer }
    }
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    fn list_for_user(&self, for_user_id: &str) -> Result<Vec<Notification>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = notifications::table
            .filter(notifications::user_id.eq(for_user_id))
            .order(notifications::created_at.desc())
            .load::<NotificationDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn insert(&self, new_notification: NewNotification) -> Result<Notification> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Notification> {
                insert_notification_in_tx(conn, new_notification).map(Notification::from)
            })
            .await
    }

    async fn mark_read(&self, notification_id: &str, for_user_id: &str) -> Result<Notification> {
        let notification_id = notification_id.to_string();
        let for_user_id = for_user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Notification> {
                let affected = diesel::update(
                    notifications::table
                        .filter(notifications::id.eq(&notification_id))
                        .filter(notifications::user_id.eq(&for_user_id)),
                )
                .set(notifications::is_read.eq(true))
                .execute(conn)
                .map_err(StorageError::from)?;

                if affected == 0 {
                    return Err(DatabaseError::NotFound(format!(
                        "Notification with id {} not found",
                        notification_id
                    ))
                    .into());
                }

                let row = notifications::table
                    .find(&notification_id)
                    .first::<NotificationDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn mark_all_read(&self, for_user_id: &str) -> Result<usize> {
        let for_user_id = for_user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::update(
                    notifications::table
                        .filter(notifications::user_id.eq(&for_user_id))
                        .filter(notifications::is_read.eq(false)),
                )
                .set(notifications::is_read.eq(true))
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }

    async fn register_device(&self, for_user_id: &str, new_device: NewDevice) -> Result<Device> {
        let device_db = DeviceDB::from_new(for_user_id, new_device);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Device> {
                // Re-registering an existing token moves it to the caller.
                diesel::insert_into(devices::table)
                    .values(&device_db)
                    .on_conflict(devices::token)
                    .do_update()
                    .set((
                        devices::user_id.eq(&device_db.user_id),
                        devices::platform.eq(&device_db.platform),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let row = devices::table
                    .filter(devices::token.eq(&device_db.token))
                    .first::<DeviceDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    fn list_device_tokens(&self, for_user_id: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        let tokens = devices::table
            .filter(devices::user_id.eq(for_user_id))
            .select(devices::token)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(tokens)
    }
}
