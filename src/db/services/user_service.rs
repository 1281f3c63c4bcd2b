use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::db::entities::{prelude::User, user};

// --- User Service Functions ---

pub async fn find_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}

/// Inserts a user with an already-hashed password.
pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    password_hash: &str,
) -> Result<user::Model, DbErr> {
    user::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        alias_name: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn count_users(db: &DatabaseConnection) -> Result<u64, DbErr> {
    User::find().count(db).await
}
