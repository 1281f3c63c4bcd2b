#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use cassanova_backend::db::entities::{harem, prelude::*, prospect, user};
use cassanova_backend::db::schema::create_schema;

/// A fresh in-memory SQLite database with the schema applied.
///
/// A single pooled connection keeps every query on the same in-memory file.
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt).await.expect("connect to in-memory sqlite");
    create_schema(&db).await.expect("create schema");
    db
}

pub async fn insert_user(db: &DatabaseConnection, email: &str) -> user::Model {
    user::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        alias_name: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub async fn insert_harem(db: &DatabaseConnection, user_id: i32, name: &str, order: i32) -> harem::Model {
    harem::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_string()),
        order: Set(order),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert harem")
}

pub async fn insert_prospect(
    db: &DatabaseConnection,
    harem_id: i32,
    name: &str,
    rank: i32,
    hot_lead: bool,
) -> prospect::Model {
    prospect::ActiveModel {
        harem_id: Set(harem_id),
        name: Set(name.to_string()),
        harem_order: Set(rank),
        hot_lead: Set(hot_lead),
        notes: Set(None),
        time_in_current_harem: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert prospect")
}

pub async fn prospect_by_id(db: &DatabaseConnection, id: i32) -> Option<prospect::Model> {
    Prospect::find_by_id(id).one(db).await.expect("load prospect")
}

pub async fn harem_by_id(db: &DatabaseConnection, id: i32) -> Option<harem::Model> {
    Harem::find_by_id(id).one(db).await.expect("load harem")
}

/// `(id, rank)` pairs of a harem's prospects ordered by id.
pub async fn ranks_in(db: &DatabaseConnection, harem_id: i32) -> Vec<(i32, i32)> {
    Prospect::find()
        .filter(prospect::Column::HaremId.eq(harem_id))
        .order_by_asc(prospect::Column::Id)
        .all(db)
        .await
        .expect("load prospects")
        .into_iter()
        .map(|p| (p.id, p.harem_order))
        .collect()
}
