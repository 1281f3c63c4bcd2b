//! Table bootstrap derived from the entity definitions.
//!
//! This is not a migration tool: it only issues `CREATE TABLE IF NOT EXISTS`
//! and `CREATE INDEX IF NOT EXISTS` for the three tables the service owns.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};
use tracing::info;

use crate::db::entities::prelude::{Harem, Prospect, User};

async fn create_for_entity<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }
    Ok(())
}

/// Creates `users`, `harems` and `prospects` (in foreign-key order) if missing.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_for_entity(db, &schema, User).await?;
    create_for_entity(db, &schema, Harem).await?;
    create_for_entity(db, &schema, Prospect).await?;

    info!("Database schema is in place.");
    Ok(())
}
