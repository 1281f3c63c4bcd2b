use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prospects")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub harem_id: i32,
    pub name: String,
    /// Rank inside the owning harem. Not required to be gapless.
    pub harem_order: i32,
    pub hot_lead: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub time_in_current_harem: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // Restrict: a harem has to be emptied explicitly before it can go.
    #[sea_orm(
        belongs_to = "super::harem::Entity",
        from = "Column::HaremId",
        to = "super::harem::Column::Id",
        on_delete = "Restrict",
        on_update = "Cascade"
    )]
    Harem,
}

impl Related<super::harem::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Harem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
