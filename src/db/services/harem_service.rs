//! Harem (ranked list) operations.
//!
//! Ownership is checked by loading the harem and comparing `user_id`, so a
//! missing harem (`NotFound`) and somebody else's harem (`Forbidden`) stay
//! distinguishable. Order values are computed inside the same transaction as
//! the write that depends on them.

use std::collections::HashMap;

use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::db::entities::{harem, prelude::*, prospect};
use crate::db::services::error::ServiceError;
use crate::db::services::ranking;
use crate::web::models::harem_models::{HaremOrderUpdate, HaremProspect, HaremWithProspects};

const HAREM_NOT_FOUND: &str = "Harem not found";
const HAREM_NOT_OWNED: &str = "Unauthorized: Harem does not belong to you";

pub struct HaremService {
    db: DatabaseConnection,
}

impl HaremService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All harems of `user_id` by `order`, each with its prospects in display order.
    pub async fn list_for_owner(
        &self,
        user_id: i32,
    ) -> Result<Vec<HaremWithProspects>, ServiceError> {
        let harems = Harem::find()
            .filter(harem::Column::UserId.eq(user_id))
            .order_by_asc(harem::Column::Order)
            .order_by_asc(harem::Column::Id)
            .all(&self.db)
            .await?;

        if harems.is_empty() {
            return Ok(Vec::new());
        }

        let harem_ids: Vec<i32> = harems.iter().map(|h| h.id).collect();
        let mut prospects = Prospect::find()
            .filter(prospect::Column::HaremId.is_in(harem_ids))
            .all(&self.db)
            .await?;
        prospects.sort_by(ranking::display_order);

        let mut by_harem: HashMap<i32, Vec<HaremProspect>> = HashMap::new();
        for prospect in prospects {
            by_harem
                .entry(prospect.harem_id)
                .or_default()
                .push(prospect.into());
        }

        Ok(harems
            .into_iter()
            .map(|harem| {
                let prospects = by_harem.remove(&harem.id).unwrap_or_default();
                HaremWithProspects::new(harem, prospects)
            })
            .collect())
    }

    pub async fn create(
        &self,
        user_id: i32,
        name: Option<&str>,
    ) -> Result<harem::Model, ServiceError> {
        let name = ranking::required_name(name, "Harem name is required")?;

        let txn = self.db.begin().await?;

        // Locking the owner row serializes concurrent creates for the same user.
        User::find_by_id(user_id).lock_exclusive().one(&txn).await?;

        let current_max = Harem::find()
            .filter(harem::Column::UserId.eq(user_id))
            .order_by_desc(harem::Column::Order)
            .one(&txn)
            .await?
            .map(|h| h.order);

        let created = harem::ActiveModel {
            user_id: Set(user_id),
            name: Set(name),
            order: Set(ranking::next_harem_order(current_max)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(user_id, harem_id = created.id, order = created.order, "Harem created.");
        Ok(created)
    }

    pub async fn rename(
        &self,
        user_id: i32,
        harem_id: i32,
        name: Option<&str>,
    ) -> Result<harem::Model, ServiceError> {
        let name = ranking::required_name(name, "Harem name is required")?;

        let harem = self.find_owned(user_id, harem_id).await?;

        let mut active: harem::ActiveModel = harem.into();
        active.name = Set(name);
        Ok(active.update(&self.db).await?)
    }

    /// Deletes an empty harem. Harems that still hold prospects are refused.
    pub async fn delete(&self, user_id: i32, harem_id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let harem = Harem::find_by_id(harem_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(HAREM_NOT_FOUND.to_string()))?;

        if harem.user_id != user_id {
            return Err(ServiceError::Forbidden(HAREM_NOT_OWNED.to_string()));
        }

        let prospect_count = Prospect::find()
            .filter(prospect::Column::HaremId.eq(harem_id))
            .count(&txn)
            .await?;

        if prospect_count > 0 {
            return Err(ServiceError::Validation(
                "Harem must be empty before being deleted".to_string(),
            ));
        }

        Harem::delete_by_id(harem_id).exec(&txn).await?;
        txn.commit().await?;

        info!(user_id, harem_id, "Harem deleted.");
        Ok(())
    }

    /// Applies every order update or none of them.
    pub async fn reorder(
        &self,
        user_id: i32,
        updates: &[HaremOrderUpdate],
    ) -> Result<(), ServiceError> {
        if updates.is_empty() {
            return Err(ServiceError::Validation("Invalid harems data".to_string()));
        }

        let harem_ids: Vec<i32> = updates.iter().map(|u| u.id).collect();

        let txn = self.db.begin().await?;

        let owned = Harem::find()
            .filter(harem::Column::Id.is_in(harem_ids))
            .filter(harem::Column::UserId.eq(user_id))
            .count(&txn)
            .await?;

        // Also trips on duplicate ids, which cannot be applied unambiguously.
        if owned != updates.len() as u64 {
            return Err(ServiceError::Forbidden(
                "Unauthorized: Some harems do not belong to you".to_string(),
            ));
        }

        for update in updates {
            Harem::update_many()
                .col_expr(harem::Column::Order, Expr::value(update.order))
                .filter(harem::Column::Id.eq(update.id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        debug!(user_id, count = updates.len(), "Harems reordered.");
        Ok(())
    }

    async fn find_owned(&self, user_id: i32, harem_id: i32) -> Result<harem::Model, ServiceError> {
        let harem = Harem::find_by_id(harem_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(HAREM_NOT_FOUND.to_string()))?;

        if harem.user_id != user_id {
            return Err(ServiceError::Forbidden(HAREM_NOT_OWNED.to_string()));
        }
        Ok(harem)
    }
}
