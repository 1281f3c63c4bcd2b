//! Prospect (ranked item) operations, including moves between harems.
//!
//! A prospect belongs to whoever owns its harem. Writes that depend on the
//! ranks already present in a harem lock that harem's row first, so two
//! requests targeting the same harem are applied one after the other.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::db::entities::{harem, prelude::*, prospect};
use crate::db::services::error::ServiceError;
use crate::db::services::ranking;
use crate::web::models::harem_models::{ProspectRankUpdate, UpdateProspectRequest};

const PROSPECT_NOT_FOUND: &str = "Prospect not found";
const PROSPECT_NOT_OWNED: &str = "Unauthorized: Prospect does not belong to you";

pub struct ProspectService {
    db: DatabaseConnection,
}

impl ProspectService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends a new, non-hot prospect to the end of `harem_id`.
    pub async fn create(
        &self,
        user_id: i32,
        name: Option<&str>,
        harem_id: Option<i32>,
    ) -> Result<prospect::Model, ServiceError> {
        let name = ranking::required_name(name, "Prospect name is required")?;
        let harem_id = harem_id
            .ok_or_else(|| ServiceError::Validation("Valid harem ID is required".to_string()))?;

        let txn = self.db.begin().await?;

        lock_owned_harem(&txn, user_id, harem_id, "Unauthorized: Harem does not belong to you")
            .await?;
        let current_max = max_rank_in(&txn, harem_id).await?;

        let created = prospect::ActiveModel {
            harem_id: Set(harem_id),
            name: Set(name),
            harem_order: Set(ranking::next_prospect_rank(current_max)),
            hot_lead: Set(false),
            notes: Set(None),
            time_in_current_harem: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(user_id, harem_id, prospect_id = created.id, "Prospect created.");
        Ok(created)
    }

    pub async fn update(
        &self,
        user_id: i32,
        prospect_id: i32,
        changes: UpdateProspectRequest,
    ) -> Result<prospect::Model, ServiceError> {
        let changes = ProspectChanges::validate(changes)?;

        let prospect = self.find_owned(user_id, prospect_id).await?;

        let mut active: prospect::ActiveModel = prospect.clone().into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(hot_lead) = changes.hot_lead {
            active.hot_lead = Set(hot_lead);
        }
        if let Some(notes) = changes.notes {
            active.notes = Set(notes);
        }

        if !active.is_changed() {
            return Ok(prospect);
        }
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete(&self, user_id: i32, prospect_id: i32) -> Result<(), ServiceError> {
        self.find_owned(user_id, prospect_id).await?;
        Prospect::delete_by_id(prospect_id).exec(&self.db).await?;

        info!(user_id, prospect_id, "Prospect deleted.");
        Ok(())
    }

    /// Moves a prospect into `new_harem_id`.
    ///
    /// A hot lead takes rank 0 and every prospect already in the target harem
    /// moves down one rank; any other prospect is appended after the current
    /// last one. The shift and the move commit together.
    pub async fn move_to_harem(
        &self,
        user_id: i32,
        prospect_id: Option<i32>,
        new_harem_id: Option<i32>,
    ) -> Result<prospect::Model, ServiceError> {
        let (Some(prospect_id), Some(new_harem_id)) = (prospect_id, new_harem_id) else {
            return Err(ServiceError::Validation(
                "Prospect ID and new harem ID required".to_string(),
            ));
        };

        let txn = self.db.begin().await?;

        let prospect = match Prospect::find_by_id(prospect_id)
            .find_also_related(Harem)
            .one(&txn)
            .await?
        {
            Some((prospect, Some(source))) if source.user_id == user_id => prospect,
            _ => return Err(ServiceError::Forbidden("Unauthorized".to_string())),
        };

        lock_owned_harem(&txn, user_id, new_harem_id, "Unauthorized").await?;

        let placement = ranking::plan_move(prospect.hot_lead, max_rank_in(&txn, new_harem_id).await?);

        if placement.shift_existing {
            Prospect::update_many()
                .col_expr(
                    prospect::Column::HaremOrder,
                    Expr::col(prospect::Column::HaremOrder).add(1),
                )
                .filter(prospect::Column::HaremId.eq(new_harem_id))
                .exec(&txn)
                .await?;
        }

        let source_harem_id = prospect.harem_id;
        let mut active: prospect::ActiveModel = prospect.into();
        active.harem_id = Set(new_harem_id);
        active.harem_order = Set(placement.rank);
        active.time_in_current_harem = Set(Utc::now());
        let moved = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            user_id,
            prospect_id,
            from = source_harem_id,
            to = new_harem_id,
            rank = placement.rank,
            "Prospect moved."
        );
        Ok(moved)
    }

    /// Applies every rank update or none of them.
    pub async fn reorder(
        &self,
        user_id: i32,
        updates: &[ProspectRankUpdate],
    ) -> Result<(), ServiceError> {
        if updates.is_empty() {
            return Err(ServiceError::Validation("Invalid prospects data".to_string()));
        }

        let ranks: Vec<(i32, i32)> = updates
            .iter()
            .map(|u| u.id.zip(u.harem_order))
            .collect::<Option<_>>()
            .ok_or_else(|| {
                ServiceError::Validation("Each prospect must have id and haremOrder".to_string())
            })?;

        let prospect_ids: Vec<i32> = ranks.iter().map(|(id, _)| *id).collect();

        let txn = self.db.begin().await?;

        let found = Prospect::find()
            .filter(prospect::Column::Id.is_in(prospect_ids))
            .find_also_related(Harem)
            .all(&txn)
            .await?;

        if found.len() != ranks.len() {
            return Err(ServiceError::NotFound("Some prospects not found".to_string()));
        }

        let all_owned = found
            .iter()
            .all(|(_, harem)| harem.as_ref().is_some_and(|h| h.user_id == user_id));
        if !all_owned {
            return Err(ServiceError::Forbidden(
                "Unauthorized: Some prospects do not belong to you".to_string(),
            ));
        }

        for (id, rank) in &ranks {
            Prospect::update_many()
                .col_expr(prospect::Column::HaremOrder, Expr::value(*rank))
                .filter(prospect::Column::Id.eq(*id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        debug!(user_id, count = ranks.len(), "Prospects reordered.");
        Ok(())
    }

    async fn find_owned(
        &self,
        user_id: i32,
        prospect_id: i32,
    ) -> Result<prospect::Model, ServiceError> {
        let (prospect, harem) = Prospect::find_by_id(prospect_id)
            .find_also_related(Harem)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(PROSPECT_NOT_FOUND.to_string()))?;

        match harem {
            Some(harem) if harem.user_id == user_id => Ok(prospect),
            _ => Err(ServiceError::Forbidden(PROSPECT_NOT_OWNED.to_string())),
        }
    }
}

/// Checked form of an update request. `notes: Some(None)` clears the notes.
#[derive(Debug, Default, PartialEq)]
struct ProspectChanges {
    name: Option<String>,
    hot_lead: Option<bool>,
    notes: Option<Option<String>>,
}

impl ProspectChanges {
    fn validate(req: UpdateProspectRequest) -> Result<Self, ServiceError> {
        let name = match req.name {
            None => None,
            Some(Value::String(name)) => Some(ranking::required_name(
                Some(&name),
                "Prospect name must be a non-empty string",
            )?),
            Some(_) => {
                return Err(ServiceError::Validation(
                    "Prospect name must be a non-empty string".to_string(),
                ))
            }
        };

        let hot_lead = match req.hot_lead {
            None => None,
            Some(Value::Bool(hot_lead)) => Some(hot_lead),
            Some(_) => {
                return Err(ServiceError::Validation(
                    "Hot lead must be a boolean value".to_string(),
                ))
            }
        };

        let notes = match req.notes {
            None => None,
            Some(Value::Null) => Some(None),
            Some(Value::String(notes)) => Some(Some(notes)),
            Some(_) => {
                return Err(ServiceError::Validation(
                    "Notes must be a string or null".to_string(),
                ))
            }
        };

        Ok(Self { name, hot_lead, notes })
    }
}

/// Locks `harem_id` for the rest of the transaction. A missing harem and a
/// harem owned by someone else are both reported as `Forbidden`.
async fn lock_owned_harem(
    txn: &DatabaseTransaction,
    user_id: i32,
    harem_id: i32,
    message: &str,
) -> Result<harem::Model, ServiceError> {
    match Harem::find_by_id(harem_id).lock_exclusive().one(txn).await? {
        Some(harem) if harem.user_id == user_id => Ok(harem),
        _ => Err(ServiceError::Forbidden(message.to_string())),
    }
}

async fn max_rank_in(txn: &DatabaseTransaction, harem_id: i32) -> Result<Option<i32>, ServiceError> {
    Ok(Prospect::find()
        .filter(prospect::Column::HaremId.eq(harem_id))
        .order_by_desc(prospect::Column::HaremOrder)
        .one(txn)
        .await?
        .map(|p| p.harem_order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: serde_json::Value) -> UpdateProspectRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_missing_fields_change_nothing() {
        let changes = ProspectChanges::validate(request(json!({}))).unwrap();
        assert_eq!(changes, ProspectChanges::default());
    }

    #[test]
    fn test_null_notes_clear_and_name_is_trimmed() {
        let changes =
            ProspectChanges::validate(request(json!({ "name": " Sam ", "notes": null }))).unwrap();
        assert_eq!(changes.name.as_deref(), Some("Sam"));
        assert_eq!(changes.notes, Some(None));
        assert_eq!(changes.hot_lead, None);
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        let cases = [
            (json!({ "hotLead": null }), "Hot lead must be a boolean value"),
            (json!({ "hotLead": "yes" }), "Hot lead must be a boolean value"),
            (json!({ "name": null }), "Prospect name must be a non-empty string"),
            (json!({ "name": 7 }), "Prospect name must be a non-empty string"),
            (json!({ "name": "  " }), "Prospect name must be a non-empty string"),
            (json!({ "notes": 3 }), "Notes must be a string or null"),
        ];
        for (body, expected) in cases {
            match ProspectChanges::validate(request(body.clone())) {
                Err(ServiceError::Validation(msg)) => assert_eq!(msg, expected, "body: {body}"),
                other => panic!("expected validation error for {body}, got {other:?}"),
            }
        }
    }
}
