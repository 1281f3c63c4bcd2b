use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::db::entities::{harem, prospect};

#[derive(Debug, Deserialize)]
pub struct HaremNameRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HaremOrderUpdate {
    pub id: i32,
    pub order: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProspectRequest {
    pub name: Option<String>,
    pub harem_id: Option<i32>,
}

/// Partial update: fields left out of the request are not touched.
///
/// Each field keeps the raw JSON value so that an explicit `null` (which
/// clears `notes`) stays distinct from an absent key, and so that values of
/// the wrong type are reported by the service with a field-specific message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProspectRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub hot_lead: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Value>,
}

// Only called for keys that appear in the body; `null` becomes `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveProspectRequest {
    pub prospect_id: Option<i32>,
    pub new_harem_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectRankUpdate {
    pub id: Option<i32>,
    pub harem_order: Option<i32>,
}

/// A prospect as embedded in its harem; the harem id is implied by the parent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HaremProspect {
    pub id: i32,
    pub name: String,
    pub harem_order: i32,
    pub hot_lead: bool,
    pub notes: Option<String>,
    pub time_in_current_harem: DateTime<Utc>,
}

impl From<prospect::Model> for HaremProspect {
    fn from(model: prospect::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            harem_order: model.harem_order,
            hot_lead: model.hot_lead,
            notes: model.notes,
            time_in_current_harem: model.time_in_current_harem,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HaremWithProspects {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub order: i32,
    pub prospects: Vec<HaremProspect>,
}

impl HaremWithProspects {
    pub fn new(model: harem::Model, prospects: Vec<HaremProspect>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            order: model.order,
            prospects,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_keeps_null_apart_from_missing() {
        let req: UpdateProspectRequest =
            serde_json::from_str(r#"{"notes": null, "hotLead": "yes"}"#).unwrap();
        assert_eq!(req.notes, Some(Value::Null));
        assert_eq!(req.hot_lead, Some(Value::String("yes".to_string())));
        assert!(req.name.is_none());
    }
}
