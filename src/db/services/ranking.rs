//! Pure placement rules for harems and prospects.
//!
//! Everything here is free of I/O so the services can compute positions from
//! what they read inside a transaction, and so the rules can be tested alone.

use std::cmp::Ordering;

use crate::db::entities::prospect;
use crate::db::services::error::ServiceError;

/// Order value for a new harem: one past the owner's highest, starting at 1.
pub fn next_harem_order(current_max: Option<i32>) -> i32 {
    current_max.unwrap_or(0) + 1
}

/// Rank for a prospect appended to a harem: one past the highest, starting at 0.
pub fn next_prospect_rank(current_max: Option<i32>) -> i32 {
    current_max.map_or(0, |max| max + 1)
}

/// Where a moved prospect lands in its target harem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub rank: i32,
    /// Every prospect already in the target harem moves down by one.
    pub shift_existing: bool,
}

/// Hot leads go to the front and push the rest down; everything else is appended.
pub fn plan_move(hot_lead: bool, target_max: Option<i32>) -> Placement {
    if hot_lead {
        Placement {
            rank: 0,
            shift_existing: target_max.is_some(),
        }
    } else {
        Placement {
            rank: next_prospect_rank(target_max),
            shift_existing: false,
        }
    }
}

/// Display order within a harem: hot leads first, then rank, then id.
pub fn display_order(a: &prospect::Model, b: &prospect::Model) -> Ordering {
    b.hot_lead
        .cmp(&a.hot_lead)
        .then_with(|| a.harem_order.cmp(&b.harem_order))
        .then_with(|| a.id.cmp(&b.id))
}

/// Trims `name` and rejects it when absent or blank.
pub fn required_name(name: Option<&str>, message: &str) -> Result<String, ServiceError> {
    match name.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(ServiceError::Validation(message.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn prospect(id: i32, hot_lead: bool, harem_order: i32) -> prospect::Model {
        prospect::Model {
            id,
            harem_id: 1,
            name: format!("p{id}"),
            harem_order,
            hot_lead,
            notes: None,
            time_in_current_harem: Utc::now(),
        }
    }

    #[test]
    fn test_harem_order_starts_at_one() {
        assert_eq!(next_harem_order(None), 1);
        assert_eq!(next_harem_order(Some(1)), 2);
        assert_eq!(next_harem_order(Some(7)), 8);
    }

    #[test]
    fn test_prospect_rank_starts_at_zero() {
        assert_eq!(next_prospect_rank(None), 0);
        assert_eq!(next_prospect_rank(Some(0)), 1);
        assert_eq!(next_prospect_rank(Some(3)), 4);
    }

    #[test]
    fn test_hot_lead_goes_to_front() {
        assert_eq!(
            plan_move(true, Some(1)),
            Placement { rank: 0, shift_existing: true }
        );
        // Nothing to shift in an empty harem.
        assert_eq!(
            plan_move(true, None),
            Placement { rank: 0, shift_existing: false }
        );
    }

    #[test]
    fn test_regular_prospect_is_appended() {
        assert_eq!(
            plan_move(false, None),
            Placement { rank: 0, shift_existing: false }
        );
        assert_eq!(
            plan_move(false, Some(3)),
            Placement { rank: 4, shift_existing: false }
        );
    }

    #[test]
    fn test_display_order_puts_hot_leads_first() {
        let mut prospects = vec![prospect(1, true, 5), prospect(2, false, 0), prospect(3, true, 2)];
        prospects.sort_by(display_order);
        let ids: Vec<i32> = prospects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_display_order_breaks_ties_by_id() {
        let mut prospects = vec![prospect(9, false, 1), prospect(4, false, 1), prospect(6, false, 0)];
        prospects.sort_by(display_order);
        let ids: Vec<i32> = prospects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![6, 4, 9]);
    }

    #[test]
    fn test_required_name() {
        assert_eq!(required_name(Some("  Alice "), "missing").unwrap(), "Alice");
        assert!(matches!(
            required_name(Some("   "), "missing"),
            Err(ServiceError::Validation(msg)) if msg == "missing"
        ));
        assert!(required_name(None, "missing").is_err());
    }
}
