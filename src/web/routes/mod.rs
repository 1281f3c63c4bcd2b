pub mod account_routes;
pub mod harem_routes;
pub mod prospect_routes;
