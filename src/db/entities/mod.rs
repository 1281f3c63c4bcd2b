//! SeaORM entities mapping the `users`, `harems` and `prospects` tables.

pub mod harem;
pub mod prospect;
pub mod user;

// Prelude module for easy importing of all entities and their related types
pub mod prelude {
    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;
    pub use super::user::ActiveModel as UserActiveModel;
    pub use super::user::Column as UserColumn;

    pub use super::harem::Entity as Harem;
    pub use super::harem::Model as HaremModel;
    pub use super::harem::ActiveModel as HaremActiveModel;
    pub use super::harem::Column as HaremColumn;

    pub use super::prospect::Entity as Prospect;
    pub use super::prospect::Model as ProspectModel;
    pub use super::prospect::ActiveModel as ProspectActiveModel;
    pub use super::prospect::Column as ProspectColumn;
}
