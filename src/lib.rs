//! Cassanova backend: user accounts plus ranked harem/prospect lists over HTTP.

pub mod db;
pub mod server;
pub mod services;
pub mod web;
