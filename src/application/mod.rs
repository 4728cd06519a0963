//! Application services layer.

pub mod admin;
pub mod auth;
pub mod error;
pub mod posts;
pub mod render;
pub mod repos;
