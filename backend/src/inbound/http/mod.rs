//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod media;
pub mod meetups;
pub mod progress;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use crate::domain::ApiResult;
