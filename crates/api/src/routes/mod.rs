//! HTTP Routes

pub mod health;
pub mod model;
pub mod predict;
pub mod train;
