//! Command handlers

pub mod auth;
pub mod config;
pub mod link;
pub mod shared;
pub mod status;
pub mod tag;
