//! Folio server library.
//!
//! This library provides the core functionality for the portfolio API
//! server: database operations, identity verification, webhook handling,
//! image storage, and the HTTP endpoint handlers.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
