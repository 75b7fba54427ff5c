//! Nutrition Tracker (nutrack) Library
//!
//! Daily food, weight and step tracking with a persistent catalog and a
//! seven-day dashboard.

pub mod build_info;
pub mod config;
pub mod db;
pub mod lookup;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod store;
pub mod tools;
pub mod tracker;
