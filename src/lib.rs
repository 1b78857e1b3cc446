// src/lib.rs

//! Balloon Tracker Library

pub mod error;
pub mod ledger;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
