//! # Biorhythm Engine
//!
//! Biorhythm calculation and analytics.
//!
//! This crate generates daily biorhythm series (physical, emotional and
//! intellectual sinusoids) for people, stores them as calculation runs,
//! and aggregates the stored points into per-person, per-range and global
//! statistics that can be frozen as analysis records.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`algorithms`]: Pure engine (cycle function, series generator, statistics, analysis freezing)
//! - [`models`]: Domain entities and id newtypes
//! - [`db`]: Repository pattern, in-memory store, factory and checksums
//! - [`services`]: Orchestration over a repository
//! - [`routes`]: Request and response shapes for each operation
//! - [`api`]: Consolidated re-exports of the public types
//! - [`config`]: TOML engine configuration
//! - [`error`]: Service-level error type
//!
//! ## Example
//!
//! ```
//! use biorhythm_engine::algorithms::generate;
//! use chrono::NaiveDate;
//!
//! let birth = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//!
//! let series = generate(birth, start, end).unwrap();
//! assert_eq!(series.len(), 31);
//! ```

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
