//! Core business logic module
//!
//! This module contains the build orchestration engine and the logic behind
//! every granite command.
//!
//! # Submodules
//!
//! - [`workspace`] - Workspace config parsing and the package catalog
//! - [`resolver`] - Dependency graph and build-order resolution
//! - [`schedule`] - Partitioning the build order into parallel stages
//! - [`fingerprint`] - Package content fingerprinting
//! - [`cache`] - Persisted fingerprint store
//! - [`dirty`] - Change detection and dirty propagation
//! - [`executor`] - Single-package build execution
//! - [`runner`] - Stage-by-stage run coordination
//! - [`tree`] - Dependency graph visualization
//! - [`analyze`] - Workspace health analysis
//! - [`scaffold`] - Workspace and package scaffolding
//! - [`import`] - Importing packages from external sources

pub mod analyze;
pub mod cache;
pub mod dirty;
pub mod executor;
pub mod fingerprint;
pub mod import;
pub mod resolver;
pub mod runner;
pub mod scaffold;
pub mod schedule;
pub mod tree;
pub mod workspace;
