//! Core infrastructure for testmirror.
//!
//! This crate provides the language-agnostic pieces of the mirror-test
//! engine:
//! - Import-path value type and filesystem mapping
//! - Name/path convention codec (source identity ↔ test identity)
//! - Skeleton text templates for missing tests
//! - Error types shared across the workspace
//! - Content hashing for cache invalidation

pub mod convention;
pub mod error;
pub mod hash;
pub mod path;
pub mod skeleton;
