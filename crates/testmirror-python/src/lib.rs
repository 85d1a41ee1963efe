//! Python mirror-test engine for testmirror.
//!
//! This crate maintains a structural correspondence between a Python
//! source tree and its `tests` tree:
//! - Source-text introspection (functions, classes, methods, in
//!   definition order)
//! - Untested-entity diffing between a source module and its mirrored
//!   test module
//! - Non-destructive textual merging of skeleton stubs into existing test
//!   modules
//! - The mirror orchestrator that drives the whole pass and persists
//!   results

pub mod diff;
pub mod files;
pub mod introspect;
pub mod merge;
pub mod mirror;
pub mod model;
