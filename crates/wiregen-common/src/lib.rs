//! # wiregen-common
//!
//! Shared identifier types, error definitions, configuration models, and
//! constants used across the wiregen workspace.
//!
//! This crate is the leaf of the workspace: it depends on no other internal
//! crate and provides the primitives that the core resolution engine and the
//! external collaborators (declaration extraction, code emission) build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
