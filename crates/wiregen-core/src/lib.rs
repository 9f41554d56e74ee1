//! # wiregen-core
//!
//! Parser and resolution engine for wiring comments.
//!
//! Handles:
//! - **Parser**: Tag scanning and recursive-descent parsing of command text.
//! - **Commands**: Interpretation of parsed trees into the wiring command set.
//! - **Definitions**: Typed container and dependency declarations.
//! - **Collections**: Injectable and container indexes over source files.
//! - **Graph**: Dependency graph construction and cycle detection.
//! - **Resolver**: Per-container dependency classification and resolution.

pub mod collections;
pub mod commands;
pub mod definitions;
pub mod error;
pub mod graph;
pub mod injectable;
pub mod parser;
pub mod resolver;
