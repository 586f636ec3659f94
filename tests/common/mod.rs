//! Consolidated test utilities for app-preload
//!
//! This module provides unified testing utilities for integration tests,
//! built around real application trees in temporary directories.

pub mod assertions;
pub mod fixtures;
