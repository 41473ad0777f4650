//! Test suite for tripboard
//!
//! This module organizes all tests

#[macro_use]
pub mod common;
#[cfg(feature = "ssr")]
pub mod integration;
