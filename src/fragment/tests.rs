//! Unit tests for the packet codec.
//!
//! Tests are split into focused submodules to keep each file short and easy
//! to navigate.

mod header_series_tests;
