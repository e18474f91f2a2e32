//! Markdown format tests
//!
//! Tests for markdown → ADF conversion, checked on the JSON the platform receives.

mod exclusivity;
mod import;
