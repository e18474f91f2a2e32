//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the ADF tree and text representations.

pub mod icons;
pub mod json;
pub mod markdown;
pub mod text;
pub mod treeviz;

pub use json::AdfJsonFormat;
pub use markdown::MarkdownFormat;
pub use text::TextFormat;
pub use treeviz::{TreevizFormat, TreevizOptions};
