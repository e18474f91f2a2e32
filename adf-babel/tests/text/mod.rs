//! Text format tests

mod render;
