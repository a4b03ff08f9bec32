// tests/common/mod.rs

#![allow(dead_code)]

pub use checkdag_test_utils::builders;
pub use checkdag_test_utils::init_tracing;
