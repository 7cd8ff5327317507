//! Tests for the coroutine mechanism
//!
//! Organized by feature area

mod cancel_tests;
mod helpers;
mod lifecycle_tests;
