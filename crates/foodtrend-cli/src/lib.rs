//! Pipeline wiring shared by the `foodtrend` binary and its integration tests.

pub mod pipeline;
pub mod schedule;
