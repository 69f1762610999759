//! Worker Tests Module
//!
//! State gating, dependency readiness, retry exhaustion and cancellation of
//! single-operation workers.

pub mod worker;
