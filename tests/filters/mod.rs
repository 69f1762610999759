//! Filter Tests Module
//!
//! Rendering of individual filters and their composition across dialects.

pub mod composition;
pub mod status;
