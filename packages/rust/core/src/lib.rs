//! Site build orchestration for the Bestium docs.
//!
//! This crate ties together version resolution, content scanning, markdown
//! rendering and navigation into the end-to-end `build_site` workflow.

pub mod layout;
pub mod nav;
pub mod pipeline;
pub mod scan;
