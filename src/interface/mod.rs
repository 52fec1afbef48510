//! Interface layer
//! CLI 파싱과 composition root.

pub mod cli;
pub mod composition;
