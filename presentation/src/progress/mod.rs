//! User-facing progress output

pub mod reporter;
