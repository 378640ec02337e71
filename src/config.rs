// ABOUTME: Crate-level constants

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
