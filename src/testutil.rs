pub mod core;
pub mod format;
pub mod matchers;
