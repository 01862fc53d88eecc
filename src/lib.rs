pub mod config;
pub mod dayspec;
pub mod observability;
