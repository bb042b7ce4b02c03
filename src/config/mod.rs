pub mod wire_config;

pub use wire_config::{DefaultsPolicy, WireConfig};
