pub mod logger;

pub use logger::{init, init_stdout};
