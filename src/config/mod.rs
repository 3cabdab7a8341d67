//! Engine configuration loading

mod loader;

pub use loader::{init_config, load_config};
