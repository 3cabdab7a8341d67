//! Query stores the engine can read from

mod memory;

pub use memory::MemoryStore;
