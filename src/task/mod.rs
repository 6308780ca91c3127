pub mod manager;
pub mod registry;
pub mod types;


pub use manager::*;
pub use registry::*;
pub use types::*;
