pub mod search;

pub use search::{FixIndex, Nearest};
