pub mod distance;
pub mod error;
pub mod plot;
pub mod sweep;
pub mod swissroll;
mod utils;

pub use error::{ManifoldError, Result};
pub use swissroll::{make_swissroll, HoleBoundary, SwissRoll, SwissRollConfig};
pub use utils::{min_max, Layout};
