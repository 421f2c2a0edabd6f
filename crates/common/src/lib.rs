//! common - 宿主平台共享模型和工具

pub mod types;
pub mod utils;
pub mod validation;

pub use types::*;
pub use utils::*;
pub use validation::*;
