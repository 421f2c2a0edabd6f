//! ports - 抽象 trait 层
//!
//! 定义宿主平台与连接器之间的边界接口

mod plugin_executor;

pub use plugin_executor::*;
