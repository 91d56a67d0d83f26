pub mod bag;
pub mod columns;
pub mod error;

pub use bag::EventBag;
pub use columns::{ColumnSink, MemoryColumns};
pub use error::{Error, Result};
