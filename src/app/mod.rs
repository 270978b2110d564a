mod context;
mod error;

pub use context::AppContext;
pub use error::{EksiError, Result};
