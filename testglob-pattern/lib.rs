mod compile;
mod error;
mod set;

pub use compile::*;
pub use error::*;
pub use set::*;
