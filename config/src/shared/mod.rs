mod base;
mod drain;
mod hook;
mod retry;

pub use base::*;
pub use drain::*;
pub use hook::*;
pub use retry::*;
