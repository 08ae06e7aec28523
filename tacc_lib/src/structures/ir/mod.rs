pub mod cfg;
pub mod ctype;
pub mod op;
pub mod symbols;

pub use cfg::*;
pub use op::*;
pub use symbols::*;
