mod core;
mod rule;

pub use self::core::*;
pub use rule::Rule;
