mod base;
mod interface;
mod middleware;
mod printer;

pub(crate) use base::*;
pub(crate) use interface::*;
pub use middleware::GeneralParser;
pub(crate) use printer::*;

pub use base::ConfigError;
