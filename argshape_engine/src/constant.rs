pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit.";
pub(crate) const FLAG_PREFIX: char = '-';
pub(crate) const OPTIONS_TERMINATOR: &str = "--";
