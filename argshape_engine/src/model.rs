/// The cardinality of inputs to match for a rule.
///
/// Inspired by argparse: <https://docs.python.org/3/library/argparse.html#nargs>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nargs {
    /// `N`: Precisely `N` values.
    Precisely(u8),
    /// `?`: Zero or one value.
    ZeroOrOne,
    /// `*`: May be any number of values, including `0`.
    Any,
    /// `+`: At least one value must be specified.
    AtLeastOne,
}

impl std::fmt::Display for Nargs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// What a rule does with the tokens it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Coerce the matched tokens and store them, replacing any previous value.
    Store,
    /// Store `true` when matched (`false` otherwise).
    StoreTrue,
    /// Store `false` when matched (`true` otherwise).
    StoreFalse,
    /// Coerce the matched tokens and append them onto the (default) sequence.
    /// May be matched any number of times.
    Append,
}

impl Action {
    /// Whether this action is a toggle which consumes no value tokens.
    pub fn is_toggle(&self) -> bool {
        matches!(self, Action::StoreTrue | Action::StoreFalse)
    }
}
