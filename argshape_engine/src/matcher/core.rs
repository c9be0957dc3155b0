use std::collections::{HashMap, VecDeque};
use thiserror::Error;

use crate::constant::*;
use crate::matcher::model::*;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TokenMatcherError {
    #[error("Cannot duplicate the parameter '{0}'.")]
    DuplicateName(String),

    #[error("Cannot duplicate the option '--{0}'.")]
    DuplicateOption(String),

    #[error("Cannot duplicate the short option '-{0}'.")]
    DuplicateShortOption(char),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum MatchError {
    #[error("Not enough tokens provided to parameter '{0}'.")]
    Undercomplete(String),

    #[error("Too many tokens provided to parameter '{0}'.")]
    Overcomplete(String),

    #[error("Unrecognized argument '{0}'.")]
    ArgumentsExhausted(String),

    #[error("Option '--{0}' does not exist.")]
    InvalidOption(String),

    #[error("Short option '-{0}' does not exist.")]
    InvalidShortOption(char),
}

impl From<CloseError> for MatchError {
    fn from(error: CloseError) -> Self {
        match error {
            CloseError::TooFewValues { name, .. } => MatchError::Undercomplete(name),
            CloseError::TooManyValues { name, .. } => MatchError::Overcomplete(name),
        }
    }
}

/// Aligns raw tokens with the options and arguments they belong to.
///
/// Options may be matched any number of times; each occurrence produces its own `MatchTokens`.
/// Arguments are matched in order, each consuming tokens until its bound is exhausted or an option interrupts it.
#[derive(Debug)]
pub(crate) struct TokenMatcher {
    option_bounds: HashMap<String, Bound>,
    long_options: HashMap<String, String>,
    short_options: HashMap<char, String>,
    arguments: VecDeque<ArgumentConfig>,
    numeric_shorts: bool,
    terminated: bool,
    fed: usize,
    matches: Vec<MatchTokens>,
    buffer: Option<MatchBuffer>,
}

impl TokenMatcher {
    pub(crate) fn new(
        options: Vec<OptionConfig>,
        arguments: VecDeque<ArgumentConfig>,
    ) -> Result<Self, TokenMatcherError> {
        let mut option_bounds = HashMap::default();
        let mut long_options = HashMap::default();
        let mut short_options = HashMap::default();

        for option_config in options.into_iter() {
            if option_bounds
                .insert(option_config.name().to_string(), option_config.bound())
                .is_some()
            {
                return Err(TokenMatcherError::DuplicateName(
                    option_config.name().to_string(),
                ));
            }

            for long in option_config.longs() {
                if long_options
                    .insert(long.clone(), option_config.name().to_string())
                    .is_some()
                {
                    return Err(TokenMatcherError::DuplicateOption(long.clone()));
                }
            }

            for short in option_config.shorts() {
                if short_options
                    .insert(*short, option_config.name().to_string())
                    .is_some()
                {
                    return Err(TokenMatcherError::DuplicateShortOption(*short));
                }
            }
        }

        for argument_config in &arguments {
            if option_bounds.contains_key(argument_config.name()) {
                return Err(TokenMatcherError::DuplicateName(
                    argument_config.name().to_string(),
                ));
            }
        }

        let numeric_shorts = short_options.keys().any(char::is_ascii_digit);

        Ok(Self {
            option_bounds,
            long_options,
            short_options,
            arguments,
            numeric_shorts,
            terminated: false,
            fed: 0,
            matches: Vec::default(),
            buffer: None,
        })
    }

    pub(crate) fn feed(&mut self, token: &str) -> Result<(), MatchError> {
        // 1. After '--', every token is a value.
        // 2. Negative numbers (ex: -1, -.5) are values, unless a short option is itself a digit.
        // 3. Find a 'long' flag, such as:
        //  --initial
        //  --initial ..
        //  --initial=..
        // 4. Find 'short' flag(s), such as (both -i and -v are example short flags):
        //  -i
        //  -i ..
        //  -i=..
        //  -vi ..
        //  -vi=..
        // 5. Match against an argument.
        let result = if self.terminated {
            self.match_argument(token)
        } else if token == OPTIONS_TERMINATOR {
            self.terminated = true;
            self.close_option()
        } else if token == "-" || (!self.numeric_shorts && is_negative_number(token)) {
            self.match_argument(token)
        } else if let Some(token) = token.strip_prefix(OPTIONS_TERMINATOR) {
            self.match_option(split_equals_delimiter(token))
        } else if let Some(token) = token.strip_prefix(FLAG_PREFIX) {
            self.match_option_short(split_equals_delimiter(token))
        } else {
            self.match_argument(token)
        };

        self.fed += token.len();
        result
    }

    fn match_argument(&mut self, token: &str) -> Result<(), MatchError> {
        let mut match_buffer = match self.buffer.take() {
            Some(match_buffer) => {
                if match_buffer.is_open() {
                    match_buffer
                } else {
                    // Flip to the next argument
                    let match_tokens = match_buffer.close().expect(
                        "internal error - by definition, a non-open buffer must be able to close",
                    );
                    self.matches.push(match_tokens);
                    self.next_argument(token)?
                }
            }
            None => {
                // Flip to the next argument.
                self.next_argument(token)?
            }
        };

        match_buffer.push(self.fed, token.to_string());

        if self.buffer.replace(match_buffer).is_some() {
            unreachable!("internal error - the buffer is expected to be None");
        }

        Ok(())
    }

    fn next_argument(&mut self, token: &str) -> Result<MatchBuffer, MatchError> {
        match self.arguments.pop_front() {
            Some(argument_config) => Ok(MatchBuffer::new(
                argument_config.name(),
                argument_config.bound(),
            )),
            None => Err(MatchError::ArgumentsExhausted(token.to_string())),
        }
    }

    fn match_option(
        &mut self,
        (option_name, single_argument): (&str, Option<&str>),
    ) -> Result<(), MatchError> {
        let name = match self.long_options.get(option_name) {
            Some(name) => name.clone(),
            None => return Err(MatchError::InvalidOption(option_name.to_string())),
        };
        let mut match_buffer = MatchBuffer::new(name, self.bound_of(option_name));

        match single_argument {
            Some(value) => {
                // The 3 comes from the option specifier '--' and argument specifier '='.
                match_buffer.push(self.fed + option_name.len() + 3, value.to_string());
                self.update_buffer(None)?;

                // Options using k=v syntax cannot follow up with more values afterwards.
                let match_tokens = match_buffer.close()?;
                self.matches.push(match_tokens);
                Ok(())
            }
            None => self.update_buffer(Some(match_buffer)),
        }
    }

    fn match_option_short(
        &mut self,
        (short_option_name, single_argument): (&str, Option<&str>),
    ) -> Result<(), MatchError> {
        self.update_buffer(None)?;
        let cluster_length = short_option_name.chars().count();

        for (index, single) in short_option_name.chars().enumerate() {
            let name = match self.short_options.get(&single) {
                Some(name) => name.clone(),
                None => return Err(MatchError::InvalidShortOption(single)),
            };
            let bound = *self
                .option_bounds
                .get(&name)
                .expect("internal error - mis-aligned short option.");
            let mut match_buffer = MatchBuffer::new(name, bound);

            // If this is the final character from the short option token (the variable 'short_option_name').
            if index + 1 == cluster_length {
                // Only the final option may accept values.
                match single_argument {
                    // If an equals delimited value was specified, use it.
                    Some(value) => {
                        // The 2 comes from the short option specifier '-' and argument specifier '='.
                        match_buffer
                            .push(self.fed + short_option_name.len() + 2, value.to_string());

                        // Options using k=v syntax cannot follow up with more values afterwards.
                        let match_tokens = match_buffer.close()?;
                        self.matches.push(match_tokens);
                    }
                    // If no equals delimited value was specified, allow the values to be fed as subsequent tokens.
                    None => {
                        self.update_buffer(Some(match_buffer))?;
                    }
                };
            } else {
                // All characters in the head of the short option token (the variable 'short_option_name') must allow no values.
                let match_tokens = match_buffer.close()?;
                self.matches.push(match_tokens);
            }
        }

        Ok(())
    }

    fn bound_of(&self, long: &str) -> Bound {
        let name = self
            .long_options
            .get(long)
            .expect("internal error - long option must be registered");
        *self
            .option_bounds
            .get(name)
            .expect("internal error - mis-aligned long option.")
    }

    /// Close the buffer when it belongs to an option (arguments stay open across '--').
    fn close_option(&mut self) -> Result<(), MatchError> {
        match &self.buffer {
            Some(match_buffer) if self.option_bounds.contains_key(match_buffer.name()) => {
                self.update_buffer(None)
            }
            _ => Ok(()),
        }
    }

    fn update_buffer(&mut self, next_buffer: Option<MatchBuffer>) -> Result<(), MatchError> {
        let previous_buffer = std::mem::replace(&mut self.buffer, next_buffer);

        if let Some(match_buffer) = previous_buffer {
            let match_tokens = match_buffer.close()?;
            self.matches.push(match_tokens);
        }

        Ok(())
    }

    pub(crate) fn close(mut self) -> Result<Matches, (usize, MatchError, Matches)> {
        let mut close_error: Option<CloseError> = None;

        if let Some(match_buffer) = self.buffer {
            match match_buffer.close() {
                Ok(match_tokens) => {
                    self.matches.push(match_tokens);
                }
                Err(error) => {
                    close_error.replace(error);
                }
            };
        }

        for argument_config in self.arguments {
            let match_buffer = MatchBuffer::new(argument_config.name(), argument_config.bound());
            match match_buffer.close() {
                Ok(match_tokens) => {
                    self.matches.push(match_tokens);
                }
                Err(error) => {
                    // Only track the first error.
                    if close_error.is_none() {
                        close_error.replace(error);
                    }
                }
            };
        }

        let matches = Matches {
            values: self.matches,
        };

        if let Some(error) = close_error {
            Err((self.fed, MatchError::from(error), matches))
        } else {
            Ok(matches)
        }
    }
}

fn split_equals_delimiter(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((n, v)) => (n, Some(v)),
        None => (token, None),
    }
}

fn is_negative_number(token: &str) -> bool {
    match token.strip_prefix(FLAG_PREFIX) {
        Some(number) => {
            number.chars().any(|c| c.is_ascii_digit())
                && number.chars().all(|c| c.is_ascii_digit() || c == '.')
        }
        None => false,
    }
}
