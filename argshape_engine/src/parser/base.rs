use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

use crate::constant::*;
use crate::matcher::*;
use crate::model::{Action, Nargs};
use crate::namespace::{Entry, Namespace};
use crate::value::{Choice, Coercion, Value};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// An invalid rule configuration, detected when building the parser.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

impl From<TokenMatcherError> for ConfigError {
    fn from(error: TokenMatcherError) -> Self {
        ConfigError(error.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Parse error: {0}")]
pub(crate) struct ParseError(pub(crate) String);

impl From<MatchError> for ParseError {
    fn from(error: MatchError) -> Self {
        ParseError(error.to_string())
    }
}

/// How the matched tokens of one rule are written into the namespace.
pub(crate) struct Capture {
    pub(crate) key: String,
    pub(crate) display: String,
    pub(crate) action: Action,
    pub(crate) nargs: Nargs,
    pub(crate) coercion: Option<Coercion>,
    pub(crate) choices: Vec<Choice>,
    pub(crate) required: bool,
    pub(crate) default: Entry,
}

impl Capture {
    fn initial(&self) -> Entry {
        match (&self.action, &self.default) {
            (Action::StoreTrue, Entry::NotSupplied) => Entry::Single(Value::new(false)),
            (Action::StoreFalse, Entry::NotSupplied) => Entry::Single(Value::new(true)),
            (_, default) => default.clone(),
        }
    }

    fn coerce(&self, offset: usize, token: &str) -> Result<Value, (usize, ParseError)> {
        let coercion = self
            .coercion
            .as_ref()
            .expect("internal error - value capturing rules must have a coercion");
        let value = coercion(token).map_err(|error| (offset, ParseError(error.to_string())))?;

        if self.choices.is_empty() || self.choices.iter().any(|c| c.value() == &value) {
            Ok(value)
        } else {
            let labels: Vec<&str> = self.choices.iter().map(Choice::label).collect();
            Err((
                offset,
                ParseError(format!(
                    "'{token}' is not a valid choice for '{}' (choose from {}).",
                    self.display,
                    labels.join(", ")
                )),
            ))
        }
    }

    fn single_valued(&self) -> bool {
        matches!(self.nargs, Nargs::Precisely(1) | Nargs::ZeroOrOne)
    }
}

pub(crate) struct Parser {
    options: Vec<OptionConfig>,
    arguments: Vec<ArgumentConfig>,
    captures: Vec<Capture>,
    positions: HashMap<String, usize>,
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser{..}").finish()
    }
}

impl Parser {
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self::new(Vec::default(), Vec::default()).unwrap()
    }

    pub(crate) fn new(
        options: Vec<(OptionConfig, Capture)>,
        arguments: Vec<(ArgumentConfig, Capture)>,
    ) -> Result<Self, ConfigError> {
        let help_config = OptionConfig::new(
            HELP_NAME,
            vec![HELP_NAME.to_string()],
            vec![HELP_SHORT],
            Bound::Range(0, 0),
        );
        let mut option_configs = vec![help_config];
        let mut argument_configs = Vec::default();
        let mut captures = Vec::default();
        let mut positions = HashMap::default();

        for (oc, capture) in options.into_iter() {
            if positions
                .insert(capture.key.clone(), captures.len())
                .is_some()
            {
                return Err(ConfigError(format!(
                    "Cannot duplicate the parameter '{}'.",
                    capture.key
                )));
            }

            captures.push(capture);
            option_configs.push(oc);
        }

        for (ac, capture) in arguments.into_iter() {
            if positions
                .insert(capture.key.clone(), captures.len())
                .is_some()
            {
                return Err(ConfigError(format!(
                    "Cannot duplicate the parameter '{}'.",
                    capture.key
                )));
            }

            captures.push(capture);
            argument_configs.push(ac);
        }

        // Validate the matcher configuration eagerly, so that consume() cannot fail on it.
        TokenMatcher::new(
            option_configs.clone(),
            VecDeque::from(argument_configs.clone()),
        )?;

        Ok(Self {
            options: option_configs,
            arguments: argument_configs,
            captures,
            positions,
        })
    }

    pub(crate) fn consume(&self, tokens: &[&str]) -> Result<Outcome, (usize, ParseError)> {
        let mut token_matcher = TokenMatcher::new(
            self.options.clone(),
            VecDeque::from(self.arguments.clone()),
        )
        .expect("internal error - matcher configuration was validated in Parser::new");

        // 1. Feed the raw token strings to the matcher.
        let mut fed = 0;

        for token in tokens {
            token_matcher
                .feed(token)
                .map_err(|e| (fed, ParseError::from(e)))?;
            fed += token.len();
        }

        let matches = match token_matcher.close() {
            Ok(matches) | Err((_, _, matches)) if matches.contains(HELP_NAME) => {
                return Ok(Outcome::PrintHelp);
            }
            Ok(matches) => Ok(matches),
            Err((offset, e, _)) => Err((offset, ParseError::from(e))),
        }?;

        // 2. Start every rule from (a fresh copy of) its default.
        let mut namespace: Namespace = self
            .captures
            .iter()
            .map(|capture| (capture.key.clone(), capture.initial()))
            .collect();
        let mut matched: HashSet<&str> = HashSet::default();

        // 3. Apply the matches in the order they appeared on the command line.
        for match_tokens in matches.values {
            let capture = &self.captures[*self
                .positions
                .get(&match_tokens.name)
                .expect("internal error - mismatch between matches and captures")];

            if match_tokens.values.is_empty() && !capture.action.is_toggle() {
                // Nothing was supplied (ex: an optional argument); keep the default.
                continue;
            }

            matched.insert(capture.key.as_str());
            let values = match_tokens
                .values
                .iter()
                .map(|(offset, token)| capture.coerce(*offset, token))
                .collect::<Result<Vec<_>, _>>();
            let entry = match capture.action {
                Action::StoreTrue => Entry::Single(Value::new(true)),
                Action::StoreFalse => Entry::Single(Value::new(false)),
                Action::Store => {
                    let mut values = values?;
                    if capture.single_valued() {
                        Entry::Single(values.remove(0))
                    } else {
                        Entry::Multiple(values)
                    }
                }
                Action::Append => {
                    let mut accumulated = match namespace.remove(&capture.key) {
                        Some(Entry::Multiple(previous)) => previous,
                        Some(Entry::Single(previous)) => vec![previous],
                        Some(Entry::NotSupplied) | None => Vec::default(),
                    };
                    accumulated.extend(values?);
                    Entry::Multiple(accumulated)
                }
            };

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Captured '{}': {:?}.", capture.key, entry);
            }

            namespace.insert(capture.key.clone(), entry);
        }

        // 4. Check that every required rule was matched.
        let missing: Vec<&str> = self
            .captures
            .iter()
            .filter(|capture| capture.required && !matched.contains(capture.key.as_str()))
            .map(|capture| capture.display.as_str())
            .collect();

        if !missing.is_empty() {
            return Err((
                fed,
                ParseError(format!(
                    "The following parameters are required: {}.",
                    missing.join(", ")
                )),
            ));
        }

        Ok(Outcome::Complete(namespace))
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum Outcome {
    Complete(Namespace),
    PrintHelp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::coerce_from_str;
    use rstest::rstest;

    fn capture(key: &str, action: Action, nargs: Nargs) -> Capture {
        Capture {
            key: key.to_string(),
            display: key.to_string(),
            action,
            nargs,
            coercion: if action.is_toggle() {
                None
            } else {
                Some(coerce_from_str::<u32>())
            },
            choices: Vec::default(),
            required: false,
            default: Entry::NotSupplied,
        }
    }

    fn option(capture: Capture, short: Option<char>) -> (OptionConfig, Capture) {
        let bound = if capture.action.is_toggle() {
            Bound::Range(0, 0)
        } else {
            Bound::from(capture.nargs)
        };
        (
            OptionConfig::new(
                capture.key.clone(),
                vec![capture.key.clone()],
                short.into_iter().collect(),
                bound,
            ),
            capture,
        )
    }

    fn argument(capture: Capture) -> (ArgumentConfig, Capture) {
        (
            ArgumentConfig::new(capture.key.clone(), Bound::from(capture.nargs)),
            capture,
        )
    }

    fn complete(outcome: Outcome) -> Namespace {
        match outcome {
            Outcome::Complete(namespace) => namespace,
            Outcome::PrintHelp => panic!("unexpected help outcome"),
        }
    }

    #[test]
    fn parser_empty() {
        // Setup
        let parser = Parser::empty();

        // Execute
        let result = parser.consume(&[]).unwrap();

        // Verify
        assert_eq!(result, Outcome::Complete(Namespace::default()));
    }

    #[rstest]
    #[case(vec!["--variable", "1"])]
    #[case(vec!["--variable", "01"])]
    #[case(vec!["-v", "1"])]
    #[case(vec!["-v=01"])]
    #[case(vec!["--variable", "7", "--variable=1"])]
    fn parser_option_store(#[case] tokens: Vec<&str>) {
        // Setup
        let parser = Parser::new(
            vec![option(
                capture("variable", Action::Store, Nargs::Precisely(1)),
                Some('v'),
            )],
            Vec::default(),
        )
        .unwrap();

        // Execute
        let namespace = complete(parser.consume(tokens.as_slice()).unwrap());

        // Verify
        assert_eq!(
            namespace.get("variable"),
            Some(&Entry::Single(Value::new(1u32)))
        );
    }

    #[rstest]
    #[case(vec![], Entry::Multiple(vec![Value::new(9u32)]))]
    #[case(vec!["--item", "1"], Entry::Multiple(vec![Value::new(9u32), Value::new(1u32)]))]
    #[case(vec!["--item", "1", "--item", "2"], Entry::Multiple(vec![Value::new(9u32), Value::new(1u32), Value::new(2u32)]))]
    fn parser_option_append(#[case] tokens: Vec<&str>, #[case] expected: Entry) {
        // Setup
        let mut item = capture("item", Action::Append, Nargs::Precisely(1));
        item.default = Entry::Multiple(vec![Value::new(9u32)]);
        let parser = Parser::new(vec![option(item, None)], Vec::default()).unwrap();

        // Execute
        let first = complete(parser.consume(tokens.as_slice()).unwrap());
        let second = complete(parser.consume(tokens.as_slice()).unwrap());

        // Verify
        assert_eq!(first.get("item"), Some(&expected));
        // The default is never mutated across parses.
        assert_eq!(second.get("item"), Some(&expected));
    }

    #[rstest]
    #[case(vec![], true, false)]
    #[case(vec!["--yes"], true, true)]
    #[case(vec!["--no"], false, false)]
    #[case(vec!["--yes", "--no"], false, true)]
    fn parser_toggles(#[case] tokens: Vec<&str>, #[case] no: bool, #[case] yes: bool) {
        // Setup
        let parser = Parser::new(
            vec![
                option(capture("yes", Action::StoreTrue, Nargs::Precisely(0)), None),
                option(capture("no", Action::StoreFalse, Nargs::Precisely(0)), None),
            ],
            Vec::default(),
        )
        .unwrap();

        // Execute
        let namespace = complete(parser.consume(tokens.as_slice()).unwrap());

        // Verify
        assert_eq!(namespace.get("yes"), Some(&Entry::Single(Value::new(yes))));
        assert_eq!(namespace.get("no"), Some(&Entry::Single(Value::new(no))));
    }

    #[rstest]
    #[case(vec![], Entry::NotSupplied)]
    #[case(vec!["1", "3", "2"], Entry::Multiple(vec![Value::new(1u32), Value::new(3u32), Value::new(2u32)]))]
    fn parser_argument_any(#[case] tokens: Vec<&str>, #[case] expected: Entry) {
        // Setup
        let parser = Parser::new(
            Vec::default(),
            vec![argument(capture("variable", Action::Store, Nargs::Any))],
        )
        .unwrap();

        // Execute
        let namespace = complete(parser.consume(tokens.as_slice()).unwrap());

        // Verify
        assert_eq!(namespace.get("variable"), Some(&expected));
    }

    #[test]
    fn parser_argument_zero_or_one() {
        // Setup
        let parser = Parser::new(
            Vec::default(),
            vec![
                argument(capture("a", Action::Store, Nargs::ZeroOrOne)),
                argument(capture("b", Action::Store, Nargs::ZeroOrOne)),
            ],
        )
        .unwrap();

        // Execute
        let namespace = complete(parser.consume(&["4"]).unwrap());

        // Verify
        assert_eq!(namespace.get("a"), Some(&Entry::Single(Value::new(4u32))));
        assert_eq!(namespace.get("b"), Some(&Entry::NotSupplied));
    }

    #[rstest]
    #[case(vec!["--variable", "x"], 10, "Parse error: 'x' cannot convert to u32.")]
    #[case(vec!["--variable", "3"], 10, "Parse error: '3' is not a valid choice for 'variable' (choose from 1, 2).")]
    #[case(vec!["--variable"], 10, "Parse error: Not enough tokens provided to parameter 'variable'.")]
    #[case(vec!["--moot"], 0, "Parse error: Option '--moot' does not exist.")]
    #[case(vec!["--variable", "1", "x"], 11, "Parse error: Unrecognized argument 'x'.")]
    fn parser_invalid(#[case] tokens: Vec<&str>, #[case] offset: usize, #[case] message: &str) {
        // Setup
        let mut variable = capture("variable", Action::Store, Nargs::Precisely(1));
        variable.choices = vec![Choice::of(1u32), Choice::of(2u32)];
        let parser = Parser::new(vec![option(variable, None)], Vec::default()).unwrap();

        // Execute
        let (error_offset, error) = parser.consume(tokens.as_slice()).unwrap_err();

        // Verify
        assert_eq!(error_offset, offset);
        assert_eq!(error.to_string(), message);
    }

    #[test]
    fn parser_required() {
        // Setup
        let mut a = capture("a", Action::Store, Nargs::Precisely(1));
        a.required = true;
        a.display = "--a".to_string();
        let mut b = capture("b", Action::Store, Nargs::Precisely(1));
        b.required = true;
        b.display = "--b".to_string();
        let parser = Parser::new(vec![option(a, None), option(b, None)], Vec::default()).unwrap();

        // Execute
        let (offset, error) = parser.consume(&["--b", "1"]).unwrap_err();

        // Verify
        assert_eq!(offset, 4);
        assert_eq!(
            error.to_string(),
            "Parse error: The following parameters are required: --a."
        );
    }

    #[rstest]
    #[case(vec!["-h"])]
    #[case(vec!["--help"])]
    #[case(vec!["-h", "--variable", "x"])]
    fn parser_help(#[case] tokens: Vec<&str>) {
        // Setup
        let mut variable = capture("variable", Action::Store, Nargs::Precisely(1));
        variable.required = true;
        let parser = Parser::new(vec![option(variable, None)], Vec::default()).unwrap();

        // Execute
        let outcome = parser.consume(tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(outcome, Outcome::PrintHelp);
    }

    #[rstest]
    #[case(vec![option(capture("a", Action::Store, Nargs::Precisely(1)), None)], vec![argument(capture("a", Action::Store, Nargs::Any))], "Config error: Cannot duplicate the parameter 'a'.")]
    #[case(vec![option(capture("help", Action::StoreTrue, Nargs::Precisely(0)), None)], vec![], "Config error: Cannot duplicate the parameter 'help'.")]
    #[case(vec![option(capture("a", Action::StoreTrue, Nargs::Precisely(0)), Some('h'))], vec![], "Config error: Cannot duplicate the short option '-h'.")]
    fn parser_config_error(
        #[case] options: Vec<(OptionConfig, Capture)>,
        #[case] arguments: Vec<(ArgumentConfig, Capture)>,
        #[case] message: &str,
    ) {
        let error = Parser::new(options, arguments).unwrap_err();
        assert_eq!(error.to_string(), message);
    }
}
