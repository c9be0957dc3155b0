use crate::constant::*;
use crate::matcher::{ArgumentConfig, Bound, OptionConfig};
use crate::model::{Action, Nargs};
use crate::namespace::Entry;
use crate::parser::{ArgumentParameter, Capture, ConfigError, OptionParameter};
use crate::value::{Choice, Coercion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RuleClass {
    Opt { flags: Vec<String> },
    Arg { name: String },
}

/// One parsing rule: which tokens to match and how to store them in the [`Namespace`](crate::Namespace).
///
/// Rules come in two classes:
/// * [`Rule::option`]: matched by any of its flags (ex: `--exclude` or `-e`), in any order and any number of times.
/// * [`Rule::argument`]: matched by position.
///
/// ### Example
/// ```
/// use argshape_engine::{coerce_from_str, Action, CommandLineParser, Entry, Rule, Value};
///
/// let parser = CommandLineParser::new("program")
///     .add(
///         Rule::option(["--exclude", "-e"], "excludes")
///             .action(Action::Append)
///             .coercion(coerce_from_str::<String>())
///             .default(Entry::Multiple(vec![])),
///     )
///     .build_parser()
///     .unwrap();
///
/// let namespace = parser.parse_tokens(&["-e", "a", "--exclude", "b"]).unwrap();
/// assert_eq!(
///     namespace.get("excludes"),
///     Some(&Entry::Multiple(vec![Value::new("a".to_string()), Value::new("b".to_string())]))
/// );
/// ```
pub struct Rule {
    class: RuleClass,
    key: String,
    action: Action,
    nargs: Option<Nargs>,
    coercion: Option<Coercion>,
    choices: Vec<Choice>,
    required: bool,
    default: Entry,
    help: Option<String>,
    meta: Vec<String>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match &self.class {
            RuleClass::Opt { flags } => flags.join("/"),
            RuleClass::Arg { name } => name.clone(),
        };
        write!(
            f,
            "Rule[{name} -> {key}, {action:?}, {nargs:?}, required={required}, default={default:?}]",
            key = self.key,
            action = self.action,
            nargs = self.nargs,
            required = self.required,
            default = self.default,
        )
    }
}

pub(super) struct Resolved {
    pub(super) class: Class,
    pub(super) capture: Capture,
}

pub(super) enum Class {
    Opt(OptionConfig, OptionParameter),
    Arg(ArgumentConfig, ArgumentParameter),
}

impl Rule {
    fn new(class: RuleClass, key: String) -> Self {
        Self {
            class,
            key,
            action: Action::Store,
            nargs: None,
            coercion: None,
            choices: Vec::default(),
            required: false,
            default: Entry::NotSupplied,
            help: None,
            meta: Vec::default(),
        }
    }

    /// Create an option rule, matched by any of `flags` and stored under `key`.
    ///
    /// Each flag must be spelled either `--long-name` or `-c` (a single character).
    pub fn option<S: Into<String>>(flags: impl IntoIterator<Item = S>, key: impl Into<String>) -> Self {
        Self::new(
            RuleClass::Opt {
                flags: flags.into_iter().map(Into::into).collect(),
            },
            key.into(),
        )
    }

    /// Create an argument rule, matched by position and stored under `name`.
    pub fn argument(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::argument_as(name.clone(), name)
    }

    /// Create an argument rule, matched by position and displayed as `name`, but stored under `key`.
    pub fn argument_as(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(RuleClass::Arg { name: name.into() }, key.into())
    }

    /// Set the action (default: [`Action::Store`]).
    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Set the cardinality of values consumed per match.
    ///
    /// Defaults to `Nargs::Precisely(0)` for toggles, and `Nargs::Precisely(1)` otherwise.
    pub fn nargs(mut self, nargs: Nargs) -> Self {
        self.nargs.replace(nargs);
        self
    }

    /// Set the conversion applied to each matched value token.
    /// Required for [`Action::Store`] and [`Action::Append`].
    pub fn coercion(mut self, coercion: Coercion) -> Self {
        self.coercion.replace(coercion);
        self
    }

    /// Restrict the coerced values to `choices`.
    pub fn choices(mut self, choices: impl IntoIterator<Item = Choice>) -> Self {
        self.choices = choices.into_iter().collect();
        self
    }

    /// Require that the option is matched at least once.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the entry stored when the rule is not matched (default: [`Entry::NotSupplied`]).
    pub fn default(mut self, default: Entry) -> Self {
        self.default = default;
        self
    }

    /// Document the rule in the help message.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.help.replace(description.into());
        self
    }

    /// Add a meta column to the rule's help line (ex: `type: u32`).
    pub fn meta(mut self, meta: impl Into<String>) -> Self {
        self.meta.push(meta.into());
        self
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub(super) fn resolve(self) -> Result<Resolved, ConfigError> {
        let Rule {
            class,
            key,
            action,
            nargs,
            coercion,
            choices,
            required,
            default,
            help,
            meta,
        } = self;

        let nargs = match (action.is_toggle(), nargs) {
            (true, None) | (true, Some(Nargs::Precisely(0))) => Nargs::Precisely(0),
            (true, Some(other)) => {
                return Err(ConfigError(format!(
                    "Rule '{key}' is a toggle and cannot take values (nargs={other})."
                )));
            }
            (false, Some(Nargs::Precisely(0))) => {
                return Err(ConfigError(format!(
                    "Rule '{key}' must take values (use a toggle action instead)."
                )));
            }
            (false, Some(nargs)) => nargs,
            (false, None) => Nargs::Precisely(1),
        };

        if !action.is_toggle() && coercion.is_none() {
            return Err(ConfigError(format!(
                "Rule '{key}' requires a coercion for {action:?}."
            )));
        }

        let choice_labels: Vec<String> = choices.iter().map(|c| c.label().to_string()).collect();

        match class {
            RuleClass::Opt { flags } => {
                let (longs, shorts) = split_flags(&key, &flags)?;
                let display = match (longs.first(), shorts.first()) {
                    (Some(long), _) => format!("--{long}"),
                    (None, Some(short)) => format!("-{short}"),
                    (None, None) => unreachable!("internal error - flags must be non-empty"),
                };
                let metavar = if action.is_toggle() {
                    None
                } else {
                    Some(
                        longs
                            .first()
                            .unwrap_or(&key)
                            .to_ascii_uppercase()
                            .replace('-', "_"),
                    )
                };
                let bound = Bound::from(nargs);
                let mut display_flags: Vec<String> =
                    shorts.iter().map(|s| format!("-{s}")).collect();
                display_flags.extend(longs.iter().map(|l| format!("--{l}")));
                let parameter = OptionParameter::new(
                    display_flags,
                    metavar,
                    nargs,
                    required,
                    help,
                    meta,
                    choice_labels,
                );

                Ok(Resolved {
                    class: Class::Opt(
                        OptionConfig::new(key.clone(), longs, shorts, bound),
                        parameter,
                    ),
                    capture: Capture {
                        key,
                        display,
                        action,
                        nargs,
                        coercion,
                        choices,
                        required,
                        default,
                    },
                })
            }
            RuleClass::Arg { name } => {
                if action != Action::Store {
                    return Err(ConfigError(format!(
                        "Argument '{name}' must use {:?} (found {action:?}).",
                        Action::Store
                    )));
                }

                if required {
                    return Err(ConfigError(format!(
                        "Argument '{name}' cannot be marked required; its nargs decide that."
                    )));
                }

                let parameter = ArgumentParameter::new(name.clone(), nargs, help, meta, choice_labels);

                Ok(Resolved {
                    class: Class::Arg(ArgumentConfig::new(key.clone(), Bound::from(nargs)), parameter),
                    capture: Capture {
                        key,
                        display: name.to_ascii_uppercase().replace('-', "_"),
                        action,
                        nargs,
                        coercion,
                        choices,
                        required,
                        default,
                    },
                })
            }
        }
    }
}

fn split_flags(key: &str, flags: &[String]) -> Result<(Vec<String>, Vec<char>), ConfigError> {
    if flags.is_empty() {
        return Err(ConfigError(format!(
            "Option '{key}' must have at least one flag."
        )));
    }

    let mut longs = Vec::default();
    let mut shorts = Vec::default();

    for flag in flags {
        let invalid = || {
            ConfigError(format!(
                "Option '{key}' has invalid flag '{flag}' (expected '--name' or '-c')."
            ))
        };

        if let Some(long) = flag.strip_prefix(OPTIONS_TERMINATOR) {
            if long.is_empty()
                || long.starts_with(FLAG_PREFIX)
                || long.contains('=')
                || long.contains(char::is_whitespace)
            {
                return Err(invalid());
            }

            longs.push(long.to_string());
        } else if let Some(short) = flag.strip_prefix(FLAG_PREFIX) {
            let mut characters = short.chars();

            match (characters.next(), characters.next()) {
                (Some(c), None) if c != FLAG_PREFIX && c != '=' && !c.is_whitespace() => {
                    shorts.push(c)
                }
                _ => return Err(invalid()),
            }
        } else {
            return Err(invalid());
        }
    }

    Ok((longs, shorts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::coerce_from_str;
    use rstest::rstest;

    #[rstest]
    #[case(vec!["--name"], vec!["name"], vec![])]
    #[case(vec!["-n", "--name"], vec!["name"], vec!['n'])]
    #[case(vec!["--name", "--alias", "-a"], vec!["name", "alias"], vec!['a'])]
    fn split_flags_valid(
        #[case] flags: Vec<&str>,
        #[case] longs: Vec<&str>,
        #[case] shorts: Vec<char>,
    ) {
        let flags: Vec<String> = flags.into_iter().map(String::from).collect();
        let (actual_longs, actual_shorts) = split_flags("key", &flags).unwrap();
        assert_eq!(actual_longs, longs);
        assert_eq!(actual_shorts, shorts);
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec!["name"])]
    #[case(vec!["--"])]
    #[case(vec!["---name"])]
    #[case(vec!["--na=me"])]
    #[case(vec!["-"])]
    #[case(vec!["-ab"])]
    #[case(vec!["--ok", "bad"])]
    fn split_flags_invalid(#[case] flags: Vec<&str>) {
        let flags: Vec<String> = flags.into_iter().map(String::from).collect();
        assert_matches!(split_flags("key", &flags), Err(ConfigError(_)));
    }

    #[rstest]
    #[case(Rule::option(["--x"], "x").action(Action::Store), "Config error: Rule 'x' requires a coercion for Store.")]
    #[case(Rule::option(["--x"], "x").action(Action::StoreTrue).nargs(Nargs::Any), "Config error: Rule 'x' is a toggle and cannot take values (nargs=Any).")]
    #[case(Rule::option(["--x"], "x").nargs(Nargs::Precisely(0)).coercion(coerce_from_str::<u8>()), "Config error: Rule 'x' must take values (use a toggle action instead).")]
    #[case(Rule::argument("x").action(Action::StoreTrue), "Config error: Argument 'x' must use Store (found StoreTrue).")]
    #[case(Rule::argument("x").coercion(coerce_from_str::<u8>()).required(true), "Config error: Argument 'x' cannot be marked required; its nargs decide that.")]
    #[case(Rule::option(Vec::<String>::new(), "x").action(Action::StoreTrue), "Config error: Option 'x' must have at least one flag.")]
    fn resolve_invalid(#[case] rule: Rule, #[case] message: &str) {
        match rule.resolve() {
            Ok(_) => panic!("expected a config error"),
            Err(error) => assert_eq!(error.to_string(), message),
        }
    }

    #[test]
    fn resolve_option() {
        // Setup
        let rule = Rule::option(["-v", "--verbose"], "verbosity").action(Action::StoreTrue);

        // Execute
        let resolved = rule.resolve().unwrap();

        // Verify
        assert_eq!(resolved.capture.key, "verbosity");
        assert_eq!(resolved.capture.display, "--verbose");
        assert_eq!(resolved.capture.nargs, Nargs::Precisely(0));
        match resolved.class {
            Class::Opt(config, _) => {
                assert_eq!(config.name(), "verbosity");
                assert_eq!(config.longs(), &["verbose".to_string()]);
                assert_eq!(config.shorts(), &['v']);
                assert_eq!(config.bound(), Bound::Range(0, 0));
            }
            Class::Arg(..) => panic!("expected an option"),
        }
    }

    #[test]
    fn resolve_argument() {
        // Setup
        let rule = Rule::argument("my-items")
            .nargs(Nargs::Any)
            .coercion(coerce_from_str::<u8>());

        // Execute
        let resolved = rule.resolve().unwrap();

        // Verify
        assert_eq!(resolved.capture.key, "my-items");
        assert_eq!(resolved.capture.display, "MY_ITEMS");
        match resolved.class {
            Class::Arg(config, _) => assert_eq!(config.bound(), Bound::Lower(0)),
            Class::Opt(..) => panic!("expected an argument"),
        }
    }

    #[test]
    fn resolve_argument_as() {
        // Setup
        let rule = Rule::argument_as("input", "_input").coercion(coerce_from_str::<String>());

        // Execute
        let resolved = rule.resolve().unwrap();

        // Verify
        assert_eq!(resolved.capture.key, "_input");
        assert_eq!(resolved.capture.display, "INPUT");
        match resolved.class {
            Class::Arg(config, _) => assert_eq!(config.name(), "_input"),
            Class::Opt(..) => panic!("expected an argument"),
        }
    }

    #[test]
    fn rule_debug() {
        let rule = Rule::option(["-f", "--force"], "force").action(Action::StoreTrue);
        assert_eq!(
            format!("{rule:?}"),
            "Rule[-f/--force -> force, StoreTrue, None, required=false, default=NotSupplied]"
        );
    }
}
