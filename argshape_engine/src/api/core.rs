use crate::api::rule::{Class, Resolved};
use crate::api::Rule;
use crate::parser::{ConfigError, ConsoleInterface, GeneralParser, UserInterface};
use crate::parser::{Parser, Printer};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The base command line parser.
///
/// ### Example
/// ```
/// use argshape_engine::CommandLineParser;
///
/// let parser = CommandLineParser::new("program")
///     // Configure with CommandLineParser::add.
///     .build();
/// parser.parse_tokens(&[]).unwrap();
/// ```
#[derive(Debug)]
pub struct CommandLineParser {
    program: String,
    about: Option<String>,
    rules: Vec<Rule>,
}

impl CommandLineParser {
    /// Create a command line parser.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            about: None,
            rules: Vec::default(),
        }
    }

    /// Document the about message for this command line parser.
    /// If repeated, only the final about message will apply.
    ///
    /// An about message documents the command line parser in full sentence/paragraph format.
    /// Line breaks (`'\n'`) are not preserved; the paragraph is re-flowed to the terminal width.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Add a rule to the command line parser.
    ///
    /// The order of argument rules corresponds to their positional order during parsing.
    /// The order of option rules only affects the help message.
    ///
    /// ### Example
    /// ```
    /// use argshape_engine::{coerce_from_str, CommandLineParser, Entry, Rule, Value};
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .add(Rule::argument("a").coercion(coerce_from_str::<u32>()))
    ///     .add(Rule::argument("b").coercion(coerce_from_str::<u32>()))
    ///     .build();
    ///
    /// let namespace = parser.parse_tokens(vec!["1", "2"].as_slice()).unwrap();
    ///
    /// assert_eq!(namespace.get("a"), Some(&Entry::Single(Value::new(1u32))));
    /// assert_eq!(namespace.get("b"), Some(&Entry::Single(Value::new(2u32))));
    /// ```
    pub fn add(mut self, rule: Rule) -> Self {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Adding {rule:?}.");
        }

        self.rules.push(rule);
        self
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser, ConfigError> {
        let mut option_captures = Vec::default();
        let mut argument_captures = Vec::default();
        let mut option_parameters = Vec::default();
        let mut argument_parameters = Vec::default();

        for rule in self.rules {
            let Resolved { class, capture } = rule.resolve()?;

            match class {
                Class::Opt(config, parameter) => {
                    option_captures.push((config, capture));
                    option_parameters.push(parameter);
                }
                Class::Arg(config, parameter) => {
                    argument_captures.push((config, capture));
                    argument_parameters.push(parameter);
                }
            }
        }

        let parser = Parser::new(option_captures, argument_captures)?;
        let printer = Printer::terminal(self.about, option_parameters, argument_parameters);
        Ok(GeneralParser::new(
            self.program,
            parser,
            printer,
            user_interface,
        ))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    pub fn build_parser(self) -> Result<GeneralParser, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line parser.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}
