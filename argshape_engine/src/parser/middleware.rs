use std::env;

use crate::namespace::Namespace;
use crate::parser::interface::UserInterface;
use crate::parser::printer::Printer;
use crate::parser::{ErrorContext, Outcome, Parser};

/// The configured command line parser.
/// Built via `CommandLineParser::build` or `CommandLineParser::build_parser`.
///
/// A `GeneralParser` may be used for any number of parses; each parse starts from a fresh copy of the rule defaults.
pub struct GeneralParser {
    program: String,
    parser: Parser,
    printer: Printer,
    user_interface: Box<dyn UserInterface>,
}

impl std::fmt::Debug for GeneralParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneralParser")
            .field("program", &self.program)
            .finish()
    }
}

impl GeneralParser {
    pub(crate) fn new(
        program: impl Into<String>,
        parser: Parser,
        printer: Printer,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            program: program.into(),
            parser,
            printer,
            user_interface,
        }
    }

    /// The program name shown in the usage line.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the command line parser against the input tokens.
    ///
    /// Parsing happens in two phases:
    /// 1. Token matching aligns the tokens to arguments and options.
    /// All tokens must be matched successfully in order to proceed to the next phase.
    /// 2. Token capturing coerces the tokens and writes them into the [`Namespace`], over top of the rule defaults.
    ///
    /// If at any point the parser encounters an error (ex: un-matched token, un-coercible token, missing required rule, etc), it will report the error and return with `Err(1)`.
    ///
    /// If the help switch (`-h` or `--help`) is encountered, the parser will display the help message and return with `Err(0)`.
    /// This skips the phase #2 capturing.
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<Namespace, i32> {
        match self.parser.consume(tokens) {
            Ok(Outcome::Complete(namespace)) => Ok(namespace),
            Ok(Outcome::PrintHelp) => {
                self.printer
                    .print_help(&self.program, &*self.user_interface);
                Err(0)
            }
            Err((offset, parse_error)) => {
                self.user_interface.print_error(parse_error);
                self.user_interface
                    .print_error_context(ErrorContext::new(offset, tokens));
                Err(1)
            }
        }
    }

    /// Run the command line parser against the Cli [`env::args`].
    ///
    /// See [`GeneralParser::parse_tokens`] for the semantics.
    /// Where `parse_tokens` would return `Err(code)`, this exits with `code` (via [`std::process::exit`]).
    pub fn parse(&self) -> Namespace {
        let command_input: Vec<String> = env::args().skip(1).collect();
        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(namespace) => namespace,
            Err(exit_code) => {
                std::process::exit(exit_code);
            }
        }
    }

    /// Render the help message, as it would be displayed by `-h`.
    pub fn help(&self) -> String {
        self.printer.help_lines(&self.program).join("\n")
    }
}
