use terminal_size::{terminal_size, Width};

use crate::constant::*;
use crate::model::Nargs;
use crate::parser::{chunk, ColumnRenderer, Columns, UserInterface};

pub(crate) struct OptionParameter {
    flags: Vec<String>,
    metavar: Option<String>,
    nargs: Nargs,
    required: bool,
    help: Option<String>,
    meta: Vec<String>,
    choices: Vec<String>,
}

impl OptionParameter {
    /// `metavar` is `None` for options which take no value.
    pub(crate) fn new(
        flags: Vec<String>,
        metavar: Option<String>,
        nargs: Nargs,
        required: bool,
        help: Option<String>,
        meta: Vec<String>,
        choices: Vec<String>,
    ) -> Self {
        Self {
            flags,
            metavar,
            nargs,
            required,
            help,
            meta,
            choices,
        }
    }

    fn grammar(&self) -> String {
        match &self.metavar {
            Some(metavar) => format!(" {}", grammar(metavar, self.nargs)),
            None => String::default(),
        }
    }
}

pub(crate) struct ArgumentParameter {
    name: String,
    nargs: Nargs,
    help: Option<String>,
    meta: Vec<String>,
    choices: Vec<String>,
}

impl ArgumentParameter {
    pub(crate) fn new(
        name: String,
        nargs: Nargs,
        help: Option<String>,
        meta: Vec<String>,
        choices: Vec<String>,
    ) -> Self {
        Self {
            name,
            nargs,
            help,
            meta,
            choices,
        }
    }

    fn grammar(&self) -> String {
        grammar(&self.name.to_ascii_uppercase().replace('-', "_"), self.nargs)
    }
}

fn grammar(metavar: &str, nargs: Nargs) -> String {
    match nargs {
        Nargs::Precisely(n) => (0..n)
            .map(|_| metavar.to_string())
            .collect::<Vec<String>>()
            .join(" "),
        Nargs::ZeroOrOne => format!("[{metavar}]"),
        Nargs::Any => format!("[{metavar} ...]"),
        Nargs::AtLeastOne => format!("{metavar} [...]"),
    }
}

fn describe(choices: &[String], help: &Option<String>) -> String {
    let mut out = String::default();

    if !choices.is_empty() {
        out.push_str(&format!("{{{}}}", choices.join(", ")));
    }

    if let Some(help) = help {
        if !out.is_empty() {
            out.push(' ');
        }

        out.push_str(help);
    }

    out
}

pub(crate) struct Printer {
    about: Option<String>,
    options: Vec<OptionParameter>,
    arguments: Vec<ArgumentParameter>,
    terminal_width: Option<usize>,
}

const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;
// Used for the about paragraph when the terminal width is unknown.
const DEFAULT_TOTAL_WIDTH: usize = 100;

impl Printer {
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self::new(None, Vec::default(), Vec::default(), None)
    }

    pub(crate) fn terminal(
        about: Option<String>,
        options: Vec<OptionParameter>,
        arguments: Vec<ArgumentParameter>,
    ) -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(about, options, arguments, terminal_width)
    }

    pub(crate) fn new(
        about: Option<String>,
        options: Vec<OptionParameter>,
        arguments: Vec<ArgumentParameter>,
        terminal_width: Option<usize>,
    ) -> Self {
        Self {
            about,
            options,
            arguments,
            terminal_width,
        }
    }

    pub(crate) fn print_help(&self, program: &str, user_interface: &(impl UserInterface + ?Sized)) {
        for line in self.help_lines(program) {
            user_interface.print(line);
        }
    }

    pub(crate) fn help_lines(&self, program: &str) -> Vec<String> {
        let help_flags = format!("-{HELP_SHORT}, --{HELP_NAME}");
        let empty_meta: Vec<String> = Vec::default();
        let mut summary = vec![format!("[-{HELP_SHORT}]")];
        let mut rows: Vec<(bool, String, String, &Vec<String>)> = Vec::default();
        rows.push((false, help_flags, HELP_MESSAGE.to_string(), &empty_meta));

        for option in &self.options {
            let grammar = option.grammar();
            let usage_flag = option.flags.first().map(String::as_str).unwrap_or_default();

            if option.required {
                summary.push(format!("{usage_flag}{grammar}"));
            } else {
                summary.push(format!("[{usage_flag}{grammar}]"));
            }

            let left = option
                .flags
                .iter()
                .map(|flag| format!("{flag}{grammar}"))
                .collect::<Vec<String>>()
                .join(", ");
            rows.push((
                false,
                left,
                describe(&option.choices, &option.help),
                &option.meta,
            ));
        }

        let mut argument_rows = Vec::default();

        for argument in &self.arguments {
            let grammar = argument.grammar();
            summary.push(grammar.clone());
            argument_rows.push((
                true,
                grammar,
                describe(&argument.choices, &argument.help),
                &argument.meta,
            ));
        }

        // Positional arguments are listed first.
        argument_rows.extend(rows);
        let rows = argument_rows;
        let mut columns = Columns {
            padding: PADDING_WIDTH,
            left: 1,
            middle: 1,
            rights: Vec::default(),
        };

        for (_, left, middle, meta) in &rows {
            columns.left = std::cmp::max(columns.left, left.len());
            columns.middle = std::cmp::max(columns.middle, middle.len() + MAIN_INDENT);

            for (i, m) in meta.iter().enumerate() {
                if i >= columns.rights.len() {
                    columns.rights.push(std::cmp::max(1, m.len()));
                } else if columns.rights[i] < m.len() {
                    columns.rights[i] = m.len();
                }
            }
        }

        let column_renderer = ColumnRenderer::guided(columns, self.terminal_width);
        let mut lines = vec![format!("usage: {program} {}", summary.join(" "))];

        if let Some(about) = &self.about {
            lines.push(String::default());
            let width = (self.terminal_width.unwrap_or(DEFAULT_TOTAL_WIDTH) as f64 * 0.95) as usize;
            lines.extend(chunk(about, std::cmp::max(width, 2)));
        }

        if !self.arguments.is_empty() {
            lines.push(String::default());
            lines.push("positional arguments:".to_string());

            for (_, left, middle, meta) in rows.iter().filter(|row| row.0) {
                lines.extend(column_renderer.render(MAIN_INDENT, left, middle, meta));
            }
        }

        lines.push(String::default());
        lines.push("options:".to_string());

        for (_, left, middle, meta) in rows.iter().filter(|row| !row.0) {
            lines.extend(column_renderer.render(MAIN_INDENT, left, middle, meta));
        }

        lines
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    offset: usize,
    tokens: Vec<String>,
}

impl ErrorContext {
    pub(crate) fn new(offset: usize, tokens: &[&str]) -> Self {
        Self {
            offset,
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The offset counts token characters only; add one for each space that precedes it.
        let projection = self.tokens.join(" ");
        let tokens_length: usize = self.tokens.iter().map(String::len).sum();
        let mut spaces = 0;
        let mut consumed = 0;

        for token in self.tokens.iter().take(self.tokens.len().saturating_sub(1)) {
            consumed += token.len();

            if consumed <= self.offset {
                spaces += 1;
            }
        }

        write!(
            f,
            "{projection}\n{:width$}^",
            "",
            width = std::cmp::min(self.offset, tokens_length.saturating_sub(1)) + spaces
        )
    }
}
