use crate::parser::{ErrorContext, ParseError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Column widths for rendering the help message as: `left | middle | right*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Columns {
    pub(crate) padding: usize,
    pub(crate) left: usize,
    pub(crate) middle: usize,
    pub(crate) rights: Vec<usize>,
}

// We'll target 95% of the total width, to ensure the renderer doesn't literally use the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    columns: Columns,
}

impl ColumnRenderer {
    /// Produce a renderer which shrinks the middle column to fit the terminal, when one is known.
    pub(crate) fn guided(mut columns: Columns, total_width: Option<usize>) -> Self {
        columns.middle = std::cmp::max(columns.middle, MINIMUM_MIDDLE_WIDTH);

        if let Some(total_width) = total_width {
            // We always have a left and a middle (and a padding between them).
            let mut non_middle = columns.left + columns.padding;

            if !columns.rights.is_empty() {
                non_middle += columns.rights.iter().sum::<usize>()
                    + (columns.rights.len() * columns.padding);
            }

            let target_total_width = (total_width as f64 * TARGET_TOTAL_FACTOR) as usize;

            if columns.middle + non_middle > target_total_width {
                columns.middle = std::cmp::max(
                    target_total_width.saturating_sub(non_middle),
                    MINIMUM_MIDDLE_WIDTH,
                );
            }

            #[cfg(feature = "tracing_debug")]
            {
                debug!(
                    "Columns {non_middle} within total {total_width}; selecting middle: {}.",
                    columns.middle
                );
            }
        }

        Self { columns }
    }

    pub(crate) fn render(
        &self,
        indent: usize,
        left: &str,
        middle: &str,
        rights: &[String],
    ) -> Vec<String> {
        assert!(rights.len() <= self.columns.rights.len());
        let padding = " ".repeat(self.columns.padding);
        let left_width = self.columns.left;
        let middle_width = self.columns.middle.saturating_sub(indent).max(2);
        let right = rights
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{padding}{item:width$}", width = self.columns.rights[i]))
            .collect::<String>();
        let mut middle_parts = chunk(middle, middle_width);

        if middle_parts.is_empty() {
            middle_parts.push(String::default());
        }

        middle_parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let line = if i == 0 {
                    format!("{:indent$}{left:left_width$}{padding}{part:middle_width$}{right}", "")
                } else {
                    format!("{:indent$}{:left_width$}{padding}{part}", "", "")
                };
                line.trim_end().to_string()
            })
            .collect()
    }
}

/// Split the paragraph into lines of at most `width` characters, breaking on spaces.
pub(crate) fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.len() + word.len() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;

    while characters.len() - left > width {
        let part: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{part}-"));
        left += increment;
    }

    current.extend(&characters[left..]);
}

pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, error: ParseError);
    fn print_error_context(&self, error_context: ErrorContext);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: ParseError) {
        eprintln!("{error}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}
