//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a collection row: name highlighted, size right-aligned.
    pub(crate) fn collection(&self, name: &str, size: usize) {
        let _ = self
            .term
            .write_line(&collection_row(&self.cyan_bold, name, size));
    }
}

/// Pads the plain name before styling so escape codes don't count toward the width.
fn collection_row(style: &Style, name: &str, size: usize) -> String {
    let padded = format!("{name:<40}");
    format!("{} {size:>6}", style.apply_to(padded))
}

#[cfg(test)]
mod tests {
    use console::{measure_text_width, strip_ansi_codes};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_collection_rows_align_with_colors() {
        let style = Style::new().cyan().bold().force_styling(true);

        let short = collection_row(&style, "nav", 3);
        let long = collection_row(&style, "portfolio-1wrmn", 120);

        assert_ne!(short.len(), measure_text_width(&short));
        assert_eq!(measure_text_width(&short), 47);
        assert_eq!(measure_text_width(&long), 47);
        assert_eq!(
            strip_ansi_codes(&short),
            format!("{:<40} {:>6}", "nav", 3)
        );
    }
}
