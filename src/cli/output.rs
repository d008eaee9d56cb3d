//! Terminal rendering of docsift runs
//!
//! Progress notes (`success`, `warning`, `info`, `verbose`) go to stderr and
//! respect `--quiet`. The import report goes to stdout and is always printed,
//! so it can be piped.

use console::style;

/// Printer shared by every command, built from the global `-v`/`-q` flags.
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        self.note(style("✔").green(), message);
    }

    pub fn warning(&self, message: &str) {
        self.note(style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        self.note(style("ℹ").blue(), message);
    }

    /// Handler counts and similar detail, only with `-v`.
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            self.note(style("ℹ").dim(), &style(message).dim().to_string());
        }
    }

    fn note(&self, icon: console::StyledObject<&str>, message: &str) {
        if !self.quiet {
            eprintln!("{icon} {message}");
        }
    }

    /// First report line: whether the chains kept the document, and why not.
    pub fn verdict(&self, accepted: bool, reason: Option<&str>) {
        println!("{}", verdict_line(accepted, reason));
    }

    pub fn reference(&self, reference: &str) {
        println!("  {} {}", style("Reference:").dim(), style(reference).green().bold());
    }

    /// Heading of a report block such as the metadata or the content.
    pub fn section(&self, title: &str) {
        println!("\n{}", style(title).bold().cyan());
    }

    /// One metadata field with its values joined, indented by `depth` levels.
    pub fn field(&self, depth: usize, name: &str, values: &[String]) {
        println!("{}", field_line(depth, name, values));
    }

    pub fn child(&self, reference: &str) {
        println!("  • {reference}");
    }
}

fn verdict_line(accepted: bool, reason: Option<&str>) -> String {
    let (icon, label) = if accepted {
        (style("✓").green(), style("ACCEPTED").green())
    } else {
        (style("✗").red(), style("REJECTED").red())
    };
    match reason {
        Some(reason) => format!("{} {} {reason}", icon.bold(), label.bold()),
        None => format!("{} {}", icon.bold(), label.bold()),
    }
}

fn field_line(depth: usize, name: &str, values: &[String]) -> String {
    let indent = "  ".repeat(depth + 1);
    format!("{indent}{} {}", style(format!("{name}:")).dim(), values.join(", "))
}
