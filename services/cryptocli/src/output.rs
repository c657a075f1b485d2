//! Rendering of command results.
//!
//! Replies, notes and error messages all go to stdout framed by blank
//! lines. Logs stay on stderr.

use crate::error::CliError;

/// What a successful command prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    body: String,
    note: Option<String>,
}

impl Report {
    /// Reply body, optionally followed by a note such as
    /// `Key successfully created: <name>`.
    #[must_use]
    pub fn reply(body: impl Into<String>, note: Option<String>) -> Self {
        Self {
            body: body.into(),
            note,
        }
    }

    /// A single line of text.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self::reply(text, None)
    }

    /// Body as received.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Trailing note, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Text written to stdout.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = framed(&self.body);
        if let Some(note) = &self.note {
            out.push_str(note);
            out.push_str("\n\n");
        }
        out
    }

    /// Write to stdout.
    pub fn print(&self) {
        print!("{}", self.render());
    }
}

/// Text written to stdout for `err`.
#[must_use]
pub fn render_error(err: &CliError) -> String {
    framed(&err.to_string())
}

/// Report `err` on stdout.
pub fn print_error(err: &CliError) {
    print!("{}", render_error(err));
}

fn framed(text: &str) -> String {
    format!("\n{text}\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_is_framed_by_blank_lines() {
        let report = Report::reply(r#"{"tokenData":"x"}"#, None);
        assert_eq!(report.render(), "\n{\"tokenData\":\"x\"}\n\n");
    }

    #[test]
    fn test_note_follows_body() {
        let report = Report::reply("{}", Some("Key successfully created: k1".to_string()));
        assert_eq!(report.render(), "\n{}\n\nKey successfully created: k1\n\n");
        assert_eq!(report.note(), Some("Key successfully created: k1"));
    }

    #[test]
    fn test_errors_are_framed() {
        let err = CliError::invalid_input("Missing parameters. Please check and try again");
        assert_eq!(
            render_error(&err),
            "\nMissing parameters. Please check and try again\n\n"
        );
        let err = CliError::Denied("Action denied".into());
        assert_eq!(render_error(&err), "\nAction denied\n\n");
    }

    #[test]
    fn test_message() {
        let report = Report::message("cryptocli 0.1.0");
        assert_eq!(report.body(), "cryptocli 0.1.0");
        assert_eq!(report.note(), None);
    }
}
