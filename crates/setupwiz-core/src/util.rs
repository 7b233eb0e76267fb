//! Helpers shared by the wizard core and the installer front end.

use std::env;
use std::path::Path;

/// Longest engine or execution message written to the log, in chars.
const MESSAGE_LOG_LIMIT: usize = 240;

/// True when `program` names an existing file, either directly or through `$PATH`.
pub fn program_in_path(program: &str) -> bool {
    if program.trim().is_empty() {
        return false;
    }
    if program.contains('/') {
        return Path::new(program).is_file();
    }
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

/// Folds a multi-line engine or execution message onto one line and caps it
/// so a failing step cannot flood the log file.
pub fn log_snippet(message: &str) -> String {
    bounded_line(message, MESSAGE_LOG_LIMIT)
}

fn bounded_line(message: &str, limit: usize) -> String {
    let line = message.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.chars().count() <= limit {
        return line;
    }
    let mut cut: String = line.chars().take(limit).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_are_folded_onto_one_line() {
        let message = "copy LanHistory\n\ncaused by:\r\n  Permission denied (os error 13)";
        assert_eq!(
            log_snippet(message),
            "copy LanHistory caused by: Permission denied (os error 13)"
        );
        assert_eq!(log_snippet(""), "");
    }

    #[test]
    fn long_messages_are_capped() {
        let message = "step failed ".repeat(40);
        let snippet = log_snippet(&message);
        assert!(snippet.ends_with("..."));
        assert!(snippet.chars().count() <= MESSAGE_LOG_LIMIT + 3);
        assert_eq!(bounded_line("install failed", 7), "install...");
    }

    #[test]
    fn program_in_path_accepts_explicit_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let program = dir.path().join("LanHistory");
        std::fs::write(&program, b"#!/bin/sh\n").expect("write");
        assert!(program_in_path(program.to_str().expect("utf8")));
        assert!(!program_in_path(
            dir.path().join("missing").to_str().expect("utf8")
        ));
        assert!(!program_in_path(" "));
    }
}
