//! Overwrite confirmation on the terminal.

use std::io::{BufRead, IsTerminal};
use std::path::Path;

use moonshine_sdk::project::OverwritePrompt;

use crate::output;

/// Answers yes with `--force`, asks on a terminal, answers no otherwise.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConsolePrompt {
    force: bool,
}

impl ConsolePrompt {
    pub(crate) fn new(force: bool) -> Self {
        Self { force }
    }
}

impl OverwritePrompt for ConsolePrompt {
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        if self.force {
            return true;
        }

        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            output::warning(format!("{} already exists, skipping", path.display()));
            return false;
        }

        output::ask(format!(
            "{} already exists, are you sure you want to replace it? [y/N]",
            path.display()
        ));
        let mut answer = String::new();
        if stdin.lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_force_never_asks() {
        let mut prompt = ConsolePrompt::new(true);
        assert!(prompt.confirm_overwrite(Path::new("app/Models/Task.php")));
    }
}
