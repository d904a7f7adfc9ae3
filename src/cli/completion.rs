//! Tab completion for the interactive shell.

use rustyline::{
    completion::{Completer, Pair},
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

use expenseflow_config::Config;

/// Completes command names, their subcommands, config keys, and the names
/// of current members.
pub(crate) struct LedgerCompleter {
    commands: Vec<String>,
    members: Vec<String>,
}

impl LedgerCompleter {
    pub(crate) fn new(names: impl IntoIterator<Item = &'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_ascii_lowercase).collect();
        commands.sort();
        commands.dedup();
        Self {
            commands,
            members: Vec::new(),
        }
    }

    /// Called after every line so removed or added members show up.
    pub(crate) fn set_members(&mut self, members: &[String]) {
        self.members = members.to_vec();
    }

    /// Candidates for `word`, given the finished words before it on the line.
    pub(crate) fn candidates(&self, before: &[String], word: &str) -> Vec<String> {
        let lowered: Vec<String> = before.iter().map(|w| w.to_ascii_lowercase()).collect();
        let words: Vec<&str> = lowered.iter().map(String::as_str).collect();

        let options: Vec<String> = match words.as_slice() {
            [] | ["help"] => self.commands.clone(),
            ["member" | "expense"] => owned(&["add", "remove"]),
            ["config"] => owned(&["show", "set"]),
            ["config", "set"] => owned(&Config::KEYS),
            ["member", "remove" | "rm"] => self.members.clone(),
            // expense add <description> <amount> <payer> [split...]
            ["expense", "add", _, _, typed @ ..] => self
                .members
                .iter()
                .filter(|name| !typed.contains(&name.to_ascii_lowercase().as_str()))
                .cloned()
                .collect(),
            _ => Vec::new(),
        };

        let needle = word.to_lowercase();
        options
            .into_iter()
            .filter(|option| option.to_lowercase().starts_with(&needle))
            .collect()
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Splits the text before the cursor into finished words and the start of
/// the word being typed.
fn split_prefix(prefix: &str) -> (Vec<String>, usize) {
    let start = prefix
        .rfind(char::is_whitespace)
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let finished = &prefix[..start];
    let words = shell_words::split(finished)
        .unwrap_or_else(|_| finished.split_whitespace().map(str::to_string).collect());
    (words, start)
}

impl Completer for LedgerCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (before, start) = split_prefix(&line[..pos]);
        let pairs = self
            .candidates(&before, &line[start..pos])
            .into_iter()
            .map(|candidate| Pair {
                replacement: shell_words::quote(&candidate).into_owned(),
                display: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for LedgerCompleter {
    type Hint = String;
}

impl Highlighter for LedgerCompleter {}

impl Validator for LedgerCompleter {}

impl Helper for LedgerCompleter {}
