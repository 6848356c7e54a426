//! Terminal pager for console output.
//!
//! The command is looked up in order:
//!
//! 1. `DEVDOCS_PAGER`
//! 2. `[pager] command` from the configuration file
//! 3. `PAGER`, with `less` normalised by appending `-+R -+F`
//! 4. `less -R -F`
//!
//! `$DEVDOCS_FILENAME` and `$DEVDOCS_LANGUAGE` (also `${...}`) are expanded in
//! the command and exported to the pager process, so a pager such as
//! `bat --file-name $DEVDOCS_FILENAME -l $DEVDOCS_LANGUAGE` can label its output.

use anyhow::{Context, Result, anyhow, bail};
use std::io::{self, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use tracing::debug;

const DEFAULT_PAGER: &str = "less -R -F";

/// Values exposed to the pager command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagerVars {
    /// Value of `$FILENAME`.
    pub filename: String,
    /// Value of `$LANGUAGE`.
    pub language: String,
}

impl PagerVars {
    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "DEVDOCS_FILENAME" => Some(&self.filename),
            "DEVDOCS_LANGUAGE" => Some(&self.language),
            _ => None,
        }
    }

    fn env(&self) -> [(&'static str, &str); 2] {
        [
            ("DEVDOCS_FILENAME", &self.filename),
            ("DEVDOCS_LANGUAGE", &self.language),
        ]
    }
}

/// A parsed pager command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    /// Executable to run.
    pub program: String,
    /// Arguments, before variable expansion.
    pub args: Vec<String>,
    /// Values substituted into `args`.
    pub vars: PagerVars,
}

impl Pager {
    /// Parse `command` after expanding variables. With `normalize`, a `less`
    /// pager gets `-+R -+F` appended.
    pub fn new<F>(command: &str, vars: PagerVars, normalize: bool, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expanded = expand(command, |name| {
            vars.lookup(name).map(str::to_string).or_else(|| env(name))
        });
        let mut words = split_words(&expanded)?.into_iter();
        let program = words
            .next()
            .ok_or_else(|| anyhow!("pager command is empty"))?;
        let mut args: Vec<String> = words.collect();

        if normalize && program == "less" {
            args.extend(["-+R".to_string(), "-+F".to_string()]);
        }

        Ok(Self {
            program,
            args,
            vars,
        })
    }

    /// Pick the pager from the environment and the configured command.
    pub fn lookup<F>(configured: Option<&str>, vars: PagerVars, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |name: &str| env(name).filter(|v| !v.is_empty());

        if let Some(cmd) = set("DEVDOCS_PAGER") {
            return Self::new(&cmd, vars, false, &env);
        }
        if let Some(cmd) = configured.filter(|c| !c.is_empty()) {
            return Self::new(cmd, vars, false, &env);
        }
        if let Some(cmd) = set("PAGER") {
            return Self::new(&cmd, vars, true, &env);
        }
        Self::new(DEFAULT_PAGER, vars, false, &env)
    }

    /// Start the pager with stdout and stderr inherited.
    pub fn spawn(&self) -> Result<PagerWriter> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.vars.env())
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        debug!(program = %self.program, args = ?self.args, "starting pager");

        let mut child = cmd
            .spawn()
            .with_context(|| format!("could not start pager '{}'", self.program))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("could not open pipe to pager"))?;

        Ok(PagerWriter {
            stdin: Some(stdin),
            child,
        })
    }
}

/// Pipe into a running pager.
///
/// Writes after the pager exits (the user quit early) are swallowed.
pub struct PagerWriter {
    stdin: Option<ChildStdin>,
    child: Child,
}

impl PagerWriter {
    /// Close the pipe and wait for the pager to exit.
    pub fn finish(mut self) -> Result<()> {
        drop(self.stdin.take());
        let status = self.child.wait().context("pager did not exit cleanly")?;
        debug!(%status, "pager exited");
        Ok(())
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Ok(buf.len());
        };
        match stdin.write(buf) {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(buf.len()),
            other => other,
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Ok(());
        };
        match stdin.flush() {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            other => other,
        }
    }
}

/// Expand `$NAME` and `${NAME}`. Unknown names expand to nothing.
fn expand<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(close) = braced.find('}') {
                out.push_str(&lookup(&braced[..close]).unwrap_or_default());
                rest = &braced[close + 1..];
                continue;
            }
        }

        let len = after
            .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
            .unwrap_or(after.len());
        if len == 0 {
            out.push('$');
        } else {
            out.push_str(&lookup(&after[..len]).unwrap_or_default());
        }
        rest = &after[len..];
    }

    out.push_str(rest);
    out
}

/// Split a command line into words, honouring single quotes, double quotes,
/// and backslash escapes.
fn split_words(input: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => word.push(ch),
                        None => bail!("unterminated single quote in pager command"),
                    }
                }
            },
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(ch @ ('"' | '\\' | '$')) => word.push(ch),
                            Some(ch) => {
                                word.push('\\');
                                word.push(ch);
                            },
                            None => bail!("unterminated double quote in pager command"),
                        },
                        Some(ch) => word.push(ch),
                        None => bail!("unterminated double quote in pager command"),
                    }
                }
            },
            '\\' => {
                in_word = true;
                if let Some(ch) = chars.next() {
                    word.push(ch);
                }
            },
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            },
            c => {
                in_word = true;
                word.push(c);
            },
        }
    }

    if in_word {
        words.push(word);
    }
    Ok(words)
}
