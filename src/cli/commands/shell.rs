//! shell command - Drive one session's repository line by line
//!
//! The shell issues a session, then maps each input line to a request on
//! the [`Service`]. Failed commands are reported and the shell keeps going;
//! when reading a script, the run fails at the end if any command failed.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context as _, Result};
use serde_json::json;
use tracing::{debug, error};

use crate::api::{
    BranchRequest, CheckoutRequest, CommitRequest, MergeRequest, Response, Service,
    SessionRequest,
};
use crate::cli::Context;
use crate::core::graph;
use crate::core::types::BranchName;
use crate::core::verify::{verify, VerifyError};
use crate::session::{lock, SessionId, SessionRegistry};
use crate::ui::output::{self, SHORT_ID_LEN};

const HELP: &str = "\
commit <message> [-- <content>]   record a commit on the current branch
branch                            list branches
branch <name>                     create a branch at HEAD
checkout <name>                   switch to (or create) a branch
merge <source> [into] [<target>]  merge source into target (default: current)
log [<branch>]                    full history, or one branch's first-parent chain
base <a> <b>                      nearest common ancestor of two branches
status                            current branch and counts
verify                            check repository invariants
clear                             start over from a fresh root
help                              show this list
exit                              leave the shell";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Commit { message: String, content: String },
    ListBranches,
    CreateBranch(BranchName),
    Checkout(BranchName),
    Merge {
        source: BranchName,
        target: Option<BranchName>,
    },
    Log(Option<String>),
    Base(String, String),
    Status,
    Verify,
    Clear,
    Help,
    Exit,
}

impl ShellCommand {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let (verb, args) = (words[0], &words[1..]);

        let command = match verb {
            "commit" => {
                let (message, content) = split_content(&line[verb.len()..]);
                ShellCommand::Commit {
                    message: message.to_string(),
                    content: content.to_string(),
                }
            }
            "branch" => match args {
                [] => ShellCommand::ListBranches,
                [name] => ShellCommand::CreateBranch(branch_name(name)?),
                _ => bail!("usage: branch [<name>]"),
            },
            "checkout" | "switch" => match args {
                [name] => ShellCommand::Checkout(branch_name(name)?),
                _ => bail!("usage: checkout <name>"),
            },
            "merge" => match args {
                [source] => ShellCommand::Merge {
                    source: branch_name(source)?,
                    target: None,
                },
                [source, target] | [source, "into", target] => ShellCommand::Merge {
                    source: branch_name(source)?,
                    target: Some(branch_name(target)?),
                },
                _ => bail!("usage: merge <source> [into] [<target>]"),
            },
            "log" => match args {
                [] => ShellCommand::Log(None),
                [branch] => ShellCommand::Log(Some((*branch).to_string())),
                _ => bail!("usage: log [<branch>]"),
            },
            "base" => match args {
                [a, b] => ShellCommand::Base((*a).to_string(), (*b).to_string()),
                _ => bail!("usage: base <a> <b>"),
            },
            "status" => ShellCommand::Status,
            "verify" => ShellCommand::Verify,
            "clear" | "reset" => ShellCommand::Clear,
            "help" | "?" => ShellCommand::Help,
            "exit" | "quit" => ShellCommand::Exit,
            other => bail!("unknown command '{other}' (try 'help')"),
        };

        Ok(Some(command))
    }

    /// Whether the command can change repository state.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            ShellCommand::Commit { .. }
                | ShellCommand::CreateBranch(_)
                | ShellCommand::Checkout(_)
                | ShellCommand::Merge { .. }
                | ShellCommand::Clear
        )
    }
}

/// Split commit text at the first standalone `--` word, keeping inner
/// whitespace of both halves intact.
fn split_content(text: &str) -> (&str, &str) {
    let mut offset = 0;
    for word in text.split_whitespace() {
        let start = offset + text[offset..].find(word).unwrap_or(0);
        if word == "--" {
            return (text[..start].trim(), text[start + 2..].trim());
        }
        offset = start + word.len();
    }
    (text.trim(), "")
}

fn branch_name(s: &str) -> Result<BranchName> {
    BranchName::new(s).map_err(|e| anyhow!(e))
}

/// Whether to keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// A shell bound to one session.
pub struct ShellSession<'a> {
    ctx: &'a Context,
    service: Service,
    session_id: SessionId,
}

impl<'a> ShellSession<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        let registry = Arc::new(SessionRegistry::new(ctx.config.repository_settings()));
        let service = Service::new(registry);
        let session_id = service.new_session().session_id;
        Self {
            ctx,
            service,
            session_id,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    fn session(&self) -> SessionRequest {
        SessionRequest {
            session_id: self.session_id,
        }
    }

    fn current_branch(&self) -> String {
        self.service.status(self.session()).status.current_branch
    }

    /// Execute one command, returning its output text.
    pub fn execute(&self, command: ShellCommand) -> Result<(String, Flow)> {
        let mutating = command.is_mutating();
        let result = self.run(command)?;

        if mutating && self.ctx.debug {
            let repo = self.service.registry().get_or_create(&self.session_id);
            let report = verify(&lock(&repo));
            report_violations(&report.errors, &mut io::stderr().lock())?;
        }

        Ok(result)
    }

    fn render(&self, response: Response, text: String) -> Result<String> {
        if self.ctx.json {
            Ok(serde_json::to_string(&response)?)
        } else {
            Ok(text)
        }
    }

    fn run(&self, command: ShellCommand) -> Result<(String, Flow)> {
        let session_id = self.session_id;
        debug!(?command, "shell command");

        let out = match command {
            ShellCommand::Commit { message, content } => {
                let response = self.service.commit(CommitRequest {
                    session_id,
                    message,
                    content,
                });
                let branch = self.current_branch();
                let text = format!("[{} {}] {}", branch, response.commit_id, response.message);
                self.render(Response::Commit(response), text)?
            }
            ShellCommand::ListBranches => {
                let log = self.service.log(self.session());
                let text = output::format_branches(&log.branches, &log.current_branch);
                if self.ctx.json {
                    serde_json::to_string(&log.branches)?
                } else {
                    text
                }
            }
            ShellCommand::CreateBranch(branch_name) => {
                let response = self.service.create_branch(BranchRequest {
                    session_id,
                    branch_name,
                })?;
                let text = response.message.clone();
                self.render(Response::Branch(response), text)?
            }
            ShellCommand::Checkout(branch_name) => {
                let response = self.service.checkout(CheckoutRequest {
                    session_id,
                    branch_name,
                })?;
                let text = if response.created {
                    format!("Switched to a new branch: {}", response.current_branch)
                } else {
                    response.message.clone()
                };
                self.render(Response::Checkout(response), text)?
            }
            ShellCommand::Merge { source, target } => {
                let target = match target {
                    Some(t) => t,
                    None => branch_name(&self.current_branch())?,
                };
                let response = self.service.merge(MergeRequest {
                    session_id,
                    source_branch: source,
                    target_branch: target,
                })?;
                let text = format!("{} ({})", response.message, response.merge_commit_id);
                self.render(Response::Merge(response), text)?
            }
            ShellCommand::Log(None) => {
                let log = self.service.log(self.session());
                let text = output::format_log(&log.commits, &log.current_branch);
                self.render(Response::Log(log), text)?
            }
            ShellCommand::Log(Some(branch)) => self.first_parent_log(&branch)?,
            ShellCommand::Base(a, b) => self.merge_base(&a, &b)?,
            ShellCommand::Status => {
                let status = self.service.status(self.session());
                let text = output::format_status(&status.status);
                self.render(Response::Status(status), text)?
            }
            ShellCommand::Verify => {
                let repo = self.service.registry().get_or_create(&session_id);
                let report = verify(&lock(&repo));
                if !report.ok {
                    let errors: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
                    bail!("verification failed:\n{}", output::format_list(&errors, "  "));
                }
                if self.ctx.json {
                    json!({ "success": true }).to_string()
                } else {
                    "ok".to_string()
                }
            }
            ShellCommand::Clear => {
                let response = self.service.clear(self.session());
                let text = response.message.clone();
                self.render(Response::Clear(response), text)?
            }
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Exit => return Ok((String::new(), Flow::Exit)),
        };

        Ok((out, Flow::Continue))
    }

    fn first_parent_log(&self, branch: &str) -> Result<String> {
        let repo = self.service.registry().get_or_create(&self.session_id);
        let repo = lock(&repo);
        let chain = graph::first_parent_chain(&repo, branch)
            .ok_or_else(|| anyhow!("branch '{branch}' not found"))?;

        if self.ctx.json {
            return Ok(serde_json::to_string(&chain)?);
        }

        let lines: Vec<String> = chain
            .iter()
            .filter_map(|id| repo.commit(id))
            .map(|c| format!("{} {}", c.id().short(SHORT_ID_LEN), c.message()))
            .map(|l| l.trim_end().to_string())
            .collect();
        Ok(lines.join("\n"))
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<String> {
        let repo = self.service.registry().get_or_create(&self.session_id);
        let repo = lock(&repo);
        let head_of = |name: &str| {
            repo.branch(name)
                .map(|br| br.head_commit().clone())
                .ok_or_else(|| anyhow!("branch '{name}' not found"))
        };
        let (head_a, head_b) = (head_of(a)?, head_of(b)?);

        let base = graph::merge_base(&repo, &head_a, &head_b)
            .ok_or_else(|| anyhow!("no common ancestor of '{a}' and '{b}'"))?;
        if self.ctx.json {
            Ok(json!({ "merge_base": base }).to_string())
        } else {
            Ok(base.to_string())
        }
    }
}

/// Write invariant violations found after a command. Printed regardless
/// of verbosity.
fn report_violations(errors: &[VerifyError], out: &mut impl Write) -> io::Result<()> {
    for err in errors {
        error!(error = %err, "invariant violated");
        writeln!(out, "error: invariant violated: {err}")?;
    }
    Ok(())
}

/// Run the shell over `script`, or standard input if `None`.
pub fn shell(ctx: &Context, script: Option<&Path>) -> Result<()> {
    let session = ShellSession::new(ctx);
    debug!(session = %session.session_id(), "shell started");

    match script {
        Some(path) => {
            let input = File::open(path)
                .with_context(|| format!("Failed to open script '{}'", path.display()))?;
            let failed = run_lines(&session, BufReader::new(input), false)?;
            if failed > 0 {
                bail!("{failed} command(s) failed");
            }
            Ok(())
        }
        None => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal() && !ctx.quiet;
            run_lines(&session, stdin.lock(), prompt)?;
            Ok(())
        }
    }
}

/// Feed lines to the shell. Returns how many commands failed.
fn run_lines(session: &ShellSession<'_>, input: impl BufRead, prompt: bool) -> Result<usize> {
    let verbosity = session.ctx.verbosity();
    let mut failed = 0;
    let mut lines = input.lines();

    loop {
        if prompt {
            print!("gitsim ({})> ", session.current_branch());
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else { break };
        let line = line.context("Failed to read input")?;

        let outcome = ShellCommand::parse(&line).and_then(|parsed| match parsed {
            Some(command) => session.execute(command).map(Some),
            None => Ok(None),
        });

        match outcome {
            Ok(Some((_, Flow::Exit))) => break,
            Ok(Some((text, Flow::Continue))) => {
                if !text.is_empty() {
                    output::print(text, verbosity);
                }
            }
            Ok(None) => {}
            Err(err) => {
                failed += 1;
                output::error(format!("{err:#}"));
            }
        }
    }

    Ok(failed)
}
