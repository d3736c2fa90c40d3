//! Command interpreter
//!
//! A fixed table of commands, each mapped to a canned response or an
//! action. Every execution is echoed into the threat feed.

use super::scheduler::TimerId;
use super::{Dashboard, Task};
use crate::config::OperatorProfile;
use crate::data::{sources, Section, Severity};
use std::time::Duration;
use tracing::info;

const FLASH_DURATION: Duration = Duration::from_millis(500);

/// What a command does when executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    Respond(String),
    Clear,
    SwitchSection(Section),
    Matrix,
}

/// Static command vocabulary, in help order
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<(&'static str, CommandAction)>,
}

impl CommandTable {
    pub fn new(operator: &OperatorProfile) -> Self {
        let respond = |text: &str| CommandAction::Respond(text.to_string());
        Self {
            entries: vec![
                ("help", respond("Available commands: help, clear, status, scan, profile, ops, tools, arsenal, intel, contact, uptime, whoami")),
                ("clear", CommandAction::Clear),
                ("status", respond("System Status: OPERATIONAL | Threat Level: GREEN | Uptime: 99.9%")),
                ("scan", respond("Initiating network scan... 65535 ports analyzed. 3 services detected.")),
                ("profile", CommandAction::SwitchSection(Section::Profile)),
                ("ops", CommandAction::SwitchSection(Section::Operations)),
                ("operations", CommandAction::SwitchSection(Section::Operations)),
                ("tools", CommandAction::SwitchSection(Section::Tools)),
                ("arsenal", CommandAction::SwitchSection(Section::Arsenal)),
                ("intel", CommandAction::SwitchSection(Section::Intel)),
                ("contact", CommandAction::SwitchSection(Section::Contact)),
                ("uptime", respond("System uptime: 365 days, 23 hours, 59 minutes")),
                ("whoami", CommandAction::Respond(format!(
                    "{}@{}: {}",
                    operator.handle, operator.host, operator.title
                ))),
                ("matrix", CommandAction::Matrix),
            ],
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandAction> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, action)| action)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Command names starting with `prefix`
    pub fn complete(&self, prefix: &str) -> Vec<&'static str> {
        self.names().filter(|n| n.starts_with(prefix)).collect()
    }
}

/// Command input line state
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    pub input: String,
    history: Vec<String>,
    pub focused: bool,
    pub cursor_visible: bool,
    /// Border highlight after a response
    pub flash: bool,
    flash_timer: Option<TimerId>,
}

impl CommandLine {
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
        self.cursor_visible = focused;
    }

    pub(super) fn toggle_cursor(&mut self) {
        self.cursor_visible = self.focused && !self.cursor_visible;
    }
}

/// Result of one command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    pub response: String,
    pub found: bool,
}

/// Result of tab completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Filled(&'static str),
    Ambiguous(Vec<&'static str>),
    NoMatch,
}

impl Dashboard {
    /// Run a command. Input is trimmed and lowercased first.
    pub fn execute(&mut self, command: &str) -> CommandOutcome {
        let command = command.trim().to_lowercase();
        info!(command = %command, "executing command");
        self.terminal.history.push(command.clone());

        let action = self.commands.lookup(&command).cloned();
        let found = action.is_some();
        let response = match action {
            Some(CommandAction::Respond(text)) => text,
            Some(CommandAction::Clear) => {
                self.feed.clear();
                "Security feed cleared.".to_string()
            }
            Some(CommandAction::SwitchSection(section)) => {
                self.activate(section);
                format!("Switching to {} module...", section.id().to_uppercase())
            }
            Some(CommandAction::Matrix) => {
                self.activate_matrix_mode();
                "Matrix mode engaged.".to_string()
            }
            None => {
                let msg = format!("Command not found: {command}. Type 'help' for available commands.");
                info!("{msg}");
                msg
            }
        };

        self.show_command_response(&response);
        self.log_feed(
            sources::TERMINAL,
            format!("Command executed: {command}"),
            Severity::Info,
        );

        CommandOutcome {
            command,
            response,
            found,
        }
    }

    /// Enter on the command line. Blank input is ignored.
    pub fn submit_command(&mut self) -> Option<CommandOutcome> {
        if self.terminal.input.trim().is_empty() {
            return None;
        }
        let input = std::mem::take(&mut self.terminal.input);
        Some(self.execute(&input))
    }

    /// Arrow-up: put the last command back in the input
    pub fn recall_previous(&mut self) {
        if let Some(last) = self.terminal.history.last() {
            self.terminal.input = last.clone();
        }
    }

    /// Tab: fill in a command when the prefix is unambiguous
    pub fn complete_command(&mut self) -> Completion {
        let prefix = self.terminal.input.to_lowercase();
        let matches = self.commands.complete(&prefix);
        match matches.len() {
            0 => Completion::NoMatch,
            1 => {
                let only = matches[0];
                self.terminal.input = only.to_string();
                Completion::Filled(only)
            }
            _ => {
                info!("Available commands: {}", matches.join(", "));
                Completion::Ambiguous(matches)
            }
        }
    }

    fn show_command_response(&mut self, response: &str) {
        info!(target: "terminal", "{response}");
        if let Some(timer) = self.terminal.flash_timer.take() {
            self.scheduler.cancel(timer);
        }
        self.terminal.flash = true;
        self.terminal.flash_timer = Some(self.scheduler.after(FLASH_DURATION, Task::CommandFlashEnd));
        self.log_feed(sources::SYSTEM, response, Severity::Info);
    }
}
