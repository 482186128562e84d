//! Line-oriented explorer shell.
//!
//! # Responsibility
//! - Parse one command per input line.
//! - Apply commands to the tree store relative to the navigation cursor.
//! - Produce printable output; printing itself stays in `main`.
//!
//! # Invariants
//! - Every failure is recoverable; the shell keeps its state on error.
//! - The cursor always points at a live directory after a command.

use explorer_core::{
    InMemoryTreeRepository, Navigator, NodeId, NodeKind, TreeResult, TreeService,
    TreeServiceError,
};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const HELP: &str = "\
commands:
  ls                     list the current directory
  cd <path>              change directory (`..`, `/`, relative or absolute)
  pwd                    print the current path
  mkdir <name>           create a directory here
  touch <name> [text]    create a file here with optional content
  rm <name>              remove every child with this name
  cat <path>             print a file
  find <name>            locate the first node with this name
  tree                   render the current directory
  dump                   print the current directory as JSON
  help                   show this message
  exit                   leave the shell";

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    ChangeDir(String),
    PrintPath,
    MakeDir(String),
    Touch { name: String, content: String },
    Remove(String),
    Cat(String),
    Find(String),
    Tree,
    Dump,
    Help,
    Exit,
}

/// Errors surfaced to the shell user.
#[derive(Debug)]
pub enum ShellError {
    /// Unknown command word.
    UnknownCommand(String),
    /// Command is missing its argument.
    MissingArgument(&'static str),
    /// Tree store rejected the operation.
    Tree(TreeServiceError),
    /// JSON dump failed.
    Json(serde_json::Error),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(word) => write!(f, "unknown command `{word}`; try `help`"),
            Self::MissingArgument(command) => write!(f, "`{command}` needs an argument"),
            Self::Tree(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "cannot encode dump: {err}"),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeServiceError> for ShellError {
    fn from(value: TreeServiceError) -> Self {
        Self::Tree(value)
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let command = match word {
            "" => return Ok(None),
            "ls" => Self::List,
            "cd" => Self::ChangeDir(if rest.is_empty() { "/" } else { rest }.to_string()),
            "pwd" => Self::PrintPath,
            "mkdir" => Self::MakeDir(required(rest, "mkdir")?),
            "touch" => {
                let (name, content) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Self::Touch {
                    name: required(name, "touch")?,
                    content: content.trim_start().to_string(),
                }
            }
            "rm" => Self::Remove(required(rest, "rm")?),
            "cat" => Self::Cat(required(rest, "cat")?),
            "find" => Self::Find(required(rest, "find")?),
            "tree" => Self::Tree,
            "dump" => Self::Dump,
            "help" => Self::Help,
            "exit" | "quit" => Self::Exit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

impl Command {
    /// Stable command word for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::List => "ls",
            Self::ChangeDir(_) => "cd",
            Self::PrintPath => "pwd",
            Self::MakeDir(_) => "mkdir",
            Self::Touch { .. } => "touch",
            Self::Remove(_) => "rm",
            Self::Cat(_) => "cat",
            Self::Find(_) => "find",
            Self::Tree => "tree",
            Self::Dump => "dump",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }
}

fn required(value: &str, command: &'static str) -> Result<String, ShellError> {
    if value.is_empty() {
        return Err(ShellError::MissingArgument(command));
    }
    Ok(value.to_string())
}

/// Tree store plus navigation cursor.
pub struct Shell {
    service: TreeService<InMemoryTreeRepository>,
    nav: Navigator,
}

impl Shell {
    pub fn new(service: TreeService<InMemoryTreeRepository>) -> Self {
        let nav = Navigator::new(&service);
        Self { service, nav }
    }

    pub fn service(&self) -> &TreeService<InMemoryTreeRepository> {
        &self.service
    }

    /// Prompt text showing the current path.
    pub fn prompt(&self) -> String {
        let path = self
            .nav
            .path(&self.service)
            .unwrap_or_else(|_| "?".to_string());
        format!("{path}> ")
    }

    /// Runs one command and returns the text to print.
    pub fn execute(&mut self, command: &Command) -> Result<String, ShellError> {
        let current = self.nav.current();
        let output = match command {
            Command::List => self.list(current)?,
            Command::ChangeDir(path) => {
                self.nav.change_dir(&self.service, path)?;
                String::new()
            }
            Command::PrintPath => self.nav.path(&self.service)?,
            Command::MakeDir(name) => {
                self.service.create_directory(current, name)?;
                String::new()
            }
            Command::Touch { name, content } => {
                self.service.create_file(current, name, content.as_str())?;
                String::new()
            }
            Command::Remove(name) => {
                let removed = self.service.remove(current, name)?;
                self.nav.revalidate(&self.service);
                match removed {
                    0 => return Err(TreeServiceError::NameNotFound(name.clone()).into()),
                    1 => "removed 1 entry".to_string(),
                    n => format!("removed {n} entries"),
                }
            }
            Command::Cat(path) => {
                let node = self.service.resolve_path(current, path)?;
                self.service.read_file(node.id)?.to_string()
            }
            Command::Find(name) => {
                let node = self.service.require_by_name(self.service.root_id(), name)?;
                self.service.path_of(node.id)?
            }
            Command::Tree => self.service.render_tree(current)?.trim_end().to_string(),
            Command::Dump => serde_json::to_string_pretty(&self.service.snapshot(current)?)?,
            Command::Help => HELP.to_string(),
            Command::Exit => String::new(),
        };
        debug!(
            "event=shell_command module=cli status=ok command={}",
            command.label()
        );
        Ok(output)
    }

    fn list(&self, directory_id: NodeId) -> TreeResult<String> {
        let mut lines = Vec::new();
        if !self.nav.is_at_root() {
            lines.push("..".to_string());
        }
        for child in self.service.list_children(directory_id)? {
            match child.kind() {
                NodeKind::Directory => lines.push(format!("{}/", child.name)),
                NodeKind::File => lines.push(child.name.clone()),
            }
        }
        Ok(lines.join("\n"))
    }
}

/// Builds the sample tree the explorer starts with.
pub fn seed_demo_tree(service: &mut TreeService<InMemoryTreeRepository>) -> TreeResult<()> {
    let root = service.root_id();
    let documents = service.create_directory(root, "documents")?.id;
    let pictures = service.create_directory(root, "pictures")?.id;
    service.create_directory(pictures, "vacation")?;
    let work = service.create_directory(documents, "work")?.id;
    service.create_file(
        work,
        "report",
        "Content of the report.\nlorem ipsum dolor sit amet.",
    )?;
    Ok(())
}
