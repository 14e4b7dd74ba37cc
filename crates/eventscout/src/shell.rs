//! Interactive session driven by line-oriented input.
//!
//! Each line is parsed as a command, turned into an [`Action`] for the session and
//! the resulting page is rendered again.

use clap::{CommandFactory, Parser, Subcommand};
use std::io::{BufRead, Write};

use crate::display;
use crate::engine::Engine;
use crate::error::Result;
use crate::filters::{FilterArgs, FilterSelection};
use crate::session::{Action, Notice, Session, Transition};
use crate::views;

const PROMPT: &str = "eventscout> ";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Parser, Debug)]
#[command(name = "eventscout", no_binary_name = true)]
#[command(disable_help_subcommand = true, disable_version_flag = true)]
struct ShellLine {
  #[command(subcommand)]
  command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
enum ShellCommand {
  /// Get recommendations for a description of the event you want
  Search {
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    terms: Vec<String>,
  },
  /// Open the filter page
  Filters,
  /// Filter and sort the last recommendations
  Apply {
    #[command(flatten)]
    filters: FilterArgs,
  },
  /// Open the event at a listed position
  View {
    /// Position shown in brackets next to the event
    position: usize,
  },
  /// Leave the current page
  Back,
  /// Show the current page again with session times
  Page,
  /// List the selectable filter values
  Options,
  /// Show available commands
  Help,
  /// End the session
  #[command(alias = "exit")]
  Quit,
}

enum Flow {
  Continue,
  Quit,
}

pub struct Shell<'a> {
  engine: &'a Engine,
  session: Session,
  width: usize,
}

impl<'a> Shell<'a> {
  pub fn new(engine: &'a Engine) -> Self {
    Self { engine, session: Session::new(), width: display::terminal_width() }
  }

  pub fn with_width(mut self, width: usize) -> Self {
    self.width = width;
    self
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  /// Read commands until `quit` or end of input
  pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, output: &mut W) -> Result<()> {
    self.show_page(output)?;

    loop {
      write!(output, "{PROMPT}")?;
      output.flush()?;

      let mut line = String::new();
      if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        break;
      }

      if let Flow::Quit = self.execute(&line, output)? {
        break;
      }
    }

    tracing::debug!(started = %self.session.started_at, "shell session ended");
    Ok(())
  }

  /// Apply an action to the session and render the page it lands on
  pub fn dispatch<W: Write>(&mut self, action: Action, output: &mut W) -> Result<()> {
    let session = std::mem::take(&mut self.session);
    let Transition { session, notice } = session.reduce(action, self.engine);
    self.session = session;

    if let Some(notice) = notice {
      writeln!(output, "{}", display::render_notice(&notice))?;
    }
    self.show_page(output)
  }

  fn execute<W: Write>(&mut self, line: &str, output: &mut W) -> Result<Flow> {
    let words = match split_line(line) {
      Ok(words) => words,
      Err(message) => {
        writeln!(output, "{}", display::render_notice(&Notice::error(message)))?;
        return Ok(Flow::Continue);
      }
    };
    if words.is_empty() {
      return Ok(Flow::Continue);
    }

    let command = match ShellLine::try_parse_from(&words) {
      Ok(parsed) => parsed.command,
      Err(error) => {
        write!(output, "{}", error.render())?;
        return Ok(Flow::Continue);
      }
    };

    let action = match command {
      ShellCommand::Search { terms } => Action::Search(terms.join(" ")),
      ShellCommand::Filters => Action::OpenFilters,
      ShellCommand::Apply { filters } => Action::ApplyFilters(FilterSelection::from(&filters)),
      ShellCommand::View { position } => Action::ViewEvent(position),
      ShellCommand::Back => Action::Back,
      ShellCommand::Page => {
        self.show_status(output)?;
        self.show_page(output)?;
        return Ok(Flow::Continue);
      }
      ShellCommand::Options => {
        write!(output, "{}", display::render_options(self.engine.filter_options(), self.width))?;
        return Ok(Flow::Continue);
      }
      ShellCommand::Help => {
        write!(output, "{}", ShellLine::command().render_help())?;
        return Ok(Flow::Continue);
      }
      ShellCommand::Quit => return Ok(Flow::Quit),
    };

    self.dispatch(action, output)?;
    Ok(Flow::Continue)
  }

  fn show_page<W: Write>(&self, output: &mut W) -> Result<()> {
    let view = views::render(&self.session, self.engine)?;
    write!(output, "{}", display::render_view(&view, self.width))?;
    Ok(())
  }

  fn show_status<W: Write>(&self, output: &mut W) -> Result<()> {
    let session = &self.session;
    writeln!(output, "Page: {}", session.page)?;
    writeln!(
      output,
      "Recommendations: {}  Listed: {}",
      session.original.as_ref().map_or(0, |set| set.len()),
      session.display.as_ref().map_or(0, |set| set.len())
    )?;
    writeln!(output, "Started: {}", session.started_at.format(TIMESTAMP_FORMAT))?;
    writeln!(output, "Updated: {}", session.updated_at.format(TIMESTAMP_FORMAT))?;
    Ok(())
  }
}

/// Split a command line into words; double quotes group words and `\` escapes one character
fn split_line(line: &str) -> std::result::Result<Vec<String>, String> {
  let mut words = Vec::new();
  let mut current = String::new();
  let mut in_word = false;
  let mut quoted = false;
  let mut chars = line.chars();

  while let Some(c) = chars.next() {
    match c {
      '"' => {
        quoted = !quoted;
        in_word = true;
      }
      '\\' => {
        if let Some(next) = chars.next() {
          current.push(next);
          in_word = true;
        }
      }
      c if c.is_whitespace() && !quoted => {
        if in_word {
          words.push(std::mem::take(&mut current));
          in_word = false;
        }
      }
      c => {
        current.push(c);
        in_word = true;
      }
    }
  }

  if quoted {
    return Err("Unterminated quote in command.".to_string());
  }
  if in_word {
    words.push(current);
  }
  Ok(words)
}
