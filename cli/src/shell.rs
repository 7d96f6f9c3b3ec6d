//! Interactive loop over a `Session`.
//!
//! Each line is one user action. After every action the whole view is
//! rendered again, the way a page re-renders after a state change.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use student_core::{Field, RequestState, Session, StudentId, Transport};
use tracing::info;

use crate::render::render_view;

const HELP: &str = "\
commands:
  list | refresh          re-fetch the student list
  edit <id>               load a listed student into the form
  set <field> <value>     set name, email or course on the form
  submit                  add or update the student in the form
  reset                   clear the form
  delete <id>             delete a student
  show                    render the view again
  help                    this text
  quit                    leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Refresh,
    Edit(StudentId),
    Set(Field, String),
    Submit,
    Reset,
    Delete(StudentId),
    Show,
    Help,
    Quit,
}

fn parse_id(arg: Option<&str>) -> Result<StudentId, String> {
    let arg = arg.ok_or("missing student id")?;
    arg.parse().map_err(|_| format!("invalid student id `{arg}`"))
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim_start()),
            None => (line, ""),
        };
        let arg = Some(rest).filter(|r| !r.is_empty());
        match verb {
            "list" | "refresh" | "ls" => Ok(ShellCommand::Refresh),
            "edit" => parse_id(arg).map(ShellCommand::Edit),
            "delete" | "rm" => parse_id(arg).map(ShellCommand::Delete),
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (rest, ""),
                };
                if field.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                Ok(ShellCommand::Set(field.parse()?, value.to_string()))
            }
            "submit" | "save" => Ok(ShellCommand::Submit),
            "reset" | "new" => Ok(ShellCommand::Reset),
            "show" | "" => Ok(ShellCommand::Show),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" => Ok(ShellCommand::Quit),
            other => Err(format!("unknown command `{other}` (try `help`)")),
        }
    }
}

/// Apply one command. Returns `false` when the shell should stop.
pub fn apply<T: Transport>(
    session: &mut Session<T>,
    command: ShellCommand,
    out: &mut impl Write,
) -> io::Result<bool> {
    let result = match command {
        ShellCommand::Quit => return Ok(false),
        ShellCommand::Help => {
            out.write_all(HELP.as_bytes())?;
            return Ok(true);
        }
        ShellCommand::Show => Ok(()),
        ShellCommand::Refresh => session.refresh().map(|state| {
            if state == RequestState::Failed {
                info!("list refresh failed; showing the previous list");
            }
        }),
        ShellCommand::Edit(id) => session.edit(id),
        ShellCommand::Set(field, value) => {
            session.set_field(field, value);
            Ok(())
        }
        ShellCommand::Submit => session.submit().map(|_| ()),
        ShellCommand::Reset => {
            session.reset();
            Ok(())
        }
        ShellCommand::Delete(id) => session.delete(id).map(|_| ()),
    };
    if let Err(err) = result {
        writeln!(out, "error: {err}")?;
    }
    write!(out, "\n{}", render_view(session.view()))?;
    Ok(true)
}

pub fn run<T: Transport>(
    session: &mut Session<T>,
    input: impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    session.mount();
    write!(out, "{}", render_view(session.view()))?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let keep_going = match line?.parse::<ShellCommand>() {
            Ok(command) => apply(session, command, out)?,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                true
            }
        };
        if !keep_going {
            break;
        }
        write!(out, "> ")?;
        out.flush()?;
    }

    session.unmount();
    Ok(())
}
