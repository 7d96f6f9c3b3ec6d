//! `student-cli`: terminal front end for the student records backend.
//!
//! One-shot subcommands map onto the four record-store operations; `shell`
//! (the default) runs the interactive view.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use student_core::{
    ApiError, Draft, RecordStore, Session, StudentClient, StudentId, StudentInput, DEFAULT_BASE_URL,
};
use tracing_subscriber::EnvFilter;

mod render;
mod shell;
mod transport;

use render::render_list;
use transport::UreqTransport;

#[derive(Debug, Parser)]
#[command(name = "student-cli", version, about = "Manage student records on a REST backend")]
struct Cli {
    /// Base URL of the students backend.
    #[arg(long, env = "STUDENTS_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all students in server order.
    List {
        /// Print the raw records as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Add a student.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        course: String,
    },
    /// Replace a student's fields; omitted fields keep their current value.
    Update {
        id: StudentId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        course: Option<String>,
    },
    /// Delete a student.
    Delete { id: StudentId },
    /// Interactive form and list (default).
    Shell,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

/// Prefer the message the server addressed to the user.
fn user_facing(err: ApiError) -> anyhow::Error {
    match err.server_message() {
        Some(message) => anyhow!(message),
        None => anyhow::Error::new(err),
    }
}

fn require_filled(draft: &Draft) -> Result<()> {
    if let Some(field) = draft.missing_field() {
        bail!("{field} is required");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let client = StudentClient::new(&cli.base_url);
    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let mut session = Session::new(client, UreqTransport::new());
            let stdin = std::io::stdin();
            shell::run(&mut session, stdin.lock(), &mut std::io::stdout())?;
        }
        Command::List { json } => {
            let mut store = RecordStore::new(client, UreqTransport::new());
            let students = store.list_students().context("failed to list students")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&students)?);
            } else {
                print!("{}", render_list(&students));
            }
        }
        Command::Add { name, email, course } => {
            let draft = Draft {
                id: None,
                name,
                email,
                course,
            };
            require_filled(&draft)?;
            let mut store = RecordStore::new(client, UreqTransport::new());
            let student = store.create_student(&draft.to_input()).map_err(user_facing)?;
            println!("added student #{}", student.id);
        }
        Command::Update {
            id,
            name,
            email,
            course,
        } => {
            let mut store = RecordStore::new(client, UreqTransport::new());
            let current = store
                .list_students()
                .context("failed to list students")?
                .into_iter()
                .find(|s| s.id == id)
                .ok_or_else(|| anyhow!("no student with id {id}"))?;
            let mut draft = Draft::from(&current);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(email) = email {
                draft.email = email;
            }
            if let Some(course) = course {
                draft.course = course;
            }
            require_filled(&draft)?;
            let input: StudentInput = draft.to_input();
            let student = store.update_student(id, &input).map_err(user_facing)?;
            println!("updated student #{}", student.id);
        }
        Command::Delete { id } => {
            let mut store = RecordStore::new(client, UreqTransport::new());
            store
                .delete_student(id)
                .with_context(|| format!("failed to delete student {id}"))?;
            println!("deleted student #{id}");
        }
    }
    Ok(())
}
