//! Command-line interface over [`ApiClient`].
//!
//! Every command prints a short text rendering by default, or the raw API
//! JSON with `--json`.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use tasktrail_shared::models::task::{Task, TaskCategory, TaskPriority, TaskStatus};
use tasktrail_shared::service::tasks::{NewTask, TaskUpdate};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::session::{FileSessionStore, SessionStore};

#[derive(Parser)]
#[command(name = "tasktrail")]
#[command(about = "TaskTrail CLI - manage organization tasks from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "TASKTRAIL_API_URL",
        default_value = "http://localhost:3000",
        help = "Base URL of the TaskTrail API"
    )]
    pub api_url: String,

    #[arg(
        long,
        global = true,
        env = "TASKTRAIL_SESSION_FILE",
        help = "Where the login session is kept"
    )]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Log in and store the session")]
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "TASKTRAIL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show the logged-in user")]
    Whoami,

    #[command(about = "Task operations")]
    Tasks {
        #[command(subcommand)]
        cmd: TaskCommands,
    },

    #[command(about = "List users in your organization")]
    Users,

    #[command(about = "Show the organization audit trail")]
    Audit,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    #[command(about = "List tasks")]
    List,

    #[command(about = "Show one task")]
    Get { id: Uuid },

    #[command(about = "Create a task")]
    Create {
        title: String,

        #[command(flatten)]
        fields: TaskFields,
    },

    #[command(about = "Change fields of a task")]
    Update {
        id: Uuid,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: TaskFields,

        #[arg(long, conflicts_with = "description", help = "Remove the description")]
        clear_description: bool,

        #[arg(long, conflicts_with = "due", help = "Remove the due date")]
        clear_due: bool,
    },

    #[command(about = "Delete a task")]
    Delete { id: Uuid },
}

#[derive(Args)]
pub struct TaskFields {
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_parser = wire_value::<TaskCategory>, help = "Work, Personal or General")]
    pub category: Option<TaskCategory>,

    #[arg(long, value_parser = wire_value::<TaskStatus>, help = "todo, in-progress or done")]
    pub status: Option<TaskStatus>,

    #[arg(long, value_parser = wire_value::<TaskPriority>, help = "low, medium or high")]
    pub priority: Option<TaskPriority>,

    #[arg(long, help = "RFC 3339 timestamp, e.g. 2026-01-31T17:00:00Z")]
    pub due: Option<DateTime<Utc>>,
}

/// Parses an enum argument using its JSON spelling
fn wire_value<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unrecognized value {:?}", raw))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

impl TaskCommands {
    fn new_task(title: String, fields: TaskFields) -> NewTask {
        NewTask {
            title,
            description: fields.description,
            category: fields.category,
            status: fields.status,
            priority: fields.priority,
            due_date: fields.due,
        }
    }

    fn task_update(
        title: Option<String>,
        fields: TaskFields,
        clear_description: bool,
        clear_due: bool,
    ) -> TaskUpdate {
        TaskUpdate {
            title,
            description: if clear_description {
                Some(None)
            } else {
                fields.description.map(Some)
            },
            category: fields.category,
            status: fields.status,
            priority: fields.priority,
            due_date: if clear_due {
                Some(None)
            } else {
                fields.due.map(Some)
            },
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = OutputFormat::from_cli(&cli);
    let path = cli
        .session_file
        .clone()
        .unwrap_or_else(FileSessionStore::default_path);

    let mut client = ApiClient::new(cli.api_url.clone(), FileSessionStore::new(path))
        .context("Failed to load the stored session")?;

    execute(&mut client, cli.command, format).await
}

/// Runs one command against `client`
pub async fn execute<S: SessionStore>(
    client: &mut ApiClient<S>,
    command: Commands,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let user = client.login(&email, &password).await?;
            match format {
                OutputFormat::Json => print_json(user)?,
                OutputFormat::Text => {
                    println!("Logged in as {} ({})", user.email, user.role)
                }
            }
        }
        Commands::Logout => {
            client.logout()?;
            if format == OutputFormat::Text {
                println!("Logged out");
            }
        }
        Commands::Whoami => match (client.current_user(), format) {
            (Some(user), OutputFormat::Json) => print_json(user)?,
            (Some(user), OutputFormat::Text) => {
                println!("{} ({})", user.email, user.role);
                println!("organization: {}", user.organization_id);
            }
            (None, OutputFormat::Json) => print_json(&serde_json::Value::Null)?,
            (None, OutputFormat::Text) => println!("Not logged in"),
        },
        Commands::Tasks { cmd } => execute_task_command(client, cmd, format).await?,
        Commands::Users => {
            let users = client.organization_users().await?;
            match format {
                OutputFormat::Json => print_json(&users)?,
                OutputFormat::Text => {
                    for user in &users {
                        println!("{:<8} {}  {}", user.role.as_str(), user.id, user.email);
                    }
                }
            }
        }
        Commands::Audit => {
            let entries = client.audit_log().await?;
            match format {
                OutputFormat::Json => print_json(&entries)?,
                OutputFormat::Text => {
                    for item in &entries {
                        let who = item
                            .user
                            .as_ref()
                            .map(|u| u.email.as_str())
                            .unwrap_or("<deleted user>");
                        println!(
                            "{}  {:<12} {} {}  by {}",
                            item.entry.timestamp.to_rfc3339(),
                            item.entry.action,
                            item.entry.resource,
                            item.entry.resource_id,
                            who
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

async fn execute_task_command<S: SessionStore>(
    client: &ApiClient<S>,
    cmd: TaskCommands,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        TaskCommands::List => {
            let tasks = client.list_tasks().await?;
            match format {
                OutputFormat::Json => print_json(&tasks)?,
                OutputFormat::Text => {
                    if tasks.is_empty() {
                        println!("No tasks");
                    }
                    for task in &tasks {
                        print_task_line(task);
                    }
                }
            }
        }
        TaskCommands::Get { id } => print_task(&client.get_task(id).await?, format)?,
        TaskCommands::Create { title, fields } => {
            let task = client
                .create_task(&TaskCommands::new_task(title, fields))
                .await?;
            print_task(&task, format)?;
        }
        TaskCommands::Update {
            id,
            title,
            fields,
            clear_description,
            clear_due,
        } => {
            let changes = TaskCommands::task_update(title, fields, clear_description, clear_due);
            print_task(&client.update_task(id, &changes).await?, format)?;
        }
        TaskCommands::Delete { id } => {
            let ack = client.delete_task(id).await?;
            match format {
                OutputFormat::Json => print_json(&ack)?,
                OutputFormat::Text => println!("Deleted {}", id),
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_task_line(task: &Task) {
    println!(
        "{}  {:<11} {:<6} {:<8} {}",
        task.id,
        task.status.as_str(),
        task.priority.as_str(),
        task.category.as_str(),
        task.title
    );
}

fn print_task(task: &Task, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(task);
    }

    print_task_line(task);
    if let Some(description) = &task.description {
        println!("  {}", description);
    }
    if let Some(due) = task.due_date {
        println!("  due {}", due.to_rfc3339());
    }
    Ok(())
}
