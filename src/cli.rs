use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::api::clickup::ClickUpClient;
use crate::api::{get_member_ids_from_names, TaskApi};
use crate::artifacts::ArtifactFolders;
use crate::attachments::{select_attachments, MatchType};
use crate::config;
use crate::model::task::{task_id_of, Operation};
use crate::translate::{self, CreateFields, UpdateFields};

/// Create and update ClickUp tickets, attach local files, and keep the responses.
#[derive(Parser, Debug)]
#[command(name = "clickup-ticket", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML config file (default: ~/.clickup-ticket/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Artifacts root (default: ./clickup)
    #[arg(long, global = true, value_name = "DIR")]
    pub artifacts_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a task in a list
    Create(CreateArgs),
    /// Update an existing task
    Update(UpdateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SourceFileArgs {
    /// File to attach, or a regex when matching by pattern
    #[arg(long = "source-file-name")]
    pub source_file_name: Option<String>,

    #[arg(long = "source-folder-name", default_value = "")]
    pub source_folder_name: String,

    #[arg(long = "source-file-name-match-type", value_enum, default_value_t = MatchType::Exact)]
    pub match_type: MatchType,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub list_id: String,

    #[arg(long)]
    pub access_token: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    /// 1 (urgent) to 4 (low)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub priority: Option<u8>,

    #[arg(long)]
    pub status: Option<String>,

    /// month/day/year
    #[arg(long)]
    pub due_date: Option<String>,

    /// month/day/year
    #[arg(long)]
    pub start_date: Option<String>,

    /// Member names as a list literal, e.g. "['Ada Lovelace']"
    #[arg(long = "assigness", alias = "assignees")]
    pub assignees: Option<String>,

    #[arg(long = "time_estimate", alias = "time-estimate")]
    pub time_estimate: Option<u64>,

    /// Tags as a list literal, e.g. "['etl', 'urgent']"
    #[arg(long)]
    pub tags: Option<String>,

    /// Custom fields as a list of {'id', 'value'} or an {id: value} mapping
    #[arg(long = "custom-json")]
    pub custom_json: Option<String>,

    #[command(flatten)]
    pub source: SourceFileArgs,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    #[arg(long)]
    pub task_id: String,

    #[arg(long)]
    pub access_token: String,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub name: Option<String>,

    /// List that scopes the member lookup for --assigness
    #[arg(long)]
    pub list_id: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub priority: Option<u8>,

    #[arg(long = "assigness", alias = "assignees", requires = "list_id")]
    pub assignees: Option<String>,

    #[arg(long = "time_estimate", alias = "time-estimate")]
    pub time_estimate: Option<u64>,

    #[arg(long)]
    pub due_date: Option<String>,

    #[arg(long = "custom-json")]
    pub custom_json: Option<String>,

    #[arg(long, action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
    pub archived: Option<bool>,

    #[command(flatten)]
    pub source: SourceFileArgs,
}

impl CreateArgs {
    fn fields(&self) -> CreateFields {
        CreateFields {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status.clone(),
            priority: self.priority,
            due_date: self.due_date.clone(),
            start_date: self.start_date.clone(),
            time_estimate: self.time_estimate,
            tags: self.tags.clone(),
            custom_json: self.custom_json.clone(),
        }
    }
}

impl UpdateArgs {
    fn fields(&self) -> UpdateFields {
        UpdateFields {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            status: self.status.clone(),
            priority: self.priority,
            due_date: self.due_date.clone(),
            time_estimate: self.time_estimate,
            custom_json: self.custom_json.clone(),
            archived: self.archived,
        }
    }
}

/// Entry point after argument parsing: set up artifacts, build the client, dispatch.
pub async fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let artifacts = ArtifactFolders::prepare(config.artifacts_root(cli.artifacts_dir.as_deref()))
        .context("Failed to create artifact folders")?;
    info!(root = %artifacts.root().display(), "using artifacts folder");

    let path = match &cli.command {
        Commands::Create(args) => {
            let client = ClickUpClient::new(config.api_base_url(), args.access_token.clone());
            handle_create(args, &client, &artifacts).await?
        }
        Commands::Update(args) => {
            let client = ClickUpClient::new(config.api_base_url(), args.access_token.clone());
            handle_update(args, &client, &artifacts).await?
        }
    };
    println!("Response saved to {}", path.display());
    Ok(())
}

/// Create the task, upload its attachments, and save the response.
pub async fn handle_create(
    args: &CreateArgs,
    api: &dyn TaskApi,
    artifacts: &ArtifactFolders,
) -> Result<PathBuf> {
    // Everything local is validated before the first request goes out.
    let mut request = translate::build_create_request(&args.fields(), Vec::new())?;
    let names = args
        .assignees
        .as_deref()
        .map(|raw| translate::parse_string_list("--assigness", raw))
        .transpose()?;
    let attachments = select_attachments(
        &args.source.source_folder_name,
        args.source.source_file_name.as_deref(),
        args.source.match_type,
    )?;

    if let Some(names) = names {
        request.assignees = get_member_ids_from_names(api, &args.list_id, &names)
            .await
            .context("Failed to look up assignees")?;
    }

    let task = api
        .create_task(&args.list_id, &request)
        .await
        .with_context(|| format!("Failed to create task in list {}", args.list_id))?;
    let task_id = task_id_of(&task).context("ClickUp response has no task id")?;
    println!("Task created successfully with task id: {task_id}");

    upload_all(api, &task_id, &attachments).await?;

    let path = artifacts.write_response(Operation::Create, &task_id, &task)?;
    Ok(path)
}

/// Apply a sparse update, upload attachments, and save the response.
pub async fn handle_update(
    args: &UpdateArgs,
    api: &dyn TaskApi,
    artifacts: &ArtifactFolders,
) -> Result<PathBuf> {
    // The task id names the response file, so it is checked up front too.
    artifacts.response_path(Operation::Update, &args.task_id)?;
    let mut update = translate::build_update_request(&args.fields(), None)?;
    let names = args
        .assignees
        .as_deref()
        .map(|raw| translate::parse_string_list("--assigness", raw))
        .transpose()?;
    let attachments = select_attachments(
        &args.source.source_folder_name,
        args.source.source_file_name.as_deref(),
        args.source.match_type,
    )?;

    if let Some(names) = names {
        let list_id = args
            .list_id
            .as_deref()
            .context("--assigness needs --list-id to look up members")?;
        update.assignees = Some(
            get_member_ids_from_names(api, list_id, &names)
                .await
                .context("Failed to look up assignees")?,
        );
    }

    let task = api
        .update_task(&args.task_id, &update)
        .await
        .with_context(|| format!("Failed to update task {}", args.task_id))?;
    println!("Task {} updated successfully", args.task_id);

    upload_all(api, &args.task_id, &attachments).await?;

    let path = artifacts.write_response(Operation::Update, &args.task_id, &task)?;
    Ok(path)
}

/// One upload at a time, in order. The first failure stops the rest.
async fn upload_all(api: &dyn TaskApi, task_id: &str, files: &[PathBuf]) -> Result<()> {
    if files.is_empty() {
        info!(task_id, "no attachments to upload");
        return Ok(());
    }
    for (index, path) in files.iter().enumerate() {
        if let Err(err) = api.upload_attachment(task_id, path).await {
            warn!(task_id, skipped = files.len() - index - 1, "attachment upload failed");
            return Err(err).with_context(|| format!("Failed to upload {}", path.display()));
        }
        println!("{} was successfully uploaded to {task_id}", path.display());
    }
    Ok(())
}
