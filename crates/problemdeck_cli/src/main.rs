//! Command-line client for the ProblemDeck catalog API.

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use problemdeck_client::HttpGateway;
use problemdeck_core::config::{API_BASE_URL_ENV, TIMEOUT_ENV};
use problemdeck_core::controllers::list::EMPTY_CATALOG_TEXT;
use problemdeck_core::controllers::{
    CatalogList, ManagedCollection, ProblemFields, ProblemForm, ProblemView, UploadWorkflow,
};
use problemdeck_core::models::{
    Difficulty, EntityId, ImageCandidate, Problem, ProblemStatus, VocabEntry, VocabularyKind,
};
use problemdeck_core::{CatalogError, CatalogGateway, Config, Confirm, Notice, NoticeLevel};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pdeck", about = "ProblemDeck CLI", version)]
struct Cli {
    /// API base URL (can also be set via PROBLEMDECK_API_BASE_URL)
    #[arg(short, long, env = API_BASE_URL_ENV)]
    server: Option<String>,

    /// Request timeout in seconds
    #[arg(short = 't', long, env = TIMEOUT_ENV)]
    timeout: Option<u64>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Browse and edit problems
    #[command(subcommand)]
    Problems(ProblemCommand),
    /// Manage tags
    #[command(subcommand)]
    Tags(VocabularyCommand),
    /// Manage sources
    #[command(subcommand)]
    Sources(VocabularyCommand),
    /// Upload an image and convert it into a problem
    Upload { path: PathBuf },
}

#[derive(Subcommand)]
enum ProblemCommand {
    List,
    Show {
        id: EntityId,
    },
    New {
        #[command(flatten)]
        fields: ProblemArgs,
    },
    Edit {
        id: EntityId,
        #[command(flatten)]
        fields: ProblemArgs,
    },
    Delete {
        id: EntityId,
    },
}

#[derive(Subcommand)]
enum VocabularyCommand {
    List,
    Add { name: String },
    Rename { id: EntityId, name: String },
    Delete { id: EntityId },
}

/// Problem field flags. Unset flags keep the loaded value in edit mode.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
struct ProblemArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    difficulty: Option<Difficulty>,
    #[arg(long)]
    estimated_time: Option<String>,
    /// Comma-separated keywords
    #[arg(long)]
    keywords: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    solution: Option<String>,
    #[arg(long)]
    status: Option<ProblemStatus>,
    #[arg(long, conflicts_with = "latex_file")]
    latex: Option<String>,
    #[arg(long)]
    latex_file: Option<PathBuf>,
    /// Tag id to associate (repeatable)
    #[arg(long = "tag")]
    tags: Vec<EntityId>,
    /// Source id to associate (repeatable)
    #[arg(long = "source")]
    sources: Vec<EntityId>,
}

impl ProblemArgs {
    fn apply(self, fields: &mut ProblemFields) -> anyhow::Result<()> {
        if let Some(title) = self.title {
            fields.title = title;
        }
        if let Some(difficulty) = self.difficulty {
            fields.difficulty = Some(difficulty);
        }
        if let Some(estimated_time) = self.estimated_time {
            fields.estimated_time = estimated_time;
        }
        if let Some(keywords) = self.keywords {
            fields.keywords = keywords;
        }
        if let Some(author) = self.author {
            fields.author = author;
        }
        if let Some(solution) = self.solution {
            fields.solution_text = solution;
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if let Some(latex) = self.latex {
            fields.latex_content = latex;
        }
        if let Some(path) = self.latex_file {
            fields.latex_content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading LaTeX from {}", path.display()))?;
        }
        if !self.tags.is_empty() {
            fields.selection.tags = self.tags.into_iter().collect();
        }
        if !self.sources.is_empty() {
            fields.selection.sources = self.sources.into_iter().collect();
        }
        Ok(())
    }
}

/// Confirmation prompt on stdin; `--yes` answers every prompt up front.
struct TerminalConfirm {
    assume_yes: bool,
}

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(_) => false,
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.text),
            NoticeLevel::Error => eprintln!("{}", notice.text),
        }
    }
}

/// Print pending notices and exit non-zero when the workflow failed.
fn settle<T>(result: Result<T, CatalogError>, notices: Vec<Notice>) -> T {
    print_notices(notices);
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            std::process::exit(1);
        }
    }
}

fn format_problem_rows(problems: &[Problem]) -> String {
    if problems.is_empty() {
        return EMPTY_CATALOG_TEXT.to_string();
    }
    problems
        .iter()
        .map(|problem| {
            format!(
                "{:<6} {:<8} {:<9} {}",
                problem.id,
                problem.difficulty.as_str(),
                problem.status.as_str(),
                problem.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_entry_rows(entries: &[VocabEntry], empty_text: &str) -> String {
    if entries.is_empty() {
        return empty_text.to_string();
    }
    entries
        .iter()
        .map(|entry| format!("{:<6} {}", entry.id, entry.name))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn run_problems(
    gateway: Arc<dyn CatalogGateway>,
    command: ProblemCommand,
    json: bool,
    confirm: &mut dyn Confirm,
) -> anyhow::Result<()> {
    match command {
        ProblemCommand::List => {
            let mut list = CatalogList::new(gateway);
            let result = list.load().await;
            settle(result, list.take_notices());
            if json {
                println!("{}", serde_json::to_string_pretty(list.problems())?);
            } else {
                println!("{}", format_problem_rows(list.problems()));
            }
        }
        ProblemCommand::Show { id } => {
            let mut view = ProblemView::new(gateway);
            let result = view.load(id).await.map(|_| ());
            settle(result, view.take_notices());
            if json {
                println!("{}", serde_json::to_string_pretty(&view.problem())?);
            } else {
                println!("{}", view.render());
            }
        }
        ProblemCommand::New { fields } => {
            let mut form = ProblemForm::create(gateway);
            let mounted = form.mount().await;
            settle(mounted, form.take_notices());
            fields.apply(form.fields_mut())?;
            let result = form.submit().await;
            let problem = settle(result, form.take_notices());
            print_saved(&problem, json)?;
        }
        ProblemCommand::Edit { id, fields } => {
            let mut form = ProblemForm::edit(gateway, id);
            let mounted = form.mount().await;
            settle(mounted, form.take_notices());
            fields.apply(form.fields_mut())?;
            let result = form.submit().await;
            let problem = settle(result, form.take_notices());
            print_saved(&problem, json)?;
        }
        ProblemCommand::Delete { id } => {
            let mut list = CatalogList::new(gateway);
            let result = list.delete(id, confirm).await;
            let outcome = settle(result, list.take_notices());
            tracing::debug!(id, ?outcome, "problem delete finished");
        }
    }
    Ok(())
}

fn print_saved(problem: &Problem, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(problem)?);
    } else {
        println!("Saved: {} ({})", problem.title, problem.id);
    }
    Ok(())
}

async fn run_vocabulary(
    gateway: Arc<dyn CatalogGateway>,
    kind: VocabularyKind,
    command: VocabularyCommand,
    json: bool,
    confirm: &mut dyn Confirm,
) -> anyhow::Result<()> {
    let mut collection = ManagedCollection::new(gateway, kind);
    match command {
        VocabularyCommand::List => {
            let result = collection.load().await;
            settle(result, collection.take_notices());
            if json {
                println!("{}", serde_json::to_string_pretty(collection.entries())?);
            } else {
                println!(
                    "{}",
                    format_entry_rows(collection.entries(), &collection.empty_text())
                );
            }
        }
        VocabularyCommand::Add { name } => {
            let result = collection.create(&name).await;
            let entry = settle(result, collection.take_notices());
            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            }
        }
        VocabularyCommand::Rename { id, name } => {
            let loaded = collection.load().await;
            settle(loaded, collection.take_notices());
            let current = collection
                .entries()
                .iter()
                .find(|entry| entry.id == id)
                .map(|entry| entry.name.clone())
                .unwrap_or_default();
            collection.begin_edit(id, &current);
            collection.set_edit_name(&name);
            let result = collection.commit_edit().await;
            let entry = settle(result, collection.take_notices());
            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            }
        }
        VocabularyCommand::Delete { id } => {
            let result = collection.delete(id, confirm).await;
            settle(result, collection.take_notices());
        }
    }
    Ok(())
}

async fn run_upload(gateway: Arc<dyn CatalogGateway>, path: PathBuf, json: bool) -> anyhow::Result<()> {
    let mut workflow = UploadWorkflow::new(gateway);
    let candidate = ImageCandidate::from_path(&path)
        .with_context(|| format!("reading image {}", path.display()))?;
    let selected = workflow.select_file(candidate);
    settle(selected, workflow.take_notices());

    eprintln!("Uploading and processing...");
    let result = workflow.submit().await;
    if let Some(status) = workflow.status_line() {
        eprintln!("{}", status);
    }
    let problem = settle(result, workflow.take_notices());
    if json {
        println!("{}", serde_json::to_string_pretty(&problem)?);
    } else {
        println!("{}", problemdeck_core::controllers::render_problem(&problem));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "problemdeck=info,problemdeck_core=info,problemdeck_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let Cli {
        server,
        timeout,
        json,
        yes,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config = Config::from_env().with_overrides(server, timeout, yes);
    tracing::debug!(base_url = %config.api_base_url, timeout_secs = config.timeout_secs, "configured");
    let gateway: Arc<dyn CatalogGateway> = Arc::new(HttpGateway::from_config(&config)?);
    let mut confirm = TerminalConfirm {
        assume_yes: config.assume_yes,
    };

    match command {
        Commands::Completions { .. } => unreachable!("completions handled before client setup"),
        Commands::Problems(command) => run_problems(gateway, command, json, &mut confirm).await,
        Commands::Tags(command) => {
            run_vocabulary(gateway, VocabularyKind::Tag, command, json, &mut confirm).await
        }
        Commands::Sources(command) => {
            run_vocabulary(gateway, VocabularyKind::Source, command, json, &mut confirm).await
        }
        Commands::Upload { path } => run_upload(gateway, path, json).await,
    }
}
