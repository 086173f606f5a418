use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, builder::BoolishValueParser};

use crate::domain::entities::ContentId;
use crate::domain::error::DomainError;
use crate::domain::types::{ContentKind, PublishState};

/// Command-line arguments for the gradboard binary.
#[derive(Debug, Parser)]
#[command(
    name = "gradboard",
    version,
    about = "Moderation console for student opportunity listings"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "GRADBOARD_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    /// Output format for panels and notices.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the backend base URL.
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Read the bearer token from this file instead of GRADBOARD_TOKEN.
    #[arg(
        long = "token-file",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub token_file: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Override the number of rows per page.
    #[arg(long = "page-size", value_name = "COUNT", global = true)]
    pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Show one page of a moderation panel.
    List(ListArgs),
    /// Approve a single item.
    Approve(ItemArgs),
    /// Reject a single item with feedback.
    Reject(RejectArgs),
    /// Delete a single item.
    Delete(ItemArgs),
    /// Approve every selected item.
    #[command(name = "bulk-approve")]
    BulkApprove(BulkArgs),
    /// Delete every selected item after confirmation.
    #[command(name = "bulk-delete")]
    BulkDelete(BulkDeleteArgs),
    /// Show or toggle the auto-approval flag.
    #[command(name = "auto-approval")]
    AutoApproval(AutoApprovalArgs),
    /// Star or unstar an achievement.
    Star(StarArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct FilterArgs {
    /// Only show items in this state (pending|approved|rejected).
    #[arg(long, value_name = "STATE", value_parser = parse_publish_state)]
    pub status: Option<PublishState>,

    /// Case-insensitive search over title, organisation and submitter.
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ListArgs {
    /// Content kind (job|internship|achievement|exam).
    #[arg(value_name = "KIND")]
    pub kind: ContentKind,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// 1-based page number.
    #[arg(long, default_value_t = 1, value_name = "PAGE")]
    pub page: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ItemArgs {
    #[arg(value_name = "KIND")]
    pub kind: ContentKind,

    #[arg(value_name = "ID")]
    pub id: ContentId,
}

#[derive(Debug, Args, Clone)]
pub struct RejectArgs {
    #[command(flatten)]
    pub item: ItemArgs,

    /// Explanation shown to the submitter.
    #[arg(long, value_name = "TEXT")]
    pub feedback: String,
}

#[derive(Debug, Args, Clone)]
pub struct BulkArgs {
    #[arg(value_name = "KIND")]
    pub kind: ContentKind,

    /// Explicit ids, each of which must be in the filtered view.
    #[arg(
        long,
        value_name = "IDS",
        value_delimiter = ',',
        conflicts_with = "page",
        required_unless_present = "page"
    )]
    pub ids: Vec<ContentId>,

    /// Select every item on this page of the filtered view.
    #[arg(long, value_name = "PAGE")]
    pub page: Option<usize>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Args, Clone)]
pub struct BulkDeleteArgs {
    #[command(flatten)]
    pub bulk: BulkArgs,

    /// Skip the interactive confirmation.
    #[arg(long, short = 'y', action = clap::ArgAction::SetTrue)]
    pub yes: bool,
}

#[derive(Debug, Args, Clone)]
pub struct AutoApprovalArgs {
    #[arg(value_name = "KIND")]
    pub kind: ContentKind,

    /// Flip the flag instead of only showing it.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub toggle: bool,
}

#[derive(Debug, Args, Clone)]
pub struct StarArgs {
    /// Achievement id.
    #[arg(value_name = "ID")]
    pub id: ContentId,
}

fn parse_publish_state(value: &str) -> Result<PublishState, DomainError> {
    PublishState::try_from(value)
}
