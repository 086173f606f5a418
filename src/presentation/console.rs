//! Dispatches parsed CLI commands onto the moderation controller and renders
//! the outcome for stdout.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use tracing::info;

use crate::application::error::AppError;
use crate::application::moderation::{
    BulkOutcome, Confirmation, ModerationController, ModerationError, Notice,
};
use crate::application::view::{ContentFilter, ModerationView};
use crate::config::{
    AutoApprovalArgs, BulkArgs, Command, FilterArgs, ItemArgs, ListArgs, OutputFormat,
    RejectArgs,
};
use crate::domain::entities::{ContentId, ContentItem};
use crate::domain::types::ContentKind;

use super::views::{CommandView, render_json, render_notice, render_panel};

pub struct Console {
    controller: ModerationController,
    page_size: NonZeroUsize,
    output: OutputFormat,
}

impl Console {
    pub fn new(controller: ModerationController, page_size: NonZeroUsize, output: OutputFormat) -> Self {
        Self {
            controller,
            page_size,
            output,
        }
    }

    /// Run one command and return what should be printed on stdout.
    pub async fn execute(
        &mut self,
        command: Command,
        confirm: &dyn Confirmation,
    ) -> Result<String, AppError> {
        info!(
            target = "presentation::console",
            command = command_name(&command),
            "executing command"
        );

        match command {
            Command::List(args) => self.list(args).await,
            Command::Approve(ItemArgs { kind, id }) => {
                self.controller.load(kind).await?;
                let item = self.controller.approve(kind, &id).await?;
                self.item_outcome(Notice::success(format!("Approved {kind} `{id}`")), &item)
            }
            Command::Reject(RejectArgs {
                item: ItemArgs { kind, id },
                feedback,
            }) => {
                if feedback.trim().is_empty() {
                    return Err(ModerationError::missing_feedback().into());
                }
                self.controller.load(kind).await?;
                let item = self.controller.reject(kind, &id, &feedback).await?;
                self.item_outcome(Notice::success(format!("Rejected {kind} `{id}`")), &item)
            }
            Command::Delete(ItemArgs { kind, id }) => {
                self.controller.load(kind).await?;
                let item = self.controller.delete(kind, &id).await?;
                self.item_outcome(Notice::success(format!("Deleted {kind} `{id}`")), &item)
            }
            Command::BulkApprove(args) => {
                let (kind, ids) = self.resolve_selection(args).await?;
                let outcome = self.controller.bulk_approve(kind, &ids).await?;
                self.bulk_outcome(&outcome)
            }
            Command::BulkDelete(args) => {
                let (kind, ids) = self.resolve_selection(args.bulk).await?;
                let outcome = if args.yes {
                    self.controller
                        .bulk_delete(kind, &ids, &super::prompt::AssumeYes)
                        .await?
                } else {
                    self.controller.bulk_delete(kind, &ids, confirm).await?
                };
                self.bulk_outcome(&outcome)
            }
            Command::AutoApproval(AutoApprovalArgs { kind, toggle }) => {
                let enabled = if toggle {
                    self.controller.toggle_auto_approval(kind).await?
                } else {
                    self.controller.load_auto_approval(kind).await?
                };
                let state = if enabled { "on" } else { "off" };
                let notice = if toggle {
                    Notice::success(format!("Auto-approval for {} is now {state}", kind.label(2)))
                } else {
                    Notice::success(format!("Auto-approval for {} is {state}", kind.label(2)))
                };
                self.notice_outcome(&notice)
            }
            Command::Star(args) => {
                self.controller.load(ContentKind::Achievement).await?;
                let item = self.controller.try_star(&args.id).await?;
                let verb = if item.starred { "Starred" } else { "Unstarred" };
                self.item_outcome(
                    Notice::success(format!("{verb} achievement `{}`", item.id)),
                    &item,
                )
            }
        }
    }

    async fn list(&mut self, args: ListArgs) -> Result<String, AppError> {
        let ListArgs { kind, filter, page } = args;
        let repo = self.controller.load(kind).await?;

        let mut view = ModerationView::new(kind, self.page_size);
        view.set_filter(content_filter(filter));
        view.set_page(page);

        let snapshot = view.snapshot(repo);
        let counts = repo.status_counts();
        match self.output {
            OutputFormat::Text => Ok(render_panel(&snapshot, &counts)),
            OutputFormat::Json => to_json(&CommandView {
                notice: None,
                panel: Some(&snapshot),
                counts: Some(counts),
                item: None,
            }),
        }
    }

    /// Build the id list for a bulk command from `--ids` or `--page`, both
    /// scoped to the filtered view.
    async fn resolve_selection(
        &mut self,
        args: BulkArgs,
    ) -> Result<(ContentKind, Vec<ContentId>), AppError> {
        let BulkArgs {
            kind,
            ids,
            page,
            filter,
        } = args;
        let repo = self.controller.load(kind).await?;

        let mut view = ModerationView::new(kind, self.page_size);
        view.set_filter(content_filter(filter));

        match page {
            Some(page) => {
                view.set_page(page);
                view.select_all_on_page(repo);
            }
            None => {
                let mut seen = HashSet::new();
                for id in ids.iter().filter(|id| seen.insert(*id)) {
                    view.toggle(id, repo)?;
                }
            }
        }

        Ok((kind, view.selected_ids(repo)))
    }

    fn item_outcome(&self, notice: Notice, item: &ContentItem) -> Result<String, AppError> {
        match self.output {
            OutputFormat::Text => Ok(render_notice(&notice)),
            OutputFormat::Json => to_json(&CommandView {
                notice: Some(&notice),
                panel: None,
                counts: None,
                item: Some(item),
            }),
        }
    }

    fn bulk_outcome(&self, outcome: &BulkOutcome) -> Result<String, AppError> {
        self.notice_outcome(&outcome.notice())
    }

    fn notice_outcome(&self, notice: &Notice) -> Result<String, AppError> {
        match self.output {
            OutputFormat::Text => Ok(render_notice(notice)),
            OutputFormat::Json => to_json(&CommandView {
                notice: Some(notice),
                panel: None,
                counts: None,
                item: None,
            }),
        }
    }
}

fn content_filter(args: FilterArgs) -> ContentFilter {
    ContentFilter::new(args.status, args.search)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    render_json(value).map_err(|err| AppError::unexpected(format!("failed to render output: {err}")))
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List(_) => "list",
        Command::Approve(_) => "approve",
        Command::Reject(_) => "reject",
        Command::Delete(_) => "delete",
        Command::BulkApprove(_) => "bulk-approve",
        Command::BulkDelete(_) => "bulk-delete",
        Command::AutoApproval(_) => "auto-approval",
        Command::Star(_) => "star",
    }
}
