//! Plain-text and JSON rendering of panels and notices.

use std::fmt::Write as _;

use serde::Serialize;

use crate::application::content::StatusCounts;
use crate::application::moderation::{Notice, NoticeLevel};
use crate::application::pagination::PageLabel;
use crate::application::view::PanelSnapshot;
use crate::domain::entities::ContentItem;
use crate::domain::types::PublishState;

const TITLE_WIDTH: usize = 36;

/// JSON document printed for every command in `--output json` mode.
#[derive(Debug, Serialize)]
pub struct CommandView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'a Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<&'a PanelSnapshot<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<StatusCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<&'a ContentItem>,
}

pub fn render_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("[{tag}] {}", notice.text)
}

pub fn render_panel(snapshot: &PanelSnapshot<'_>, counts: &StatusCounts) -> String {
    let mut out = String::new();
    let kind = snapshot.kind;

    let _ = writeln!(
        out,
        "{} ({} total, {} pending, {} approved, {} rejected{})",
        kind.label(2),
        counts.total,
        counts.pending,
        counts.approved,
        counts.rejected,
        if kind.supports_starring() {
            format!(", {} starred", counts.starred)
        } else {
            String::new()
        }
    );

    if snapshot.rows.is_empty() {
        let _ = writeln!(out, "  no {} match the current filter", kind.label(2));
        return out;
    }

    for item in &snapshot.rows {
        let _ = writeln!(out, "{}", render_row(item));
    }

    let _ = writeln!(
        out,
        "page {}/{}  {}  ({} matching, {} selected)",
        snapshot.page,
        snapshot.window.total_pages,
        render_pager(&snapshot.window.labels, snapshot.page),
        snapshot.total_items,
        snapshot.selected
    );
    out
}

fn render_row(item: &ContentItem) -> String {
    let state = match item.publish_state {
        PublishState::Pending => "pending ",
        PublishState::Approved => "approved",
        PublishState::Rejected => "rejected",
    };
    let star = if item.starred { "*" } else { " " };
    let mut row = format!(
        "{star} {:<12} {state}  {:<width$}  {}",
        item.id.as_str(),
        truncate(item.title(), TITLE_WIDTH),
        item.payload.organisation(),
        width = TITLE_WIDTH
    );
    if let Some(deadline) = item.payload.deadline() {
        let _ = write!(row, "  due {deadline}");
    }
    if let Some(feedback) = item.feedback.as_deref() {
        let _ = write!(row, "\n    feedback: {feedback}");
    }
    row
}

fn render_pager(labels: &[PageLabel], current: usize) -> String {
    labels
        .iter()
        .map(|label| match label {
            PageLabel::Page(page) if *page == current => format!("[{page}]"),
            PageLabel::Page(page) => page.to_string(),
            PageLabel::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pager_marks_current_page_and_gaps() {
        let labels = [
            PageLabel::Page(1),
            PageLabel::Ellipsis,
            PageLabel::Page(4),
            PageLabel::Page(5),
            PageLabel::Page(6),
            PageLabel::Ellipsis,
            PageLabel::Page(10),
        ];
        assert_eq!(render_pager(&labels, 5), "1 ... 4 [5] 6 ... 10");
    }

    #[test]
    fn long_titles_are_truncated() {
        let title = "x".repeat(50);
        let cut = truncate(&title, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn notices_are_tagged_by_level() {
        assert_eq!(render_notice(&Notice::warning("nothing selected")), "[warning] nothing selected");
        assert_eq!(render_notice(&Notice::success("Approved 2 jobs")), "[ok] Approved 2 jobs");
    }
}
