//! One moderation panel: active kind, filter, page and selection composed
//! over a repository.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use serde::Serialize;

use crate::application::content::ContentRepository;
use crate::application::moderation::ModerationError;
use crate::application::pagination::{PageWindow, clamp_page, total_pages};
use crate::application::selection::SelectionSet;
use crate::domain::entities::{ContentId, ContentItem};
use crate::domain::types::{ContentKind, PublishState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub state: Option<PublishState>,
    pub search: Option<String>,
}

impl ContentFilter {
    pub fn new(state: Option<PublishState>, search: Option<String>) -> Self {
        let search = search
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Self { state, search }
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        if self.state.is_some_and(|state| item.publish_state != state) {
            return false;
        }
        match &self.search {
            Some(needle) => item.matches_search(needle),
            None => true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.search.is_none()
    }
}

/// Everything needed to render the current page of a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot<'a> {
    pub kind: ContentKind,
    pub rows: Vec<&'a ContentItem>,
    pub window: PageWindow,
    pub page: usize,
    pub total_items: usize,
    pub selected: usize,
    pub all_selected: bool,
}

#[derive(Debug, Clone)]
pub struct ModerationView {
    kind: ContentKind,
    filter: ContentFilter,
    page: usize,
    page_size: NonZeroUsize,
    selection: SelectionSet,
}

impl ModerationView {
    pub fn new(kind: ContentKind, page_size: NonZeroUsize) -> Self {
        Self {
            kind,
            filter: ContentFilter::default(),
            page: 1,
            page_size,
            selection: SelectionSet::new(),
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn filter(&self) -> &ContentFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Switching kind drops the selection and returns to the first page.
    pub fn set_kind(&mut self, kind: ContentKind) {
        self.kind = kind;
        self.reset();
    }

    /// Changing the filter drops the selection and returns to the first page.
    pub fn set_filter(&mut self, filter: ContentFilter) {
        self.filter = filter;
        self.reset();
    }

    /// Pages are 1-based; out-of-range values are clamped when rendering.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Items of `repo` passing the filter, in repository order.
    pub fn filtered<'a>(&self, repo: &'a ContentRepository) -> Vec<&'a ContentItem> {
        repo.list()
            .iter()
            .filter(|item| self.filter.matches(item))
            .collect()
    }

    pub fn snapshot<'a>(&self, repo: &'a ContentRepository) -> PanelSnapshot<'a> {
        let filtered = self.filtered(repo);
        let (page, window) = self.window(filtered.len());
        let rows: Vec<&ContentItem> = filtered[window.slice.clone()].to_vec();
        let all_selected = self
            .selection
            .is_all_selected(rows.iter().map(|item| &item.id));

        PanelSnapshot {
            kind: self.kind,
            rows,
            window,
            page,
            total_items: filtered.len(),
            selected: self.selection.len(),
            all_selected,
        }
    }

    /// Toggle `id`, which must be part of the current filtered view.
    pub fn toggle(
        &mut self,
        id: &ContentId,
        repo: &ContentRepository,
    ) -> Result<bool, ModerationError> {
        if !self.filtered(repo).iter().any(|item| &item.id == id) {
            return Err(ModerationError::NotFound {
                kind: self.kind,
                id: id.clone(),
            });
        }
        Ok(self.selection.toggle(id))
    }

    /// Select-all over the ids of the current page.
    pub fn select_all_on_page(&mut self, repo: &ContentRepository) {
        let filtered = self.filtered(repo);
        let (_, window) = self.window(filtered.len());
        self.selection
            .select_all(filtered[window.slice].iter().map(|item| &item.id));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected ids in repository order.
    pub fn selected_ids(&self, repo: &ContentRepository) -> Vec<ContentId> {
        repo.list()
            .iter()
            .filter(|item| self.selection.contains(&item.id))
            .map(|item| item.id.clone())
            .collect()
    }

    /// Drop selected ids that are no longer in the filtered view.
    pub fn prune(&mut self, repo: &ContentRepository) {
        let visible: HashSet<&ContentId> = self
            .filtered(repo)
            .into_iter()
            .map(|item| &item.id)
            .collect();
        self.selection.retain(|id| visible.contains(id));
    }

    fn reset(&mut self) {
        self.page = 1;
        self.selection.clear();
    }

    fn window(&self, total: usize) -> (usize, PageWindow) {
        let page = clamp_page(self.page, total_pages(total, self.page_size));
        (page, PageWindow::compute(total, self.page_size, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pagination::PageLabel;
    use crate::domain::entities::{ContentItem, JobPosting, KindPayload};

    fn jobs(count: usize) -> ContentRepository {
        let items = (0..count)
            .map(|index| {
                ContentItem::new(
                    ContentId::parse(format!("job-{index}")).expect("id"),
                    KindPayload::Job(JobPosting {
                        title: format!("Role {index}"),
                        company: if index % 2 == 0 { "Acme" } else { "Globex" }.into(),
                        ..JobPosting::default()
                    }),
                )
            })
            .collect();
        ContentRepository::from_items(ContentKind::Job, items).expect("repository")
    }

    fn size(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).expect("non-zero")
    }

    fn id(value: &str) -> ContentId {
        ContentId::parse(value).expect("id")
    }

    #[test]
    fn second_page_shows_the_middle_slice() {
        let repo = jobs(12);
        let mut view = ModerationView::new(ContentKind::Job, size(5));
        view.set_page(2);

        let snapshot = view.snapshot(&repo);
        assert_eq!(snapshot.window.slice, 5..10);
        assert_eq!(snapshot.rows.len(), 5);
        assert_eq!(snapshot.rows[0].id, id("job-5"));
        assert_eq!(
            snapshot.window.labels,
            vec![PageLabel::Page(1), PageLabel::Page(2), PageLabel::Page(3)]
        );
    }

    #[test]
    fn page_beyond_the_end_is_clamped() {
        let repo = jobs(12);
        let mut view = ModerationView::new(ContentKind::Job, size(5));
        view.set_page(9);

        let snapshot = view.snapshot(&repo);
        assert_eq!(snapshot.page, 3);
        assert_eq!(snapshot.window.slice, 10..12);
    }

    #[test]
    fn empty_repository_renders_an_empty_page() {
        let repo = jobs(0);
        let view = ModerationView::new(ContentKind::Job, size(5));

        let snapshot = view.snapshot(&repo);
        assert_eq!(snapshot.page, 1);
        assert!(snapshot.rows.is_empty());
        assert!(snapshot.window.labels.is_empty());
        assert!(!snapshot.all_selected);
    }

    #[test]
    fn select_all_on_page_twice_clears() {
        let repo = jobs(12);
        let mut view = ModerationView::new(ContentKind::Job, size(5));
        view.set_page(2);

        view.select_all_on_page(&repo);
        assert!(view.snapshot(&repo).all_selected);
        assert_eq!(
            view.selected_ids(&repo),
            (5..10).map(|i| id(&format!("job-{i}"))).collect::<Vec<_>>()
        );

        view.select_all_on_page(&repo);
        assert!(view.selection().is_empty());
    }

    #[test]
    fn changing_filter_or_kind_clears_selection_and_page() {
        let repo = jobs(12);
        let mut view = ModerationView::new(ContentKind::Job, size(5));
        view.set_page(2);
        view.select_all_on_page(&repo);

        view.set_filter(ContentFilter::new(Some(PublishState::Pending), None));
        assert!(view.selection().is_empty());
        assert_eq!(view.page(), 1);

        view.select_all_on_page(&repo);
        view.set_kind(ContentKind::Exam);
        assert!(view.selection().is_empty());
    }

    #[test]
    fn search_filters_by_organisation() {
        let repo = jobs(6);
        let mut view = ModerationView::new(ContentKind::Job, size(10));
        view.set_filter(ContentFilter::new(None, Some("  globex ".into())));

        let snapshot = view.snapshot(&repo);
        assert_eq!(snapshot.total_items, 3);
        assert!(
            snapshot
                .rows
                .iter()
                .all(|item| item.payload.organisation() == "Globex")
        );
    }

    #[test]
    fn toggle_rejects_ids_outside_the_view() {
        let repo = jobs(4);
        let mut view = ModerationView::new(ContentKind::Job, size(10));
        view.set_filter(ContentFilter::new(None, Some("acme".into())));

        assert!(view.toggle(&id("job-0"), &repo).expect("visible"));
        let err = view.toggle(&id("job-1"), &repo).expect_err("filtered out");
        assert!(matches!(err, ModerationError::NotFound { .. }));
    }

    #[test]
    fn prune_keeps_visible_ids_only() {
        let mut repo = jobs(4);
        let mut view = ModerationView::new(ContentKind::Job, size(10));
        view.select_all_on_page(&repo);

        repo.remove(&id("job-2")).expect("remove");
        view.prune(&repo);

        assert_eq!(view.selection().len(), 3);
        assert!(!view.selection().contains(&id("job-2")));
    }
}
