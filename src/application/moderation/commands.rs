use futures::future::join_all;
use metrics::counter;
use tracing::{debug, info, warn};

use crate::application::content::{ContentRepository, RepoError};
use crate::domain::entities::{ContentId, ContentItem};
use crate::domain::types::{ContentKind, PublishState, ReviewAction};

use super::service::ModerationController;
use super::types::{BulkAction, BulkOutcome, Confirmation, ModerationError};

fn record_action(kind: ContentKind, action: &'static str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    counter!(
        "gradboard_moderation_actions_total",
        "kind" => kind.as_str(),
        "action" => action,
        "outcome" => outcome
    )
    .increment(1);
}

impl ModerationController {
    /// Approve one item. The local copy changes only after the backend
    /// confirms; approving an already decided item is allowed.
    pub async fn approve(
        &mut self,
        kind: ContentKind,
        id: &ContentId,
    ) -> Result<ContentItem, ModerationError> {
        self.require_item(kind, id)?;

        if let Err(err) = self.api.review(kind, id, ReviewAction::Approve).await {
            record_action(kind, "approve", false);
            warn!(
                target = "application::moderation::approve",
                kind = %kind,
                id = %id,
                error = %err,
                "approve request failed"
            );
            return Err(ModerationError::from_api(kind, id, err));
        }

        let item = self
            .repository_mut(kind)?
            .set_status(id, PublishState::Approved, None)?
            .clone();
        record_action(kind, "approve", true);
        info!(
            target = "application::moderation::approve",
            kind = %kind,
            id = %id,
            "item approved"
        );
        Ok(item)
    }

    /// Reject one item with mandatory feedback.
    ///
    /// Blank feedback fails before any request is sent. The review and the
    /// feedback are two sequential calls; when only the first succeeds the
    /// item is stored as rejected with its previous feedback text and
    /// `FeedbackNotSaved` is returned.
    pub async fn reject(
        &mut self,
        kind: ContentKind,
        id: &ContentId,
        feedback: &str,
    ) -> Result<ContentItem, ModerationError> {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(ModerationError::missing_feedback());
        }
        self.require_item(kind, id)?;

        if let Err(err) = self.api.review(kind, id, ReviewAction::Reject).await {
            record_action(kind, "reject", false);
            warn!(
                target = "application::moderation::reject",
                kind = %kind,
                id = %id,
                error = %err,
                "reject request failed"
            );
            return Err(ModerationError::from_api(kind, id, err));
        }

        let feedback_result = self.api.submit_feedback(kind, id, feedback).await;
        let repo = self.repository_mut(kind)?;

        match feedback_result {
            Ok(_) => {
                let item = repo
                    .set_status(id, PublishState::Rejected, Some(feedback.to_string()))?
                    .clone();
                record_action(kind, "reject", true);
                info!(
                    target = "application::moderation::reject",
                    kind = %kind,
                    id = %id,
                    "item rejected"
                );
                Ok(item)
            }
            Err(err) => {
                let previous = repo.get(id).and_then(|item| item.feedback.clone());
                repo.set_status(id, PublishState::Rejected, previous)?;
                record_action(kind, "reject", false);
                warn!(
                    target = "application::moderation::reject",
                    kind = %kind,
                    id = %id,
                    error = %err,
                    "item rejected but feedback was not saved"
                );
                Err(ModerationError::FeedbackNotSaved {
                    kind,
                    id: id.clone(),
                    source: err,
                })
            }
        }
    }

    /// Delete one item. A 404 from the backend means the item is already
    /// gone: it is dropped locally and reported as `NotFound`.
    pub async fn delete(
        &mut self,
        kind: ContentKind,
        id: &ContentId,
    ) -> Result<ContentItem, ModerationError> {
        self.require_item(kind, id)?;

        match self.api.delete(kind, id).await {
            Ok(_) => {
                let removed = self.repository_mut(kind)?.remove(id)?;
                record_action(kind, "delete", true);
                info!(
                    target = "application::moderation::delete",
                    kind = %kind,
                    id = %id,
                    "item deleted"
                );
                Ok(removed)
            }
            Err(err) => {
                record_action(kind, "delete", false);
                let err = ModerationError::from_api(kind, id, err);
                if matches!(err, ModerationError::NotFound { .. }) {
                    self.forget(kind, id)?;
                }
                warn!(
                    target = "application::moderation::delete",
                    kind = %kind,
                    id = %id,
                    error = %err,
                    "delete request failed"
                );
                Err(err)
            }
        }
    }

    /// Approve every id concurrently. Successful approvals are applied
    /// locally even when others fail; the result only reports counts.
    pub async fn bulk_approve(
        &mut self,
        kind: ContentKind,
        ids: &[ContentId],
    ) -> Result<BulkOutcome, ModerationError> {
        let action = BulkAction::Approve;
        if ids.is_empty() {
            return Err(ModerationError::validation(
                "select at least one item to approve",
            ));
        }
        self.repository(kind)?;

        info!(
            target = "application::moderation::bulk_approve",
            kind = %kind,
            count = ids.len(),
            "dispatching bulk approve"
        );

        let api = &self.api;
        let results = join_all(
            ids.iter()
                .map(|id| api.review(kind, id, ReviewAction::Approve)),
        )
        .await;

        let mut failed = 0usize;
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(_) => self.reconcile(kind, id, |repo| {
                    repo.set_status(id, PublishState::Approved, None).map(|_| ())
                })?,
                Err(err) => {
                    failed += 1;
                    debug!(
                        target = "application::moderation::bulk_approve",
                        kind = %kind,
                        id = %id,
                        error = %err,
                        "bulk approve item failed"
                    );
                }
            }
        }

        self.finish_bulk(action, kind, ids.len(), failed)
    }

    /// Delete every id concurrently after `confirm` agrees. Declining sends
    /// no request. Ids the backend reports as missing count as deleted.
    pub async fn bulk_delete(
        &mut self,
        kind: ContentKind,
        ids: &[ContentId],
        confirm: &dyn Confirmation,
    ) -> Result<BulkOutcome, ModerationError> {
        let action = BulkAction::Delete;
        if ids.is_empty() {
            return Err(ModerationError::validation(
                "select at least one item to delete",
            ));
        }
        self.repository(kind)?;

        let prompt = format!(
            "Delete {} {}? This cannot be undone.",
            ids.len(),
            kind.label(ids.len())
        );
        if !confirm.confirm(&prompt) {
            info!(
                target = "application::moderation::bulk_delete",
                kind = %kind,
                count = ids.len(),
                "bulk delete declined"
            );
            return Err(ModerationError::Cancelled(action));
        }

        info!(
            target = "application::moderation::bulk_delete",
            kind = %kind,
            count = ids.len(),
            "dispatching bulk delete"
        );

        let api = &self.api;
        let results = join_all(ids.iter().map(|id| api.delete(kind, id))).await;

        let mut failed = 0usize;
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(_) => self.forget(kind, id)?,
                Err(err) => match ModerationError::from_api(kind, id, err) {
                    ModerationError::NotFound { .. } => self.forget(kind, id)?,
                    err => {
                        failed += 1;
                        debug!(
                            target = "application::moderation::bulk_delete",
                            kind = %kind,
                            id = %id,
                            error = %err,
                            "bulk delete item failed"
                        );
                    }
                },
            }
        }

        self.finish_bulk(action, kind, ids.len(), failed)
    }

    fn require_item(&self, kind: ContentKind, id: &ContentId) -> Result<(), ModerationError> {
        if self.repository(kind)?.contains(id) {
            Ok(())
        } else {
            Err(ModerationError::NotFound {
                kind,
                id: id.clone(),
            })
        }
    }

    /// Remove `id` locally, treating an already missing item as done.
    fn forget(&mut self, kind: ContentKind, id: &ContentId) -> Result<(), ModerationError> {
        self.reconcile(kind, id, |repo| repo.remove(id).map(|_| ()))
    }

    /// Apply a confirmed change to the local copy. A response for an item
    /// that disappeared meanwhile is stale and ignored.
    fn reconcile<F>(
        &mut self,
        kind: ContentKind,
        id: &ContentId,
        apply: F,
    ) -> Result<(), ModerationError>
    where
        F: FnOnce(&mut ContentRepository) -> Result<(), RepoError>,
    {
        match apply(self.repository_mut(kind)?) {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound { .. }) => {
                debug!(
                    target = "application::moderation::reconcile",
                    kind = %kind,
                    id = %id,
                    "ignoring stale response for missing item"
                );
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn finish_bulk(
        &self,
        action: BulkAction,
        kind: ContentKind,
        total: usize,
        failed: usize,
    ) -> Result<BulkOutcome, ModerationError> {
        let succeeded = total - failed;
        let action_label = match action {
            BulkAction::Approve => "bulk_approve",
            BulkAction::Delete => "bulk_delete",
        };
        record_action(kind, action_label, failed == 0);

        if failed == 0 {
            info!(
                target = "application::moderation::bulk",
                action = %action,
                kind = %kind,
                count = total,
                "bulk action completed"
            );
            return Ok(BulkOutcome {
                action,
                kind,
                applied: total,
            });
        }

        warn!(
            target = "application::moderation::bulk",
            action = %action,
            kind = %kind,
            succeeded,
            failed,
            "bulk action partially failed"
        );
        Err(ModerationError::PartialBulkFailure {
            action,
            kind,
            total,
            succeeded,
            failed,
        })
    }
}
