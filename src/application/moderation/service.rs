use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::application::content::ContentRepository;
use crate::application::repos::ModerationApi;
use crate::domain::types::ContentKind;

use super::auto_approval::AutoApprovalPolicy;
use super::starred::StarredCapPolicy;
use super::types::{LoadState, ModerationError, ModerationOptions};

/// Owns one repository per content kind and applies moderation actions to
/// both the backend and the local copy.
pub struct ModerationController {
    pub(crate) api: Arc<dyn ModerationApi>,
    pub(crate) repositories: BTreeMap<ContentKind, LoadState<ContentRepository>>,
    pub(crate) auto_approval: AutoApprovalPolicy,
    pub(crate) starred_cap: StarredCapPolicy,
}

impl ModerationController {
    pub fn new(api: Arc<dyn ModerationApi>, options: ModerationOptions) -> Self {
        Self {
            api,
            repositories: BTreeMap::new(),
            auto_approval: AutoApprovalPolicy::new(options.auto_approval_scope),
            starred_cap: StarredCapPolicy::new(options.starred_limit),
        }
    }

    /// Fetch the listing for `kind`, replacing whatever was held before.
    pub async fn load(&mut self, kind: ContentKind) -> Result<&ContentRepository, ModerationError> {
        self.repositories.insert(kind, LoadState::Loading);

        let loaded = match self.api.list(kind).await {
            Ok(items) => ContentRepository::from_items(kind, items).map_err(ModerationError::from),
            Err(err) => Err(ModerationError::Api(err)),
        };

        match loaded {
            Ok(repo) => {
                info!(
                    target = "application::moderation::load",
                    kind = %kind,
                    items = repo.len(),
                    "listing loaded"
                );
                self.repositories.insert(kind, LoadState::Ready(repo));
                self.repository(kind)
            }
            Err(err) => {
                warn!(
                    target = "application::moderation::load",
                    kind = %kind,
                    error = %err,
                    "failed to load listing"
                );
                self.repositories
                    .insert(kind, LoadState::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn load_state(&self, kind: ContentKind) -> Option<LoadState<&ContentRepository>> {
        self.repositories.get(&kind).map(LoadState::as_ref)
    }

    pub fn repository(&self, kind: ContentKind) -> Result<&ContentRepository, ModerationError> {
        self.repositories
            .get(&kind)
            .and_then(LoadState::ready)
            .ok_or(ModerationError::NotLoaded(kind))
    }

    pub(crate) fn repository_mut(
        &mut self,
        kind: ContentKind,
    ) -> Result<&mut ContentRepository, ModerationError> {
        self.repositories
            .get_mut(&kind)
            .and_then(LoadState::ready_mut)
            .ok_or(ModerationError::NotLoaded(kind))
    }

    pub fn auto_approval(&self) -> &AutoApprovalPolicy {
        &self.auto_approval
    }
}
