//! Auto-approval flags, round-tripped to the backend.
//!
//! The flag never touches existing items. The submission path (outside this
//! crate) consults it to decide whether new items start approved.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use metrics::counter;
use tracing::{info, warn};

use crate::domain::error::DomainError;
use crate::domain::types::{ContentKind, PublishState};

use super::service::ModerationController;
use super::types::ModerationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoApprovalScope {
    #[default]
    PerKind,
    Global,
}

impl AutoApprovalScope {
    pub fn as_str(self) -> &'static str {
        match self {
            AutoApprovalScope::PerKind => "per_kind",
            AutoApprovalScope::Global => "global",
        }
    }
}

impl fmt::Display for AutoApprovalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutoApprovalScope {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "per_kind" | "kind" => Ok(AutoApprovalScope::PerKind),
            "global" => Ok(AutoApprovalScope::Global),
            _ => Err(DomainError::unknown("auto-approval scope", value)),
        }
    }
}

/// Last flag values confirmed by the backend.
#[derive(Debug, Clone, Default)]
pub struct AutoApprovalPolicy {
    scope: AutoApprovalScope,
    flags: HashMap<Option<ContentKind>, bool>,
}

impl AutoApprovalPolicy {
    pub fn new(scope: AutoApprovalScope) -> Self {
        Self {
            scope,
            flags: HashMap::new(),
        }
    }

    pub fn scope(&self) -> AutoApprovalScope {
        self.scope
    }

    /// Backend key for `kind`: the kind itself, or `None` for a global flag.
    pub fn scope_key(&self, kind: ContentKind) -> Option<ContentKind> {
        match self.scope {
            AutoApprovalScope::PerKind => Some(kind),
            AutoApprovalScope::Global => None,
        }
    }

    /// `None` until the flag has been read from or written to the backend.
    pub fn is_enabled(&self, kind: ContentKind) -> Option<bool> {
        self.flags.get(&self.scope_key(kind)).copied()
    }

    pub fn record(&mut self, kind: ContentKind, enabled: bool) {
        let key = self.scope_key(kind);
        self.flags.insert(key, enabled);
    }

    /// State a newly submitted item of `kind` should start in.
    pub fn initial_state(&self, kind: ContentKind) -> PublishState {
        if self.is_enabled(kind).unwrap_or(false) {
            PublishState::Approved
        } else {
            PublishState::Pending
        }
    }
}

impl ModerationController {
    pub async fn load_auto_approval(&mut self, kind: ContentKind) -> Result<bool, ModerationError> {
        let key = self.auto_approval.scope_key(kind);
        let enabled = self.api.auto_approval(key).await?;
        self.auto_approval.record(kind, enabled);
        Ok(enabled)
    }

    /// Flip the flag for `kind`. The local value only changes after the
    /// backend confirms the write.
    pub async fn toggle_auto_approval(&mut self, kind: ContentKind) -> Result<bool, ModerationError> {
        let current = match self.auto_approval.is_enabled(kind) {
            Some(enabled) => enabled,
            None => self.load_auto_approval(kind).await?,
        };
        let next = !current;
        let key = self.auto_approval.scope_key(kind);

        if let Err(err) = self.api.set_auto_approval(key, next).await {
            counter!("gradboard_moderation_actions_total", "kind" => kind.as_str(), "action" => "auto_approval", "outcome" => "error").increment(1);
            warn!(
                target = "application::moderation::toggle_auto_approval",
                kind = %kind,
                error = %err,
                "failed to persist auto-approval flag"
            );
            return Err(err.into());
        }

        self.auto_approval.record(kind, next);
        counter!("gradboard_moderation_actions_total", "kind" => kind.as_str(), "action" => "auto_approval", "outcome" => "ok").increment(1);
        info!(
            target = "application::moderation::toggle_auto_approval",
            kind = %kind,
            scope = %self.auto_approval.scope(),
            enabled = next,
            "auto-approval updated"
        );
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_flag_means_pending_submissions() {
        let policy = AutoApprovalPolicy::new(AutoApprovalScope::PerKind);
        assert_eq!(policy.is_enabled(ContentKind::Job), None);
        assert_eq!(policy.initial_state(ContentKind::Job), PublishState::Pending);
    }

    #[test]
    fn per_kind_flags_are_independent() {
        let mut policy = AutoApprovalPolicy::new(AutoApprovalScope::PerKind);
        policy.record(ContentKind::Exam, true);

        assert_eq!(policy.is_enabled(ContentKind::Exam), Some(true));
        assert_eq!(policy.is_enabled(ContentKind::Job), None);
        assert_eq!(policy.initial_state(ContentKind::Exam), PublishState::Approved);
    }

    #[test]
    fn global_flag_applies_to_every_kind() {
        let mut policy = AutoApprovalPolicy::new(AutoApprovalScope::Global);
        policy.record(ContentKind::Internship, true);

        for kind in ContentKind::ALL {
            assert_eq!(policy.is_enabled(kind), Some(true));
        }
        assert_eq!(policy.scope_key(ContentKind::Job), None);
    }

    #[test]
    fn scope_parses_common_spellings() {
        assert_eq!(
            "per-kind".parse::<AutoApprovalScope>().expect("scope"),
            AutoApprovalScope::PerKind
        );
        assert_eq!(
            "GLOBAL".parse::<AutoApprovalScope>().expect("scope"),
            AutoApprovalScope::Global
        );
        assert!("tenant".parse::<AutoApprovalScope>().is_err());
    }
}
