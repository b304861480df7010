use crate::error::ServiceError;
use crate::policy::{PolicyState, RuleKind};
use crate::repository::RepositoryState;
use std::sync::Arc;

/// PolicySynchronizer
///
/// Reconciles one subject's policy rules against persisted truth: fetch the
/// subject's current associations from the repository, drop every rule the
/// store holds for that subject, then re-add one rule per association. Both
/// dependencies arrive through the constructor; the synchronizer owns no
/// state of its own.
///
/// The delete and the adds are not one atomic step. A concurrent
/// authorization check landing between them sees an empty rule set for the
/// subject and denies, since checks fail closed.
pub struct PolicySynchronizer {
    repo: RepositoryState,
    policy: PolicyState,
}

/// The shared handle handlers keep in `AppState`.
pub type SynchronizerState = Arc<PolicySynchronizer>;

impl PolicySynchronizer {
    pub fn new(repo: RepositoryState, policy: PolicyState) -> Self {
        Self { repo, policy }
    }

    /// sync_role_policy
    ///
    /// Rebuilds the permission-grant rules for one role: one grant per
    /// associated menu with a non-empty URL. Menus with an empty URL are
    /// UI groupings with nothing to enforce and are skipped.
    pub async fn sync_role_policy(&self, role_id: i64) -> Result<(), ServiceError> {
        let role = self.repo.get_role(role_id).await?;
        let menus = self.repo.get_role_menus(role_id).await?;

        self.policy
            .remove_subject_rules(&role.role_name, RuleKind::PermissionGrant);
        for menu in &menus {
            if menu.url.is_empty() {
                continue;
            }
            self.policy
                .add_rule(&role.role_name, RuleKind::PermissionGrant, &menu.url);
        }
        tracing::debug!(
            role = %role.role_name,
            grants = menus.iter().filter(|m| !m.url.is_empty()).count(),
            "role policy synchronized"
        );
        Ok(())
    }

    /// sync_user_policy
    ///
    /// Rebuilds the role-assignment rules for one user: one assignment per
    /// role the user currently holds.
    pub async fn sync_user_policy(&self, user_id: i64) -> Result<(), ServiceError> {
        let user = self.repo.get_user(user_id).await?;
        let roles = self.repo.get_user_roles(user_id).await?;

        self.policy
            .remove_subject_rules(&user.username, RuleKind::RoleAssignment);
        for role in &roles {
            self.policy
                .add_rule(&user.username, RuleKind::RoleAssignment, &role.role_name);
        }
        tracing::debug!(
            user = %user.username,
            assignments = roles.len(),
            "user policy synchronized"
        );
        Ok(())
    }

    /// sync_all_roles
    ///
    /// Startup bulk load: synchronizes every persisted role sequentially.
    /// The first failure aborts and propagates; the caller treats it as
    /// fatal.
    pub async fn sync_all_roles(&self) -> Result<(), ServiceError> {
        let roles = self.repo.get_all_roles().await?;
        for role in &roles {
            self.sync_role_policy(role.id).await?;
        }
        tracing::info!(count = roles.len(), "all role policies loaded");
        Ok(())
    }

    /// sync_all_users
    ///
    /// Startup bulk load for users, same abort-on-first-failure contract.
    pub async fn sync_all_users(&self) -> Result<(), ServiceError> {
        let users = self.repo.get_all_users().await?;
        for user in &users {
            self.sync_user_policy(user.id).await?;
        }
        tracing::info!(count = users.len(), "all user policies loaded");
        Ok(())
    }
}
