use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// RuleKind
///
/// The two relation kinds held by the policy store:
/// - `RoleAssignment`: subject is a username, object is a role name.
/// - `PermissionGrant`: subject is a role name, object is a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    RoleAssignment,
    PermissionGrant,
}

/// PolicyRule
///
/// One authorization triple. Subjects and objects are *names* (username,
/// role name, URL); numeric ids never enter the store, so any rename of a
/// user or role must be followed by a re-synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub subject: String,
    pub kind: RuleKind,
    pub object: String,
}

/// PolicyStore
///
/// The in-memory authorization engine. Constructed once at startup and
/// shared as `Arc<PolicyStore>` through `AppState`; the policy synchronizer
/// is the only writer, while authorization checks may read concurrently.
///
/// All mutations go through the `RwLock` write guard, so a reader never
/// observes a torn rule. A delete-then-add synchronization cycle *is*
/// observable as two discrete states (briefly empty in between); checks
/// fail closed on missing rules, so that window only ever denies.
#[derive(Debug, Default)]
pub struct PolicyStore {
    rules: RwLock<Vec<PolicyRule>>,
}

/// The concrete type used to share the policy store across the application.
pub type PolicyState = Arc<PolicyStore>;

impl PolicyStore {
    pub fn new() -> Self {
        PolicyStore {
            rules: RwLock::new(Vec::new()),
        }
    }

    /// Adds a single rule. Duplicates are filtered so that repeated
    /// synchronization of unchanged state stays idempotent.
    pub fn add_rule(&self, subject: &str, kind: RuleKind, object: &str) {
        let rule = PolicyRule {
            subject: subject.to_string(),
            kind,
            object: object.to_string(),
        };
        let mut rules = self.rules.write().expect("policy lock poisoned");
        if !rules.contains(&rule) {
            rules.push(rule);
        }
    }

    /// Removes every rule of the given kind whose subject matches. This is
    /// the delete half of the replace-all-rules-for-subject cycle.
    pub fn remove_subject_rules(&self, subject: &str, kind: RuleKind) {
        let mut rules = self.rules.write().expect("policy lock poisoned");
        rules.retain(|r| !(r.kind == kind && r.subject == subject));
    }

    /// Returns the objects of every rule of the given kind for a subject:
    /// role names for a username, URLs for a role name.
    pub fn rules_for(&self, subject: &str, kind: RuleKind) -> Vec<String> {
        let rules = self.rules.read().expect("policy lock poisoned");
        rules
            .iter()
            .filter(|r| r.kind == kind && r.subject == subject)
            .map(|r| r.object.clone())
            .collect()
    }

    /// Snapshot of the full rule set, mainly for diagnostics and tests.
    pub fn rules(&self) -> Vec<PolicyRule> {
        self.rules.read().expect("policy lock poisoned").clone()
    }

    /// Authorization check: does `username` hold a role that grants `url`?
    /// Missing rules deny; there is no default-allow path.
    pub fn enforce(&self, username: &str, url: &str) -> bool {
        let rules = self.rules.read().expect("policy lock poisoned");
        rules
            .iter()
            .filter(|r| r.kind == RuleKind::RoleAssignment && r.subject == username)
            .any(|assignment| {
                rules.iter().any(|grant| {
                    grant.kind == RuleKind::PermissionGrant
                        && grant.subject == assignment.object
                        && grant.object == url
                })
            })
    }
}
