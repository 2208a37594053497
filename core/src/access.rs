#![deny(missing_docs)]

//! # Route Access
//!
//! Decides which operations exist for an entity and which `security`
//! requirements each emitted operation carries.
//!
//! - **Availability**: a per-entity table evaluated once; a disabled action
//!   removes its whole method entry and the components only it needs.
//! - **AccessResolver**: pluggable async lookup producing the OpenAPI
//!   `security` array for a single operation.

use crate::entity::EntityDefinition;
use crate::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// The four access-controlled operations of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// List, get, count.
    Read,
    /// Create a document.
    Create,
    /// Update a document (or a global).
    Update,
    /// Delete a document.
    Delete,
}

impl Action {
    /// Lowercase action name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the host framework guards one action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessRule {
    /// Anyone may call the operation.
    Public,
    /// Callers must authenticate.
    #[default]
    Authenticated,
    /// The operation does not exist.
    Disabled,
}

/// Access rules per action. Missing entries mean [`AccessRule::Authenticated`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRules {
    /// Rule for reads.
    #[serde(default)]
    pub read: AccessRule,
    /// Rule for creates.
    #[serde(default)]
    pub create: AccessRule,
    /// Rule for updates.
    #[serde(default)]
    pub update: AccessRule,
    /// Rule for deletes.
    #[serde(default)]
    pub delete: AccessRule,
}

impl AccessRules {
    /// Rule for `action`.
    pub fn rule(&self, action: Action) -> AccessRule {
        match action {
            Action::Read => self.read,
            Action::Create => self.create,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    /// Replaces the rule for `action`.
    pub fn set(&mut self, action: Action, rule: AccessRule) {
        match action {
            Action::Read => self.read = rule,
            Action::Create => self.create = rule,
            Action::Update => self.update = rule,
            Action::Delete => self.delete = rule,
        }
    }
}

/// Returns whether `action` is exposed for `entity`.
pub fn is_available(entity: &EntityDefinition, action: Action) -> bool {
    entity.access.rule(action) != AccessRule::Disabled
}

/// Per-entity availability of each action, computed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    read: bool,
    create: bool,
    update: bool,
    delete: bool,
}

/// Components that only exist when at least one of their actions is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Plural list schema and the read responses.
    List,
    /// Upsert confirmation schema and response.
    UpsertConfirmation,
    /// Request body wrapper.
    RequestBody,
}

impl Gate {
    /// The actions that unlock this gate.
    pub fn actions(&self) -> &'static [Action] {
        match self {
            Gate::List => &[Action::Read],
            Gate::UpsertConfirmation => &[Action::Create, Action::Update, Action::Delete],
            Gate::RequestBody => &[Action::Create, Action::Update],
        }
    }
}

impl Availability {
    /// Evaluates the table for `entity`.
    pub fn of(entity: &EntityDefinition) -> Self {
        Self {
            read: is_available(entity, Action::Read),
            create: is_available(entity, Action::Create),
            update: is_available(entity, Action::Update),
            delete: is_available(entity, Action::Delete),
        }
    }

    /// Whether a single action is available.
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Read => self.read,
            Action::Create => self.create,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    /// Whether any of `actions` is available.
    pub fn any(&self, actions: &[Action]) -> bool {
        actions.iter().any(|a| self.allows(*a))
    }

    /// Whether `gate` is open.
    pub fn opens(&self, gate: Gate) -> bool {
        self.any(gate.actions())
    }
}

/// The global access policy handed to every resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityPolicy {
    /// Name of the security scheme referenced by protected operations.
    pub scheme: String,
    /// Scopes required by protected operations.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            scheme: "bearerAuth".to_string(),
            scopes: Vec::new(),
        }
    }
}

/// Produces the OpenAPI `security` array of one operation.
///
/// Resolution may consult external policy stores, so it is async and awaited
/// once per emitted operation.
#[async_trait]
pub trait AccessResolver: Send + Sync {
    /// Resolves the security requirements of `action` on `entity`.
    async fn resolve(
        &self,
        entity: &EntityDefinition,
        action: Action,
        policy: &SecurityPolicy,
    ) -> AppResult<Value>;
}

/// Maps [`AccessRule`]s onto the configured security scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAccessResolver;

#[async_trait]
impl AccessResolver for DefaultAccessResolver {
    async fn resolve(
        &self,
        entity: &EntityDefinition,
        action: Action,
        policy: &SecurityPolicy,
    ) -> AppResult<Value> {
        match entity.access.rule(action) {
            AccessRule::Public => Ok(json!([])),
            AccessRule::Authenticated | AccessRule::Disabled => {
                let mut requirement = Map::new();
                requirement.insert(policy.scheme.clone(), json!(policy.scopes));
                Ok(Value::Array(vec![Value::Object(requirement)]))
            }
        }
    }
}
