//! Identifiers for the operations the gateway exposes.
//!
//! An [`Operation`] is a (resource, action) pair. Policies, dispatchers,
//! metrics labels and log fields are all keyed by it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseOperationError {
    #[error("unknown resource '{0}'")]
    UnknownResource(String),
    #[error("unknown action '{0}'")]
    UnknownAction(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Admin,
    Student,
    Task,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Admin, Resource::Student, Resource::Task];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseOperationError::UnknownResource(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    GetList,
    GetById,
    Create,
    Update,
    Delete,
    ChangePassword,
    Login,
    Register,
    RegisterConfirm,
    GetByExternalId,
    ChangeStatus,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::GetList,
        Action::GetById,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::ChangePassword,
        Action::Login,
        Action::Register,
        Action::RegisterConfirm,
        Action::GetByExternalId,
        Action::ChangeStatus,
    ];

    /// Name used in routes and policy files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetList => "getall",
            Self::GetById => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ChangePassword => "change_password",
            Self::Login => "login",
            Self::Register => "register",
            Self::RegisterConfirm => "register-confirm",
            Self::GetByExternalId => "get_by_task_id",
            Self::ChangeStatus => "change_status",
        }
    }

    /// Public actions carry no credential and are never policy-gated.
    pub fn is_public(self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::RegisterConfirm)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ParseOperationError::UnknownAction(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operation {
    pub resource: Resource,
    pub action: Action,
}

impl Operation {
    pub const fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// Every operation reachable over HTTP.
    pub const ALL: [Operation; 25] = [
        Operation::new(Resource::Admin, Action::GetList),
        Operation::new(Resource::Admin, Action::GetById),
        Operation::new(Resource::Admin, Action::Create),
        Operation::new(Resource::Admin, Action::Update),
        Operation::new(Resource::Admin, Action::Delete),
        Operation::new(Resource::Admin, Action::ChangePassword),
        Operation::new(Resource::Admin, Action::Login),
        Operation::new(Resource::Admin, Action::Register),
        Operation::new(Resource::Admin, Action::RegisterConfirm),
        Operation::new(Resource::Student, Action::GetList),
        Operation::new(Resource::Student, Action::GetById),
        Operation::new(Resource::Student, Action::Create),
        Operation::new(Resource::Student, Action::Update),
        Operation::new(Resource::Student, Action::Delete),
        Operation::new(Resource::Student, Action::ChangePassword),
        Operation::new(Resource::Student, Action::Login),
        Operation::new(Resource::Student, Action::Register),
        Operation::new(Resource::Student, Action::RegisterConfirm),
        Operation::new(Resource::Task, Action::GetList),
        Operation::new(Resource::Task, Action::GetById),
        Operation::new(Resource::Task, Action::GetByExternalId),
        Operation::new(Resource::Task, Action::Create),
        Operation::new(Resource::Task, Action::Update),
        Operation::new(Resource::Task, Action::Delete),
        Operation::new(Resource::Task, Action::ChangeStatus),
    ];

    pub fn is_public(self) -> bool {
        self.action.is_public()
    }

    pub fn is_exposed(self) -> bool {
        Self::ALL.contains(&self)
    }

    /// Operations that require a credential and a policy.
    pub fn protected() -> impl Iterator<Item = Operation> {
        Self::ALL.into_iter().filter(|op| !op.is_public())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.action)
    }
}
