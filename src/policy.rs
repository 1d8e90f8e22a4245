//! Per-operation authorization policies.
//!
//! Every protected [`Operation`] has exactly one [`OperationPolicy`]: the
//! set of roles admitted and the description returned on denial. Role
//! membership is exact; there is no hierarchy between roles.
//!
//! The table is validated once at startup. A policy file (`POLICY_FILE`)
//! can replace the built-in table; it goes through the same checks.
//!
//! ```json
//! [
//!   {
//!     "resource": "admin",
//!     "action": "create",
//!     "allowed_roles": ["superadmin", "manager"],
//!     "denial": "Only superadmins and managers can create admins"
//!   }
//! ]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use gateway_auth::{Identity, Role};
use gateway_core::{ApiError, Operation, ParseOperationError};

/// Policy as written in a policy file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub resource: String,
    pub action: String,
    pub allowed_roles: Vec<String>,
    pub denial: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("policy entry #{index}: {source}")]
    UnknownOperation {
        index: usize,
        #[source]
        source: ParseOperationError,
    },
    #[error("{0} is not an exposed operation")]
    NotExposed(Operation),
    #[error("{0} is public and cannot carry a policy")]
    PublicOperation(Operation),
    #[error("{operation}: unknown role '{role}'")]
    UnknownRole { operation: Operation, role: String },
    #[error("{0}: allowed roles must not be empty")]
    EmptyRoles(Operation),
    #[error("{0}: denial description must not be empty")]
    EmptyDenial(Operation),
    #[error("{0} has more than one policy")]
    Duplicate(Operation),
    #[error("{0} has no policy")]
    Missing(Operation),
    #[error("failed to read policy file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse policy file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPolicy {
    pub operation: Operation,
    pub allowed_roles: BTreeSet<Role>,
    pub denial: String,
}

impl OperationPolicy {
    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }

    pub fn authorize(&self, identity: &Identity) -> Result<(), ApiError> {
        if self.allows(identity.role) {
            Ok(())
        } else {
            Err(ApiError::permission_denied(self.denial.clone())
                .with_cause(self.operation.to_string()))
        }
    }
}

/// Validated policies, total over the protected operations.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: BTreeMap<Operation, OperationPolicy>,
}

impl PolicyTable {
    pub fn from_entries(entries: Vec<PolicyEntry>) -> Result<Self, PolicyError> {
        let mut policies = BTreeMap::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let resource = entry
                .resource
                .parse()
                .map_err(|source| PolicyError::UnknownOperation { index, source })?;
            let action = entry
                .action
                .parse()
                .map_err(|source| PolicyError::UnknownOperation { index, source })?;
            let operation = Operation::new(resource, action);

            if !operation.is_exposed() {
                return Err(PolicyError::NotExposed(operation));
            }
            if operation.is_public() {
                return Err(PolicyError::PublicOperation(operation));
            }

            let mut allowed_roles = BTreeSet::new();
            for name in &entry.allowed_roles {
                let role = name.parse::<Role>().map_err(|_| PolicyError::UnknownRole {
                    operation,
                    role: name.clone(),
                })?;
                allowed_roles.insert(role);
            }
            if allowed_roles.is_empty() {
                return Err(PolicyError::EmptyRoles(operation));
            }
            if entry.denial.trim().is_empty() {
                return Err(PolicyError::EmptyDenial(operation));
            }

            let policy = OperationPolicy {
                operation,
                allowed_roles,
                denial: entry.denial,
            };
            if policies.insert(operation, policy).is_some() {
                return Err(PolicyError::Duplicate(operation));
            }
        }

        if let Some(missing) = Operation::protected().find(|op| !policies.contains_key(op)) {
            return Err(PolicyError::Missing(missing));
        }

        Ok(Self { policies })
    }

    pub fn builtin() -> Result<Self, PolicyError> {
        Self::from_entries(builtin_entries())
    }

    pub fn from_file(path: &Path) -> Result<Self, PolicyError> {
        let raw = fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<PolicyEntry> =
            serde_json::from_str(&raw).map_err(|source| PolicyError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_entries(entries)
    }

    /// The file table when a path is given, the built-in table otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, PolicyError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    pub fn get(&self, operation: Operation) -> Option<&OperationPolicy> {
        self.policies.get(&operation)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationPolicy> {
        self.policies.values()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

fn entry(resource: &str, action: &str, roles: &[&str], denial: &str) -> PolicyEntry {
    PolicyEntry {
        resource: resource.to_string(),
        action: action.to_string(),
        allowed_roles: roles.iter().map(|r| r.to_string()).collect(),
        denial: denial.to_string(),
    }
}

pub fn builtin_entries() -> Vec<PolicyEntry> {
    const ADMIN_MANAGERS: &[&str] = &["superadmin", "manager"];
    const ADMIN_STAFF: &[&str] = &["superadmin", "admin", "manager"];
    const STUDENT_STAFF: &[&str] = &["superadmin", "administrator", "manager"];
    const STUDENT_SELF: &[&str] = &["superadmin", "administrator", "manager", "student"];
    const TASK_USERS: &[&str] = &["superadmin", "admin", "user"];

    vec![
        entry("admin", "getall", ADMIN_MANAGERS, "Only superadmins and managers can list admins"),
        entry("admin", "create", ADMIN_MANAGERS, "Only superadmins and managers can create admins"),
        entry("admin", "get", ADMIN_STAFF, "Only superadmins, admins and managers can view admins"),
        entry("admin", "update", ADMIN_STAFF, "Only superadmins, admins and managers can update admins"),
        entry("admin", "delete", ADMIN_STAFF, "Only superadmins, admins and managers can delete admins"),
        entry(
            "admin",
            "change_password",
            ADMIN_STAFF,
            "Only superadmins, admins and managers can change admin passwords",
        ),
        entry("student", "getall", STUDENT_STAFF, "Only superadmins, administrators and managers can list students"),
        entry("student", "create", STUDENT_STAFF, "Only superadmins, administrators and managers can create students"),
        entry("student", "delete", STUDENT_STAFF, "Only superadmins, administrators and managers can delete students"),
        entry("student", "get", STUDENT_SELF, "You are not allowed to view students"),
        entry("student", "update", STUDENT_SELF, "You are not allowed to update students"),
        entry(
            "student",
            "change_password",
            STUDENT_SELF,
            "You are not allowed to change student passwords",
        ),
        entry("task", "getall", TASK_USERS, "Only superadmins, admins and users can list tasks"),
        entry("task", "get", TASK_USERS, "Only superadmins, admins and users can view tasks"),
        entry("task", "get_by_task_id", TASK_USERS, "Only superadmins, admins and users can view tasks"),
        entry("task", "create", TASK_USERS, "Only superadmins, admins and users can create tasks"),
        entry("task", "update", TASK_USERS, "Only superadmins, admins and users can update tasks"),
        entry("task", "delete", TASK_USERS, "Only superadmins, admins and users can delete tasks"),
        entry("task", "change_status", TASK_USERS, "Only superadmins, admins and users can change task status"),
    ]
}
