//! Access-control entries attached to documents and stored files.
//!
//! The backend encodes an entry as `kind("role")`, e.g. `read("user:u1")`.
//! Everything this crate creates is owner-only: see [`owner_only`].

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionKind {
    Read,
    Create,
    Update,
    Delete,
    /// Shorthand the backend expands to create, update and delete.
    Write,
}

impl PermissionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionKind::Read => "read",
            PermissionKind::Create => "create",
            PermissionKind::Update => "update",
            PermissionKind::Delete => "delete",
            PermissionKind::Write => "write",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "read" => Some(PermissionKind::Read),
            "create" => Some(PermissionKind::Create),
            "update" => Some(PermissionKind::Update),
            "delete" => Some(PermissionKind::Delete),
            "write" => Some(PermissionKind::Write),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Any,
    Users,
    Guests,
    User(String),
    Team { id: String, role: Option<String> },
    Label(String),
}

impl Role {
    pub fn user(id: impl Into<String>) -> Self {
        Role::User(id.into())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Any => f.write_str("any"),
            Role::Users => f.write_str("users"),
            Role::Guests => f.write_str("guests"),
            Role::User(id) => write!(f, "user:{id}"),
            Role::Team { id, role: None } => write!(f, "team:{id}"),
            Role::Team {
                id,
                role: Some(role),
            } => write!(f, "team:{id}/{role}"),
            Role::Label(name) => write!(f, "label:{name}"),
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "any" => return Ok(Role::Any),
            "users" => return Ok(Role::Users),
            "guests" => return Ok(Role::Guests),
            _ => {}
        }

        let (scope, rest) = value
            .split_once(':')
            .ok_or_else(|| DomainError::validation(format!("unknown role `{value}`")))?;
        if rest.is_empty() {
            return Err(DomainError::validation(format!("role `{value}` has no subject")));
        }

        match scope {
            "user" => Ok(Role::User(rest.to_string())),
            "label" => Ok(Role::Label(rest.to_string())),
            "team" => match rest.split_once('/') {
                Some((id, role)) => Ok(Role::Team {
                    id: id.to_string(),
                    role: Some(role.to_string()),
                }),
                None => Ok(Role::Team {
                    id: rest.to_string(),
                    role: None,
                }),
            },
            _ => Err(DomainError::validation(format!("unknown role `{value}`"))),
        }
    }
}

/// One capability granted to one role on one resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    pub kind: PermissionKind,
    pub role: Role,
}

impl Permission {
    pub fn new(kind: PermissionKind, role: Role) -> Self {
        Self { kind, role }
    }

    pub fn read(role: Role) -> Self {
        Self::new(PermissionKind::Read, role)
    }

    pub fn update(role: Role) -> Self {
        Self::new(PermissionKind::Update, role)
    }

    pub fn delete(role: Role) -> Self {
        Self::new(PermissionKind::Delete, role)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.kind.as_str(), self.role)
    }
}

impl FromStr for Permission {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || DomainError::validation(format!("malformed permission `{value}`"));

        let (kind, rest) = value.split_once('(').ok_or_else(malformed)?;
        let role = rest
            .strip_suffix(')')
            .and_then(|inner| inner.strip_prefix('"'))
            .and_then(|inner| inner.strip_suffix('"'))
            .ok_or_else(malformed)?;
        let kind = PermissionKind::parse(kind).ok_or_else(malformed)?;

        Ok(Self::new(kind, role.parse()?))
    }
}

/// Read, update and delete for `user_id` alone. Used for every post and file.
pub fn owner_only(user_id: &str) -> [Permission; 3] {
    [
        Permission::read(Role::user(user_id)),
        Permission::update(Role::user(user_id)),
        Permission::delete(Role::user(user_id)),
    ]
}
