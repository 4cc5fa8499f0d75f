//! The single place raw role strings are interpreted.

use crate::session::Session;

const STUDENT_ROLE: &str = "student";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Anonymous,
    Student,
    /// Any authenticated role other than `student`.
    Staff,
}

impl Capability {
    pub fn is_staff(self) -> bool {
        self == Self::Staff
    }
}

/// Maps a session to its capability tag.
///
/// Unrecognized roles are staff: the gate is permissive by default, not a
/// denylist of known staff roles.
pub fn classify(session: &Session) -> Capability {
    match session.role.as_deref().map(str::trim) {
        None | Some("") => Capability::Anonymous,
        Some(STUDENT_ROLE) => Capability::Student,
        Some(_) => Capability::Staff,
    }
}

pub fn is_staff(session: &Session) -> bool {
    classify(session).is_staff()
}

/// UI affordances on the projects view granted by a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Affordances {
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl Affordances {
    pub fn for_capability(capability: Capability) -> Self {
        let staff = capability.is_staff();
        Self {
            can_create: staff,
            can_edit: staff,
            can_delete: staff,
        }
    }

    pub fn for_session(session: &Session) -> Self {
        Self::for_capability(classify(session))
    }
}

#[cfg(test)]
#[path = "tests/role_tests.rs"]
mod tests;
