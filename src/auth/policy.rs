/// Outcome of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Allows a mutation only when the caller is the resource owner.
///
/// Ids are compared as strings, exactly as they are stored.
pub fn authorize(caller_id: &str, resource_owner_id: &str) -> Decision {
    if caller_id == resource_owner_id {
        Decision::Allow
    } else {
        Decision::Deny
    }
}
