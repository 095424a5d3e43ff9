//! Node identifier allocation.
//!
//! Temporary identifiers carry a reserved prefix so a node can be
//! classified by identifier shape alone. Permanent identifiers come from
//! the same space persisted storage uses (random 128-bit values) and are
//! allocated only while building a reconciliation payload; the tree keeps
//! its temporary identifiers until the authoritative response arrives.

/// Reserved prefix for identifiers that have no server identity yet.
/// The two namespaces are disjoint and never reused across the swap.
pub const TEMPORARY_PREFIX: &str = "local-";

/// Allocates a temporary identifier, unique for the process lifetime.
pub fn temporary() -> String {
    format!("{TEMPORARY_PREFIX}{}", uuid::Uuid::new_v4().simple())
}

/// Allocates a permanent identifier in the persisted-storage id space.
pub fn permanent() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn is_temporary(id: &str) -> bool {
    id.starts_with(TEMPORARY_PREFIX)
}
