//! Object identifiers and collision-free allocation
//!
//! Every object in a manifest graph is keyed by a 96-bit identifier written
//! as 24 uppercase hexadecimal digits. New identifiers are derived by
//! hashing a per-project seed with a monotonic counter and truncating the
//! digest, then checked against the registry of identifiers already in use
//! so a freshly loaded graph can never hand out a colliding id.

use sha1::{Digest, Sha1};
use std::collections::HashSet;
use std::fmt;

/// Number of hexadecimal digits in a canonical identifier
pub const ID_DIGITS: usize = 24;

/// Key of one object in the store
///
/// Identifiers read from disk are kept verbatim even when they do not match
/// the canonical 24-digit shape, so hand-edited manifests still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(raw: impl Into<String>) -> Self {
        ObjectId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier has the canonical allocator shape
    pub fn is_canonical(&self) -> bool {
        self.0.len() == ID_DIGITS
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(raw: &str) -> Self {
        ObjectId::new(raw)
    }
}

/// Deterministic identifier source for one graph instance
///
/// Candidates come from `SHA-1(seed, counter)` truncated to [`ID_DIGITS`]
/// digits. A candidate already registered is skipped and the counter
/// advances, so allocation stays deterministic for a given seed and set of
/// registered identifiers. Identifiers are never returned to the pool, a
/// removed object's id stays reserved for the life of the session.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    seed: String,
    counter: u64,
    in_use: HashSet<ObjectId>,
}

impl IdAllocator {
    pub fn new(seed: impl Into<String>) -> Self {
        IdAllocator {
            seed: seed.into(),
            counter: 0,
            in_use: HashSet::new(),
        }
    }

    /// Record an identifier as in use, returns false when already registered
    pub fn register(&mut self, id: &ObjectId) -> bool {
        self.in_use.insert(id.clone())
    }

    pub fn is_registered(&self, id: &ObjectId) -> bool {
        self.in_use.contains(id)
    }

    pub fn registered_count(&self) -> usize {
        self.in_use.len()
    }

    /// Produce a fresh identifier, registering it before returning
    pub fn allocate(&mut self) -> ObjectId {
        loop {
            let mut hasher = Sha1::new();
            hasher.update(self.seed.as_bytes());
            hasher.update(self.counter.to_be_bytes());
            self.counter += 1;

            let digest = format!("{:x}", hasher.finalize());
            let candidate = ObjectId::new(digest[..ID_DIGITS].to_ascii_uppercase());
            if self.in_use.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    include!("id.test.rs");
}
