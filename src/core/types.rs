//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ObjectId`] - Validated git object identifier (SHA-1 or SHA-256 hex)
//! - [`Fingerprint`] - Repository state hash for change detection
//!
//! # Validation
//!
//! [`ObjectId`] enforces validity at construction time, so an invalid hash
//! can never reach the vertex registry or the serializer.
//!
//! # Examples
//!
//! ```
//! use gitviz::core::types::ObjectId;
//!
//! let id = ObjectId::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! assert_eq!(id.short(7), "abc123d");
//!
//! assert!(ObjectId::new("not-a-hash").is_err());
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),
}

/// A git object identifier (SHA-1 or SHA-256).
///
/// Identifiers are normalized to lowercase; equality is byte equality.
/// Two objects with equal ids are interchangeable — this is the sole key
/// correlating store objects to graph vertices.
///
/// # Example
///
/// ```
/// use gitviz::core::types::ObjectId;
///
/// // Normalized to lowercase
/// let id = ObjectId::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(id.as_str(), "abc123def4567890abc123def4567890abc12345");
///
/// // Abbreviated form for labels and tooltips
/// assert_eq!(id.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// The zero id (40 zeros for SHA-1).
    const ZERO_SHA1: &'static str = "0000000000000000000000000000000000000000";

    /// Create a new validated object id.
    ///
    /// The id is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidObjectId` if the string is not 40 or 64
    /// hex characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into().to_ascii_lowercase();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Create the zero/null id (40 zeros).
    ///
    /// git uses this to mark an absent side of a diff (pure addition or
    /// deletion).
    pub fn zero() -> Self {
        Self(Self::ZERO_SHA1.to_string())
    }

    /// Check if this is the zero/null id.
    pub fn is_zero(&self) -> bool {
        self.0.chars().all(|c| c == '0')
    }

    /// Get an abbreviated form of the id.
    ///
    /// Returns the first `len` characters. If `len` exceeds the id length,
    /// returns the full id.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Validate an object id.
    fn validate(id: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if id.len() != 40 && id.len() != 64 {
            return Err(TypeError::InvalidObjectId(format!(
                "expected 40 or 64 hex characters, got {}",
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidObjectId(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stable hash over repository state for change detection.
///
/// Watch mode polls this between synchronization passes: a pass only runs
/// when the fingerprint moves. The inputs cover everything the graph
/// renders: refs, the raw HEAD target, staged index entries, and the
/// object count (which catches orphan-only changes that move no ref).
///
/// # Example
///
/// ```
/// use gitviz::core::types::{Fingerprint, ObjectId};
///
/// let id = ObjectId::new("abc123def4567890abc123def4567890abc12345").unwrap();
/// let refs = vec![("refs/heads/main".to_string(), id)];
///
/// let fp = Fingerprint::compute(&refs, "refs/heads/main", &[], 3);
/// let fp2 = Fingerprint::compute(&refs, "refs/heads/main", &[], 3);
/// assert_eq!(fp, fp2);
///
/// // A different object count is a different fingerprint
/// let fp3 = Fingerprint::compute(&refs, "refs/heads/main", &[], 4);
/// assert_ne!(fp, fp3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute a fingerprint over repository state.
    ///
    /// `refs` and `index_entries` are sorted before hashing to ensure
    /// determinism regardless of input order.
    pub fn compute(
        refs: &[(String, ObjectId)],
        head_target: &str,
        index_entries: &[(String, ObjectId)],
        object_count: usize,
    ) -> Self {
        let mut sorted_refs: Vec<_> = refs.iter().collect();
        sorted_refs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut sorted_index: Vec<_> = index_entries.iter().collect();
        sorted_index.sort_by(|a, b| a.0.cmp(&b.0));

        let mut hasher = Sha256::new();
        for (refname, id) in sorted_refs {
            hasher.update(refname.as_bytes());
            hasher.update(b"\0");
            hasher.update(id.as_str().as_bytes());
            hasher.update(b"\n");
        }
        hasher.update(b"HEAD\0");
        hasher.update(head_target.as_bytes());
        hasher.update(b"\n");
        for (path, id) in sorted_index {
            hasher.update(path.as_bytes());
            hasher.update(b"\0");
            hasher.update(id.as_str().as_bytes());
            hasher.update(b"\n");
        }
        hasher.update(object_count.to_le_bytes());

        let result = hasher.finalize();
        Self(hex::encode(result))
    }

    /// Get the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
