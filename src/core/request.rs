//! The unit of work flowing from admission to the worker pool.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sequence number assigned at admission.
pub type Sequence = u64;

/// Size of the requested resource, resolved once at admission.
///
/// `Missing` orders before every byte count, so under smallest-first
/// scheduling requests for absent files are picked up first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ResourceSize {
    /// Resource is absent or not a regular file.
    Missing,
    /// Regular file of the given length in bytes.
    Bytes(u64),
}

impl ResourceSize {
    /// Raw sentinel used on the wire and in logs for `Missing`.
    pub const MISSING_RAW: i64 = -1;

    /// Build from a raw size where any negative value means missing.
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        u64::try_from(raw).map_or(Self::Missing, Self::Bytes)
    }

    /// Raw representation, `-1` for `Missing`.
    #[must_use]
    pub fn as_raw(self) -> i64 {
        match self {
            Self::Missing => Self::MISSING_RAW,
            Self::Bytes(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }

    /// Whether the resource resolved to a regular file.
    #[must_use]
    pub const fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Byte length if present.
    #[must_use]
    pub const fn bytes(self) -> Option<u64> {
        match self {
            Self::Missing => None,
            Self::Bytes(n) => Some(n),
        }
    }
}

impl From<i64> for ResourceSize {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<ResourceSize> for i64 {
    fn from(size: ResourceSize) -> Self {
        size.as_raw()
    }
}

impl fmt::Display for ResourceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_raw())
    }
}

/// One admitted connection.
///
/// Built only by [`Sequencer`](crate::core::Sequencer) so that every request
/// carries a unique, strictly increasing sequence. After construction nothing
/// mutates it; the connection handle moves out with [`Request::into_connection`].
pub struct Request<C> {
    sequence: Sequence,
    arrival_time: DateTime<Utc>,
    path: String,
    size: ResourceSize,
    connection: C,
}

impl<C> Request<C> {
    pub(crate) const fn new(
        sequence: Sequence,
        arrival_time: DateTime<Utc>,
        path: String,
        size: ResourceSize,
        connection: C,
    ) -> Self {
        Self {
            sequence,
            arrival_time,
            path,
            size,
            connection,
        }
    }

    /// Admission sequence number.
    #[must_use]
    pub const fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Wall-clock admission time.
    #[must_use]
    pub const fn arrival_time(&self) -> DateTime<Utc> {
        self.arrival_time
    }

    /// Requested path as parsed; empty on a parse failure.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolved resource size.
    #[must_use]
    pub const fn size(&self) -> ResourceSize {
        self.size
    }

    /// Borrow the connection handle.
    #[must_use]
    pub const fn connection(&self) -> &C {
        &self.connection
    }

    /// Take ownership of the connection handle.
    pub fn into_connection(self) -> C {
        self.connection
    }

    /// Scheduling key for smallest-first: size, then sequence.
    pub(crate) const fn size_key(&self) -> (ResourceSize, Sequence) {
        (self.size, self.sequence)
    }
}

impl<C> fmt::Debug for Request<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("sequence", &self.sequence)
            .field("arrival_time", &self.arrival_time)
            .field("path", &self.path)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
