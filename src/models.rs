//! Record types moved through the pipeline.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's experience entry.
///
/// This is the unit of data the saver buffers and the flusher writes. It is a
/// small `Copy` value; `id` is its stable identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Experience {
    pub id: u64,
    pub user_id: u64,
    /// Experience category code
    #[serde(rename = "type")]
    pub kind: u64,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub level: u64,
}

impl Experience {
    pub fn new(
        id: u64,
        user_id: u64,
        kind: u64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        level: u64,
    ) -> Self {
        Experience {
            id,
            user_id,
            kind,
            from,
            to,
            level,
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Experience{{Id: {}, UserId: {}, Type: {}, From: {}, To: {}, Level: {}}}",
            self.id,
            self.user_id,
            self.kind,
            self.from.to_rfc3339(),
            self.to.to_rfc3339(),
            self.level
        )
    }
}
