//! Player data structure.

use serde::{Deserialize, Serialize};

/// A player in an Americano session. The name is the identity: it is unique
/// within a session (case-insensitive) and is what matches refer to.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Number of matches this player appears in. Derived from the match list
    /// by the session after every generated round, never incremented ad hoc.
    #[serde(default)]
    pub games_played: u32,
}

impl Player {
    /// Create a new player with the given name and zero games played.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            games_played: 0,
        }
    }
}
