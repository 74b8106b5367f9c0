//! Data structures for the Americano organizer: players, matches, sessions.

mod game;
mod player;
mod session;

pub use game::{Match, MatchId, MatchScore, Side};
pub use player::Player;
pub use session::{Session, SessionError, SessionId};
