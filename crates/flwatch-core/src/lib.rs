pub mod classify;
pub mod error;
pub mod extract;
pub mod fingerprint;
pub mod poll;
pub mod render;
pub mod session;
pub mod watch;
pub mod workspace;

pub mod prelude {
    pub use crate::classify::{UnreachableKind, Verdict, WatchState};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::poll::{PollOptions, poll_once};
    pub use crate::session::{AdminSession, SessionError, SessionResult, SessionTarget};
    pub use crate::watch::{WatchConfig, WatchExit, watch};
}
