//! Silent reauthentication for the Babel client.
//!
//! The auth service hands out an access-token expiry (`access_exp`) and a
//! `leeway` on login. [`ReauthLoop`] watches those values and calls
//! `GET /reissue` before the token lapses, so a long-running session never
//! has to log in again while its refresh cookie is valid.
//!
//! ```text
//!            expiry close             2xx: store exp + leeway
//!   Idle ─────────────────▶ Reauthenticating ─────────────────▶ Idle
//!                                  │
//!                                  │ 401: notify
//!                                  ▼
//!                               Stopped
//! ```
//!
//! Time is injectable: [`Clock`] supplies "now" for the expiry decision and
//! tokio's timer drives the interval.

pub mod clock;
pub mod error;
pub mod grant;
pub mod notifier;
pub mod scheduler;
pub mod threshold;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ReauthError, ReauthResult};
pub use grant::{ExpiryGrant, parse_access_exp, parse_leeway};
pub use notifier::{LogNotifier, Notifier, SESSION_INVALID_NOTICE};
pub use scheduler::{
    REISSUE_PATH, ReauthConfig, ReauthHandle, ReauthLoop, ReauthLoopBuilder, ReauthState,
    TickOutcome,
};
pub use threshold::ReauthThreshold;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::error::{ReauthError, ReauthResult};
    pub use crate::notifier::Notifier;
    pub use crate::scheduler::{ReauthConfig, ReauthHandle, ReauthLoop, ReauthState, TickOutcome};
    pub use crate::threshold::ReauthThreshold;
}
