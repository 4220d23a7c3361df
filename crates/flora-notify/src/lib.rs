//! # flora-notify
//!
//! Notification and reward side effects for Flora.
//!
//! Lifecycle operations never call out to email or gamification services
//! directly. They collect [`SideEffect`] values while their transaction runs
//! and hand them to [`run_effects`] after commit. A failing [`Dispatcher`]
//! call is logged and skipped; it can never undo a committed transition.

mod dispatcher;
mod effect;
mod error;
mod interpreter;
mod memory;

pub use dispatcher::{Dispatcher, TracingDispatcher};
pub use effect::SideEffect;
pub use error::DispatchError;
pub use interpreter::{DispatchReport, run_effects};
pub use memory::{FailingDispatcher, RecordingDispatcher};
