//! Domain events - Notifications of state changes within the domain

pub mod change;

pub use change::{Change, ChangeCallback, ChangeKind, EntityRef, Notifier};
