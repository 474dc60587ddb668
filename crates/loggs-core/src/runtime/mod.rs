//! Host-side runtime: the frame clock and the viewport
//!
//! Both are owned by the host loop and lent to views. A view registers
//! callbacks and listeners on mount and must release every one of them on
//! unmount.

pub mod scheduler;
pub mod viewport;

pub use scheduler::{Fired, FiredKind, FrameScheduler, TaskId};
pub use viewport::{ListenerId, Viewport, ViewportEvent, ViewportSize};
