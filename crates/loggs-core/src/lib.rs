pub mod config;
pub mod content;
pub mod error;
pub mod motion;
pub mod runtime;
pub mod views;

pub use config::{AppConfig, Page};
pub use content::{Catalog, VisualItemSource};
pub use error::{Error, Result};
pub use motion::EasingType;
pub use runtime::{FrameScheduler, Viewport};
