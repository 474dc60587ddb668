//! Views: pipeline stages wired together for one kind of visual
//!
//! Every view follows the same lifecycle. `mount` registers scheduler
//! callbacks and viewport listeners, `handle` reacts to the ones that
//! fired, `tick` advances smoothing, `compute` maps the smoothed value onto
//! the items, and `unmount` releases everything that `mount` registered.

pub mod autoplay;
pub mod cards;
pub mod carousel;
pub mod counter;
pub mod keyhole;
pub mod layers;
pub mod loader;
pub mod timeline;

pub use autoplay::AutoAdvance;
pub use cards::{CardBoard, CardTransform};
pub use carousel::{CarouselFrame, CarouselItem, HorizontalScroll, Measurement};
pub use counter::{format_count, visible_fraction, Counter};
pub use keyhole::{arrow_float, HoleRect, KeyholeFrame, KeyholeReveal};
pub use layers::{total_layers, wrap, LayerFrame, LayerScroller, LayerTransform, SceneTransform};
pub use loader::{LoaderFrame, PageLoader, LOADER_HOLD};
pub use timeline::{EntryTransform, Timeline, TimelineFrame, TimelineLayout};
