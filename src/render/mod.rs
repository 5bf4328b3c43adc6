pub mod canvas;
pub mod surface;

pub use canvas::CanvasSurface;
pub use surface::{DrawCommand, DrawSurface, RecordingSurface};
