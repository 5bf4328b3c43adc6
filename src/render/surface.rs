use crate::math::Vec2;
use crate::particles::Rgba;

/// Minimal 2D drawing target the engine renders into
///
/// The browser implementation wraps a canvas; [`RecordingSurface`] keeps a
/// log of commands for headless runs and tests.
pub trait DrawSurface {
    /// Current viewport size in CSS pixels, if one can be determined
    fn viewport_size(&self) -> Option<(f64, f64)>;

    /// Resize the backing pixel buffer
    fn set_size(&mut self, width: f64, height: f64);

    fn set_visible(&mut self, visible: bool);

    /// Erase every pixel
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Rgba);

    /// Stroke a connected line through `points`
    fn stroke_polyline(&mut self, points: &[Vec2], width: f64, color: Rgba);
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle { center: Vec2, radius: f64, color: Rgba },
    Polyline { points: Vec<Vec2>, width: f64, color: Rgba },
}

/// Headless surface that records what would have been drawn
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    viewport: Option<(f64, f64)>,
    width: f64,
    height: f64,
    visible: bool,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Some((width, height)),
            width: 0.0,
            height: 0.0,
            visible: false,
            commands: Vec::new(),
        }
    }

    /// A surface whose viewport cannot be measured
    pub fn detached() -> Self {
        Self {
            viewport: None,
            ..Self::new(0.0, 0.0)
        }
    }

    /// Change what the next `viewport_size` call reports
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Some((width, height));
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Commands since the last clear
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn polyline_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polyline { .. }))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn viewport_size(&self) -> Option<(f64, f64)> {
        self.viewport
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn clear(&mut self) {
        // Earlier commands are gone from the canvas too, so drop them
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], width: f64, color: Rgba) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            width,
            color,
        });
    }
}
