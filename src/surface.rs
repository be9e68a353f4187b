//! Drawing surfaces consumed by the layers.
//!
//! Layers only ever talk to a [`Surface`]: a 2D vector context with a
//! transform stack, paths, fills and strokes. The browser implementation
//! lives in [`crate::web`]; [`RecordingSurface`] keeps a command log so the
//! whole component runs headless.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::camera::{Point, ZoomTransform};
use crate::error::MapError;

/// A 2D vector drawing context.
pub trait Surface {
    /// Match the backing store to the widget size.
    fn resize(&mut self, width: f64, height: f64);
    /// Clear the whole surface, ignoring the current transform.
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    /// Replace the current transform with the zoom transform.
    fn set_transform(&mut self, transform: &ZoomTransform);
    fn set_alpha(&mut self, alpha: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn close_path(&mut self);
    /// Add a full circle to the current path.
    fn arc(&mut self, center: Point, radius: f64);
    fn fill(&mut self, color: &str);
    fn stroke(&mut self, color: &str, width: f64);
}

/// Creates one surface per layer.
pub trait SurfaceFactory {
    /// # Errors
    ///
    /// Returns [`MapError::SurfaceUnavailable`] when the host cannot provide a surface.
    fn create(&mut self, name: &str) -> Result<Box<dyn Surface>, MapError>;
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize { width: f64, height: f64 },
    Clear,
    Save,
    Restore,
    SetTransform(ZoomTransform),
    SetAlpha(f64),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    ClosePath,
    Arc { center: Point, radius: f64 },
    Fill(String),
    Stroke { color: String, width: f64 },
}

/// Shared view of a recording surface's command log.
pub type CommandLog = Rc<RefCell<Vec<DrawCommand>>>;

/// Headless surface that records every call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    log: CommandLog,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the log; stays valid after the surface moves into a layer.
    #[must_use]
    pub fn log(&self) -> CommandLog {
        Rc::clone(&self.log)
    }

    fn push(&self, cmd: DrawCommand) {
        self.log.borrow_mut().push(cmd);
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.push(DrawCommand::Resize { width, height });
    }

    fn clear(&mut self) {
        // Cleared pixels are gone; keep only what is drawn from here on.
        self.log.borrow_mut().clear();
        self.push(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn set_transform(&mut self, transform: &ZoomTransform) {
        self.push(DrawCommand::SetTransform(*transform));
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.push(DrawCommand::SetAlpha(alpha));
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, p: Point) {
        self.push(DrawCommand::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.push(DrawCommand::LineTo(p));
    }

    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }

    fn arc(&mut self, center: Point, radius: f64) {
        self.push(DrawCommand::Arc { center, radius });
    }

    fn fill(&mut self, color: &str) {
        self.push(DrawCommand::Fill(color.to_owned()));
    }

    fn stroke(&mut self, color: &str, width: f64) {
        self.push(DrawCommand::Stroke { color: color.to_owned(), width });
    }
}

/// Factory producing [`RecordingSurface`]s, keyed by layer name.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    logs: BTreeMap<String, CommandLog>,
    unavailable: bool,
}

impl RecordingFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose every `create` fails, standing in for a host without a canvas.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { logs: BTreeMap::new(), unavailable: true }
    }

    /// Command log of the surface created for `name`, if any.
    #[must_use]
    pub fn log(&self, name: &str) -> Option<CommandLog> {
        self.logs.get(name).map(Rc::clone)
    }

    /// Shared handle so tests can keep inspecting after the factory moves into the map.
    #[must_use]
    pub fn shared() -> (Rc<RefCell<Self>>, SharedFactory) {
        let inner = Rc::new(RefCell::new(Self::new()));
        (Rc::clone(&inner), SharedFactory(inner))
    }
}

impl SurfaceFactory for RecordingFactory {
    fn create(&mut self, name: &str) -> Result<Box<dyn Surface>, MapError> {
        if self.unavailable {
            return Err(MapError::SurfaceUnavailable(format!("no surface for {name}")));
        }
        let surface = RecordingSurface::new();
        self.logs.insert(name.to_owned(), surface.log());
        Ok(Box::new(surface))
    }
}

/// [`SurfaceFactory`] forwarding to a shared [`RecordingFactory`].
#[derive(Debug)]
pub struct SharedFactory(Rc<RefCell<RecordingFactory>>);

impl SurfaceFactory for SharedFactory {
    fn create(&mut self, name: &str) -> Result<Box<dyn Surface>, MapError> {
        self.0.borrow_mut().create(name)
    }
}

/// Create a surface for `name`, degrading to `None` (inert layer) when the host has none.
pub fn create_or_inert(factory: &mut dyn SurfaceFactory, name: &str) -> Option<Box<dyn Surface>> {
    match factory.create(name) {
        Ok(surface) => Some(surface),
        Err(e) => {
            tracing::warn!(layer = name, error = %e, "drawing surface unavailable; layer is inert");
            None
        }
    }
}
