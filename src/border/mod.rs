pub mod driver;
pub mod lut;
pub mod messages;
pub mod model;
pub mod occlusion;
pub mod overlay;
pub mod perf;
pub mod phase;
pub mod pool;
pub mod raster;
pub mod runtime;
pub mod segments;
pub mod snapshot;
pub mod state;
pub mod surface;

pub use driver::{FrameConfig, FrameDriver, FrameReport, TickOutcome};
pub use lut::{ColorLut, ColorMode, Rgb};
pub use messages::{request_channel, ExitReason, LoopHandle, LoopRequest};
pub use model::{Axis, BorderSegment, Edge, VisibleInterval, WindowRect};
pub use snapshot::{WindowSnapshot, WindowSource};
pub use surface::SegmentSurface;
