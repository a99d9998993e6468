pub mod debug;
pub mod frame;
pub mod shading;
pub mod sky;
pub mod tracer;
pub mod triplanar;
pub mod water;

pub use debug::DebugView;
pub use frame::FrameAssembler;
pub use shading::Shader;
pub use tracer::{HybridTracer, TraceMode, TraceStep};
pub use water::{WaterCompositor, WaterSample};
