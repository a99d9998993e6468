pub mod constants;
pub mod error;
pub mod frame;
pub mod math;
pub mod settings;
pub mod types;

pub use error::TerravoxError;
pub use frame::FrameBuffer;
pub use settings::{GpuSettings, Settings};
pub use types::{BiomeWeights, Camera, HitInfo};
