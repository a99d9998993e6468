pub mod biome;
pub mod field;
pub mod gradient;
pub mod noise;
pub mod sampler;
pub mod texture;

pub use biome::BiomeClassifier;
pub use field::ScalarField;
pub use gradient::GradientEstimator;
pub use sampler::{NoiseVolume, Texture2d, WorldTextures};
pub use texture::{GrayVolume, MipTexture};
