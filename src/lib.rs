mod axis;
mod error;
mod fft3d;
mod kernel;
mod partition;
mod plan;
mod symmetry;

pub use error::TransformError;
pub use fft3d::Fft3d;
