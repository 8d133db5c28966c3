// Re-export glam for convenience
pub use glam::*;

// Point cloud math types
mod bounds;
mod transform;
pub use bounds::Bounds;
pub use transform::{apply, euler_degrees_to_quat, trs};
