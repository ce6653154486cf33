// depth/ - Height map queries
//
// Depth images are sampled synchronously while building geometry.
// 0 = far, 255 = near.

mod decode;
mod sampler;

pub use decode::{ColorImage, decode_color, decode_depth};
pub use sampler::{DepthBuffer, sample};
