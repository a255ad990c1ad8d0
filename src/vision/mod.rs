pub mod tensor;
pub mod sampler;

pub use tensor::{decode_image, read_image, ImageTensor};
pub use sampler::{view_images, view_images_sized, ImageGrid, SampledImage};
