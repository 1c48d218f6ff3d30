#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use parallax_image as image;

#[doc(inline)]
pub use parallax_imgproc as imgproc;

#[doc(inline)]
pub use parallax_io as io;

#[doc(inline)]
pub use parallax_3d as p3d;

#[doc(inline)]
pub use parallax_depth as depth;

#[doc(inline)]
pub use parallax_render as render;
