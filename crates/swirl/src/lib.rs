#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use swirl_image as image;

#[doc(inline)]
pub use swirl_imgproc as imgproc;

#[doc(inline)]
pub use swirl_io as io;

#[doc(inline)]
pub use swirl_face as face;
