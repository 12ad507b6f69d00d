#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use rowblur_image as image;

#[doc(inline)]
pub use rowblur_imgproc as imgproc;

#[doc(inline)]
pub use rowblur_io as io;
