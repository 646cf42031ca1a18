//! Geometric image transformations.
//!
//! This module provides the swirl (twirl) distortion: every output pixel is
//! rotated around a center by an angle that decays with the distance to the
//! center, and the source is resampled at the rotated position.
//!
//! # Examples
//!
//! Swirling a single channel image around its center:
//!
//! ```
//! use swirl_image::{Image, ImageSize};
//! use swirl_imgproc::warp::{twist, SwirlParams};
//!
//! let image = Image::<f32, 1>::from_size_val(ImageSize { width: 32, height: 32 }, 0.5).unwrap();
//! let params = SwirlParams::new(5.0, 12.0).with_decay_scale(0.9);
//!
//! let swirled = twist(&image, &params).unwrap();
//! assert_eq!(swirled.size(), image.size());
//! ```

mod swirl;

pub use swirl::{generate_swirl_map, swirl, swirl_point, twist, SwirlParams};
