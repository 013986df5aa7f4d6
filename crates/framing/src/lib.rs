//! Camera framing for the globe widget.
//!
//! Given a set of geographic points, [`compute_framing`] picks a spherical
//! centroid and a "wide" altitude that keeps every point in view.
//! [`altitude_at`] then maps a scroll progress in `[0, 1]` onto the range
//! between that wide altitude and a closer one, and [`CameraRig`] applies the
//! results to a renderer through [`CameraSink`].

pub mod camera;
pub mod config;
pub mod fit;
pub mod zoom;

pub use camera::*;
pub use config::*;
pub use fit::*;
pub use zoom::*;
