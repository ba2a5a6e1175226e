//! Eyewear virtual try-on positioning.
//!
//! A landmark estimator produces a handful of facial points for a camera
//! frame, and the frame placement step turns those points into the rectangle
//! an eyewear overlay should be drawn at. The bundled estimator is a fixed
//! geometric stand-in for a face mesh model; swap it through
//! [`face_landmarks::LandmarkEstimator`].

pub mod config;
pub mod error;
pub mod face_landmarks;
pub mod frame_placement;
pub mod overlay;
pub mod utils;

pub use error::{Error, Result};
pub use face_landmarks::model_synthetic::{estimate_face_position, SyntheticLandmarkEstimator};
pub use face_landmarks::{FaceLandmarks, LandmarkEstimator};
pub use frame_placement::{
    calculate_frame_position, FramePlacement, FramePositioner, Viewport, DEFAULT_SCALE,
};
pub use utils::PlacementSmoother;
