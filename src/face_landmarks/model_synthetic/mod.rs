// Fixed-proportion landmark estimate centered in the viewport.
// Stands in for a face mesh model until a real detector is wired up.

use nalgebra::Point2;

use crate::face_landmarks::{FaceLandmarks, LandmarkEstimator};

/// Face width as a fraction of the viewport width.
pub const FACE_WIDTH_RATIO: f64 = 0.3;
/// Face height as a multiple of the face width.
pub const FACE_HEIGHT_RATIO: f64 = 1.2;
/// Horizontal eye offset from the center, as a fraction of the face width.
/// The same factor applied to the face height gives the vertical offset.
pub const EYE_OFFSET_RATIO: f64 = 0.15;
/// Mouth offset below the center, as a fraction of the face height.
pub const MOUTH_OFFSET_RATIO: f64 = 0.2;

pub fn estimate_face_position(viewport_width: f64, viewport_height: f64) -> FaceLandmarks {
    let center = Point2::new(viewport_width / 2.0, viewport_height / 2.0);

    let face_width = viewport_width * FACE_WIDTH_RATIO;
    let face_height = face_width * FACE_HEIGHT_RATIO;

    let eye_dx = face_width * EYE_OFFSET_RATIO;
    let eye_y = center.y - face_height * EYE_OFFSET_RATIO;

    let landmarks = FaceLandmarks {
        left_eye: Point2::new(center.x - eye_dx, eye_y),
        right_eye: Point2::new(center.x + eye_dx, eye_y),
        nose: center,
        mouth: Point2::new(center.x, center.y + face_height * MOUTH_OFFSET_RATIO),
        face_width,
        face_height,
    };

    tracing::trace!(viewport_width, viewport_height, face_width, "estimated face position");

    landmarks
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticLandmarkEstimator;

impl SyntheticLandmarkEstimator {
    pub fn new() -> Self {
        SyntheticLandmarkEstimator
    }
}

impl LandmarkEstimator for SyntheticLandmarkEstimator {
    fn estimate(&self, viewport_width: f64, viewport_height: f64) -> FaceLandmarks {
        estimate_face_position(viewport_width, viewport_height)
    }
}
