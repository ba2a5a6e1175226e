pub mod model_synthetic;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

type Point = Point2<f64>;

// facial landmarks in viewport pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub left_eye: Point,
    pub right_eye: Point,
    pub nose: Point,
    pub mouth: Point,
    pub face_width: f64,
    pub face_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkPoint {
    LeftEye,
    RightEye,
    Nose,
    Mouth,
}

impl LandmarkPoint {
    pub const ALL: [LandmarkPoint; 4] = [
        LandmarkPoint::LeftEye,
        LandmarkPoint::RightEye,
        LandmarkPoint::Nose,
        LandmarkPoint::Mouth,
    ];
}

impl FaceLandmarks {
    pub fn get_point(&self, point: LandmarkPoint) -> Point {
        match point {
            LandmarkPoint::LeftEye => self.left_eye,
            LandmarkPoint::RightEye => self.right_eye,
            LandmarkPoint::Nose => self.nose,
            LandmarkPoint::Mouth => self.mouth,
        }
    }

    /// Midpoint between the two eyes. Frames are anchored here.
    pub fn eye_center(&self) -> Point {
        nalgebra::center(
            &self.get_point(LandmarkPoint::LeftEye),
            &self.get_point(LandmarkPoint::RightEye),
        )
    }

    pub fn points(&self) -> [Point; 4] {
        LandmarkPoint::ALL.map(|point| self.get_point(point))
    }
}

/// Source of face landmarks for a camera frame of a given size.
///
/// The synthetic estimator only looks at the frame dimensions. A detector
/// backed by a real model would take the pixels as well; it can implement
/// this trait by capturing the current frame and still hand
/// [`FaceLandmarks`] to the placement step unchanged.
pub trait LandmarkEstimator: Send + Sync {
    fn estimate(&self, viewport_width: f64, viewport_height: f64) -> FaceLandmarks;
}

impl<T: LandmarkEstimator + ?Sized> LandmarkEstimator for Box<T> {
    fn estimate(&self, viewport_width: f64, viewport_height: f64) -> FaceLandmarks {
        (**self).estimate(viewport_width, viewport_height)
    }
}
