use nalgebra::Point2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::face_landmarks::model_synthetic::SyntheticLandmarkEstimator;
use crate::face_landmarks::{FaceLandmarks, LandmarkEstimator};

/// Frame width as a multiple of the face width, before scaling.
pub const FRAME_WIDTH_RATIO: f64 = 1.2;
/// Fraction of the frame height placed above the eye line.
pub const FRAME_VERTICAL_OFFSET_RATIO: f64 = 0.6;
pub const DEFAULT_SCALE: f64 = 1.0;

/// Rectangle an eyewear overlay is drawn at, in viewport pixel space.
///
/// `x`/`y` is the top-left corner and is not clamped: it can be negative or
/// extend past the viewport when the face sits near an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramePlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FramePlacement {
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Integer pixel rectangle `(x, y, width, height)` of the part of this
    /// placement that lies inside a `viewport_width` x `viewport_height`
    /// image. `None` when nothing is visible or the placement is not finite.
    pub fn clamp_to(&self, viewport_width: u32, viewport_height: u32) -> Option<(u32, u32, u32, u32)> {
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return None;
        }

        let x_min = self.x.floor().max(0.0);
        let y_min = self.y.floor().max(0.0);
        let x_max = (self.x + self.width).ceil().min(viewport_width as f64);
        let y_max = (self.y + self.height).ceil().min(viewport_height as f64);

        if x_max <= x_min || y_max <= y_min {
            return None;
        }

        Some((
            x_min as u32,
            y_min as u32,
            (x_max - x_min) as u32,
            (y_max - y_min) as u32,
        ))
    }
}

/// Places a frame of the given aspect ratio (width / height) on a face.
///
/// The frame is `1.2 * face_width * scale` wide, centered horizontally on
/// the eye midpoint, with 60% of its height above the eye line. Inputs are
/// not validated: a zero or negative aspect ratio yields infinite or
/// negative dimensions.
pub fn calculate_frame_position(
    landmarks: &FaceLandmarks,
    frame_aspect_ratio: f64,
    scale: f64,
) -> FramePlacement {
    let eye_center = landmarks.eye_center();

    let frame_width = landmarks.face_width * FRAME_WIDTH_RATIO * scale;
    let frame_height = frame_width / frame_aspect_ratio;

    FramePlacement {
        x: eye_center.x - frame_width / 2.0,
        y: eye_center.y - frame_height * FRAME_VERTICAL_OFFSET_RATIO,
        width: frame_width,
        height: frame_height,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// estimator + frame settings, so callers only pass the frame size
#[derive(Debug, Clone)]
pub struct FramePositioner<E = SyntheticLandmarkEstimator> {
    estimator: E,
    aspect_ratio: f64,
    scale: f64,
}

impl FramePositioner<SyntheticLandmarkEstimator> {
    pub fn new(aspect_ratio: f64) -> Self {
        Self::with_estimator(SyntheticLandmarkEstimator, aspect_ratio)
    }
}

impl<E: LandmarkEstimator> FramePositioner<E> {
    pub fn with_estimator(estimator: E, aspect_ratio: f64) -> Self {
        Self {
            estimator,
            aspect_ratio,
            scale: DEFAULT_SCALE,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn landmarks(&self, viewport_width: f64, viewport_height: f64) -> FaceLandmarks {
        self.estimator.estimate(viewport_width, viewport_height)
    }

    pub fn place_landmarks(&self, landmarks: &FaceLandmarks) -> FramePlacement {
        calculate_frame_position(landmarks, self.aspect_ratio, self.scale)
    }

    pub fn place(&self, viewport_width: f64, viewport_height: f64) -> FramePlacement {
        let landmarks = self.landmarks(viewport_width, viewport_height);
        let placement = self.place_landmarks(&landmarks);

        tracing::debug!(
            viewport_width,
            viewport_height,
            x = placement.x,
            y = placement.y,
            width = placement.width,
            height = placement.height,
            "placed frame"
        );

        placement
    }

    /// Places a frame for every viewport, in parallel. Results keep the
    /// input order.
    pub fn place_batch(&self, viewports: &[Viewport]) -> Vec<FramePlacement> {
        viewports
            .par_iter()
            .map(|v| self.place(v.width, v.height))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face_landmarks::model_synthetic::estimate_face_position;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn places_frame_on_1000x800_face() {
        let landmarks = estimate_face_position(1000.0, 800.0);
        let p = calculate_frame_position(&landmarks, 2.0, DEFAULT_SCALE);

        assert_close(p.width, 360.0);
        assert_close(p.height, 180.0);
        assert_close(p.x, 320.0);
        assert_close(p.y, 238.0);
    }

    #[test]
    fn frame_is_centered_on_eyes() {
        let landmarks = estimate_face_position(1280.0, 720.0);
        let p = calculate_frame_position(&landmarks, 1.5, 0.8);
        assert_close(p.center().x, landmarks.eye_center().x);
    }

    #[test]
    fn zero_aspect_ratio_is_not_guarded() {
        let landmarks = estimate_face_position(1000.0, 800.0);
        let p = calculate_frame_position(&landmarks, 0.0, 1.0);
        assert!(p.height.is_infinite());
    }

    #[test]
    fn positioner_composes_estimate_and_placement() {
        let positioner = FramePositioner::new(2.5).with_scale(1.3);
        let expected = calculate_frame_position(&estimate_face_position(640.0, 480.0), 2.5, 1.3);
        assert_eq!(positioner.place(640.0, 480.0), expected);
    }

    #[test]
    fn positioner_defaults_to_unit_scale() {
        let positioner = FramePositioner::new(2.0);
        assert_eq!(positioner.scale(), DEFAULT_SCALE);
    }

    #[test]
    fn batch_keeps_order() {
        let positioner = FramePositioner::new(2.0);
        let viewports: Vec<Viewport> = (1..=64)
            .map(|i| Viewport::new(100.0 * i as f64, 50.0 * i as f64))
            .collect();

        let batch = positioner.place_batch(&viewports);
        let sequential: Vec<FramePlacement> = viewports
            .iter()
            .map(|v| positioner.place(v.width, v.height))
            .collect();

        assert_eq!(batch, sequential);
    }

    #[test]
    fn clamp_inside_viewport() {
        let p = FramePlacement { x: 10.2, y: 20.7, width: 30.0, height: 10.0 };
        assert_eq!(p.clamp_to(100, 100), Some((10, 20, 31, 11)));
    }

    #[test]
    fn clamp_crops_edges() {
        let p = FramePlacement { x: -20.0, y: 90.0, width: 50.0, height: 30.0 };
        assert_eq!(p.clamp_to(100, 100), Some((0, 90, 30, 10)));
    }

    #[test]
    fn clamp_outside_viewport() {
        let p = FramePlacement { x: 200.0, y: 0.0, width: 50.0, height: 30.0 };
        assert_eq!(p.clamp_to(100, 100), None);

        let p = FramePlacement { x: 0.0, y: 0.0, width: f64::INFINITY, height: 30.0 };
        assert_eq!(p.clamp_to(100, 100), None);
    }
}
