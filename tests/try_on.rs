use frame_tryon::face_landmarks::model_synthetic::estimate_face_position;
use frame_tryon::overlay::{render_try_on, RenderOptions};
use frame_tryon::{
    FaceLandmarks, FramePlacement, FramePositioner, LandmarkEstimator, PlacementSmoother, Viewport,
};
use image::{DynamicImage, Rgba, RgbaImage};

/// Synthetic estimate shifted sideways, standing in for a detector that
/// found the face off-center.
struct ShiftedEstimator {
    dx: f64,
}

impl LandmarkEstimator for ShiftedEstimator {
    fn estimate(&self, viewport_width: f64, viewport_height: f64) -> FaceLandmarks {
        let mut l = estimate_face_position(viewport_width, viewport_height);
        for p in [&mut l.left_eye, &mut l.right_eye, &mut l.nose, &mut l.mouth] {
            p.x += self.dx;
        }
        l
    }
}

#[test]
fn concrete_placement_for_1000x800() {
    let p = FramePositioner::new(2.0).place(1000.0, 800.0);

    assert!((p.x - 320.0).abs() < 1e-9);
    assert!((p.y - 238.0).abs() < 1e-9);
    assert!((p.width - 360.0).abs() < 1e-9);
    assert!((p.height - 180.0).abs() < 1e-9);
}

#[test]
fn substituted_estimator_only_moves_the_frame() {
    let synthetic = FramePositioner::new(2.0).place(1000.0, 800.0);
    let shifted = FramePositioner::with_estimator(ShiftedEstimator { dx: 100.0 }, 2.0)
        .place(1000.0, 800.0);

    assert!((shifted.x - synthetic.x - 100.0).abs() < 1e-9);
    assert_eq!(shifted.y, synthetic.y);
    assert_eq!(shifted.width, synthetic.width);
    assert_eq!(shifted.height, synthetic.height);
}

#[test]
fn boxed_estimators_are_interchangeable() {
    let estimators: Vec<Box<dyn LandmarkEstimator>> = vec![
        Box::new(frame_tryon::SyntheticLandmarkEstimator),
        Box::new(ShiftedEstimator { dx: -50.0 }),
    ];

    let placements: Vec<FramePlacement> = estimators
        .into_iter()
        .map(|e| FramePositioner::with_estimator(e, 2.0).place(640.0, 480.0))
        .collect();

    assert!((placements[0].x - placements[1].x - 50.0).abs() < 1e-9);
}

#[test]
fn placement_can_leave_the_viewport() {
    let p = FramePositioner::with_estimator(ShiftedEstimator { dx: -400.0 }, 2.0).place(1000.0, 800.0);
    assert!(p.x < 0.0);
    assert_eq!(p.clamp_to(1000, 800), Some((0, 238, 280, 180)));
}

#[test]
fn smoothing_a_steady_feed_is_stable() {
    let positioner = FramePositioner::new(2.0);
    let frames = vec![Viewport::new(1280.0, 720.0); 10];

    let mut smoother = PlacementSmoother::new(4);
    let smoothed: Vec<FramePlacement> = positioner
        .place_batch(&frames)
        .into_iter()
        .map(|p| smoother.push(p))
        .collect();

    let expected = positioner.place(1280.0, 720.0);
    for p in smoothed {
        assert!((p.x - expected.x).abs() < 1e-9);
        assert!((p.aspect_ratio() - 2.0).abs() < 1e-9);
    }
}

#[test]
fn placement_serializes_as_plain_fields() {
    let p = FramePlacement { x: 320.0, y: 238.0, width: 360.0, height: 180.0 };
    let json = serde_json::to_value(p).unwrap();

    assert_eq!(json["x"], 320.0);
    assert_eq!(json["height"], 180.0);
    assert_eq!(serde_json::from_value::<FramePlacement>(json).unwrap(), p);
}

#[test]
fn renders_debug_overlay() {
    let photo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(320, 240, Rgba([0, 0, 0, 255])));
    let asset = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 10, Rgba([0, 0, 255, 255])));
    let positioner = FramePositioner::new(2.0);
    let options = RenderOptions { debug: true, ..RenderOptions::default() };

    let (canvas, placement) = render_try_on(&photo, &asset, &positioner, &options);

    // the outline is drawn on top of the frame
    let corner = canvas.get_pixel(placement.x.round() as u32, placement.y.round() as u32);
    assert_eq!(*corner, options.debug_color);
    assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
}
