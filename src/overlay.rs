//! Drawing placements onto images.
//!
//! The positioning math never clamps to the viewport, so everything here
//! tolerates rectangles that are partly or entirely outside the image.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::face_landmarks::{FaceLandmarks, LandmarkEstimator};
use crate::frame_placement::{FramePlacement, FramePositioner};

pub const GREEN: Rgba<u8> = Rgba([0u8, 255u8, 0u8, 255u8]);

// outlines larger than this are skipped
const MAX_OUTLINE_SIDE: f64 = u16::MAX as f64;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Draw the placement rectangle and the landmarks on top of the frame.
    pub debug: bool,
    pub debug_color: Rgba<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            debug: false,
            debug_color: GREEN,
        }
    }
}

/// Width / height of a frame asset.
pub fn asset_aspect_ratio(frame_asset: &DynamicImage) -> f64 {
    frame_asset.width() as f64 / frame_asset.height() as f64
}

// rounded (x, y, width, height), None if degenerate or too large to draw
fn pixel_rect(placement: &FramePlacement) -> Option<(i64, i64, u32, u32)> {
    let w = placement.width.round();
    let h = placement.height.round();
    let x = placement.x.round();
    let y = placement.y.round();

    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    if !(1.0..=MAX_OUTLINE_SIDE).contains(&w) || !(1.0..=MAX_OUTLINE_SIDE).contains(&h) {
        return None;
    }

    Some((x as i64, y as i64, w as u32, h as u32))
}

pub fn draw_placement(image: &mut RgbaImage, placement: &FramePlacement, color: Rgba<u8>) {
    if placement.clamp_to(image.width(), image.height()).is_none() {
        return;
    }
    let Some((x, y, w, h)) = pixel_rect(placement) else {
        tracing::debug!(?placement, "placement not drawable");
        return;
    };

    // imageproc computes the right/bottom edges in i32
    let (right, bottom) = (x + w as i64, y + h as i64);
    let range = i32::MIN as i64..=i32::MAX as i64;
    if ![x, y, right, bottom].iter().all(|v| range.contains(v)) {
        tracing::debug!(?placement, "placement outside drawable range");
        return;
    }

    let rect = Rect::at(x as i32, y as i32).of_size(w, h);
    draw_hollow_rect_mut(image, rect, color);
}

pub fn draw_landmarks(image: &mut RgbaImage, landmarks: &FaceLandmarks, color: Rgba<u8>) {
    for landmark in landmarks.points().iter() {
        if !(landmark.x.is_finite() && landmark.y.is_finite()) {
            continue;
        }
        draw_cross_mut(image, color, landmark.x.round() as i32, landmark.y.round() as i32);
    }
}

/// Alpha-blends `frame_asset`, stretched to the placement, onto `image`.
///
/// Only the part of the placement inside the image is resampled, so the
/// cost is bounded by the image size however large the placement is.
/// Returns false when nothing was drawn.
pub fn composite_frame(
    image: &mut RgbaImage,
    frame_asset: &RgbaImage,
    placement: &FramePlacement,
) -> bool {
    let Some((vx, vy, vw, vh)) = placement.clamp_to(image.width(), image.height()) else {
        tracing::debug!(?placement, "placement outside image");
        return false;
    };
    if !(placement.width > 0.0 && placement.height > 0.0)
        || frame_asset.width() == 0
        || frame_asset.height() == 0
    {
        tracing::debug!(?placement, "placement not drawable");
        return false;
    }

    // visible rectangle mapped back into asset pixels
    let (aw, ah) = (frame_asset.width() as f64, frame_asset.height() as f64);
    let (sx, sy) = (aw / placement.width, ah / placement.height);

    let x0 = ((vx as f64 - placement.x) * sx).floor().clamp(0.0, aw - 1.0);
    let y0 = ((vy as f64 - placement.y) * sy).floor().clamp(0.0, ah - 1.0);
    let x1 = (((vx + vw) as f64 - placement.x) * sx).ceil().clamp(x0 + 1.0, aw);
    let y1 = (((vy + vh) as f64 - placement.y) * sy).ceil().clamp(y0 + 1.0, ah);

    let visible = imageops::crop_imm(
        frame_asset,
        x0 as u32,
        y0 as u32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    )
    .to_image();

    let resized = imageops::resize(&visible, vw, vh, FilterType::Triangle);
    imageops::overlay(image, &resized, vx as i64, vy as i64);

    true
}

/// Positions `frame_asset` on `photo` and returns the composited image
/// together with the placement used.
pub fn render_try_on<E: LandmarkEstimator>(
    photo: &DynamicImage,
    frame_asset: &DynamicImage,
    positioner: &FramePositioner<E>,
    options: &RenderOptions,
) -> (RgbaImage, FramePlacement) {
    let mut canvas = photo.to_rgba8();
    let (width, height) = (canvas.width() as f64, canvas.height() as f64);

    let landmarks = positioner.landmarks(width, height);
    let placement = positioner.place_landmarks(&landmarks);

    let drawn = composite_frame(&mut canvas, &frame_asset.to_rgba8(), &placement);
    tracing::info!(
        width,
        height,
        x = placement.x,
        y = placement.y,
        frame_width = placement.width,
        frame_height = placement.height,
        drawn,
        "rendered try-on"
    );

    if options.debug {
        draw_placement(&mut canvas, &placement, options.debug_color);
        draw_landmarks(&mut canvas, &landmarks, options.debug_color);
    }

    (canvas, placement)
}
