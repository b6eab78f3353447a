//! Fit an orthographic camera around a perimeter.

use bevy::camera::ScalingMode;
use bevy::prelude::*;
use thiserror::Error;

use super::layout::Dimensions;

/// Default extent of the view relative to the perimeter, 20% extra.
pub const FRAME_MARGIN: f32 = 1.2;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FramingError {
    #[error("camera projection is not orthographic, use an orthographic camera for the region view")]
    NotOrthographic,
    #[error("viewport aspect ratio {0} cannot frame anything")]
    DegenerateViewport(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CameraFrame {
    /// Half of the vertical extent of the view, in world units.
    pub half_height: f32,
    pub center: Vec3,
}

impl CameraFrame {
    /// `anchor` supplies the horizontal center, `camera_height` is kept as is.
    pub fn fit(
        dimensions: Dimensions,
        aspect: f32,
        anchor: Vec3,
        camera_height: f32,
        margin: f32,
    ) -> Result<Self, FramingError> {
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(FramingError::DegenerateViewport(aspect));
        }

        let half_margin = margin / 2.0;
        let from_width = dimensions.width_f32() * half_margin / aspect;
        let from_depth = dimensions.depth_f32() * half_margin;

        Ok(Self {
            half_height: from_width.max(from_depth),
            center: Vec3::new(anchor.x, camera_height, anchor.z),
        })
    }
}

/// Apply `frame` to an orthographic camera. Nothing changes on error.
pub fn frame_camera(
    projection: &mut Projection,
    transform: &mut Transform,
    frame: &CameraFrame,
) -> Result<(), FramingError> {
    let Projection::Orthographic(orthographic) = projection else {
        return Err(FramingError::NotOrthographic);
    };

    orthographic.scale = 1.0;
    orthographic.scaling_mode = ScalingMode::FixedVertical { viewport_height: frame.half_height * 2.0 };
    transform.translation = frame.center;

    Ok(())
}

/// Width over height, `None` for a collapsed window.
pub fn viewport_aspect(window: &Window) -> Option<f32> {
    let (width, height) = (window.width(), window.height());
    if height <= 0.0 { None } else { Some(width / height) }
}
