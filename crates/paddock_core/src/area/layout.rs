//! Perimeter layout of fence segments around an anchor.
//!
//! Every segment is one unit long. Top and bottom rows run along X, left and
//! right columns run along Z and are turned a quarter around +Y. Centers are
//! inset by half a unit so the segments tile edge to edge for any parity of
//! width or depth.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

/// Segments per grid cell entered in the UI.
///
/// Nothing in the prototype explains the value. It reads as the number of one
/// unit fence segments that make up a single grid cell.
pub const MULTIPLIER: u32 = 3;

/// Size of a perimeter in segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct Dimensions {
    pub width: u32,
    pub depth: u32,
}

impl Dimensions {
    pub fn new(width: u32, depth: u32) -> Self {
        Self { width, depth }
    }

    /// Scale grid cells up into segment counts, saturating at `u32::MAX`.
    pub fn from_cells(cells: GridCells, multiplier: u32) -> Self {
        Self {
            width: cells.width.saturating_mul(multiplier),
            depth: cells.depth.saturating_mul(multiplier),
        }
    }

    pub fn segment_count(&self) -> usize {
        2 * self.width as usize + 2 * self.depth as usize
    }

    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    pub fn depth_f32(&self) -> f32 {
        self.depth as f32
    }
}

/// Sanitized user input in grid cells, before the multiplier is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct GridCells {
    pub width: u32,
    pub depth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Rotation of a segment about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Yaw {
    /// Segment runs along X.
    Zero,
    /// Segment runs along Z.
    Quarter,
}

impl Yaw {
    pub fn degrees(self) -> f32 {
        match self {
            Yaw::Zero => 0.0,
            Yaw::Quarter => 90.0,
        }
    }

    pub fn rotation(self) -> Quat {
        match self {
            Yaw::Zero => Quat::IDENTITY,
            Yaw::Quarter => Quat::from_rotation_y(FRAC_PI_2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct SegmentPlacement {
    /// Position relative to the anchor.
    pub translation: Vec3,
    pub yaw: Yaw,
    pub side: Side,
    /// Position along its side, starting from the negative end.
    pub index: u32,
}

impl SegmentPlacement {
    pub fn local_transform(&self) -> Transform {
        Transform { translation: self.translation, rotation: self.yaw.rotation(), ..default() }
    }
}

/// Ordered placements for one perimeter: top, bottom, left, right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerimeterLayout {
    pub segments: Vec<SegmentPlacement>,
}

impl PerimeterLayout {
    pub fn generate(dimensions: Dimensions) -> Self {
        let Dimensions { width, depth } = dimensions;
        let half_width = width as f32 / 2.0;
        let half_depth = depth as f32 / 2.0;

        let mut segments = Vec::with_capacity(dimensions.segment_count());

        for (side, z) in [(Side::Top, half_depth), (Side::Bottom, -half_depth)] {
            for index in 0..width {
                segments.push(SegmentPlacement {
                    translation: Vec3::new(inset(width, index), 0.0, z),
                    yaw: Yaw::Zero,
                    side,
                    index,
                });
            }
        }

        for (side, x) in [(Side::Left, -half_width), (Side::Right, half_width)] {
            for index in 0..depth {
                segments.push(SegmentPlacement {
                    translation: Vec3::new(x, 0.0, inset(depth, index)),
                    yaw: Yaw::Quarter,
                    side,
                    index,
                });
            }
        }

        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = &SegmentPlacement> {
        self.segments.iter().filter(move |segment| segment.side == side)
    }
}

pub fn generate_layout(width: u32, depth: u32) -> PerimeterLayout {
    PerimeterLayout::generate(Dimensions::new(width, depth))
}

/// Center of the `index`th unit segment on a side of length `size`.
#[inline]
fn inset(size: u32, index: u32) -> f32 {
    -(size as f32) / 2.0 + 0.5 + index as f32
}
