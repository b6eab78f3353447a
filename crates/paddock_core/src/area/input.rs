//! Text entered for the region size and its sanitizing.

use bevy::prelude::*;
use thiserror::Error;

use super::AreaSettings;
use super::layout::GridCells;

/// Raw text of the two size fields, as shown in the region panel.
#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct AreaInput {
    pub width_text: String,
    pub depth_text: String,
}

impl Default for AreaInput {
    fn default() -> Self {
        Self { width_text: "4".to_owned(), depth_text: "3".to_owned() }
    }
}

impl AreaInput {
    pub fn new(width: impl Into<String>, depth: impl Into<String>) -> Self {
        Self { width_text: width.into(), depth_text: depth.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Width,
    Depth,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Width => f.write_str("width"),
            Field::Depth => f.write_str("depth"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} is not a number: {text:?}")]
    NotANumber { field: Field, text: String },
    #[error("{field} must be finite: {text:?}")]
    NotFinite { field: Field, text: String },
}

/// Parse both fields, round them to whole cells and write the result back.
///
/// Fields are only rewritten when both parse.
pub fn validate_input(input: &mut AreaInput, settings: &AreaSettings) -> Result<GridCells, InputError> {
    let depth = parse_field(Field::Depth, &input.depth_text)?;
    let width = parse_field(Field::Width, &input.width_text)?;

    let (width_cells, width_clamped) = sanitize(width, settings.max_cells);
    let (depth_cells, depth_clamped) = sanitize(depth, settings.max_cells);
    for (field, clamped, text) in [
        (Field::Width, width_clamped, &input.width_text),
        (Field::Depth, depth_clamped, &input.depth_text),
    ] {
        if clamped {
            warn!("{field} {text:?} is over the limit of {} cells, using the limit", settings.max_cells);
        }
    }

    let cells = GridCells { width: width_cells, depth: depth_cells };

    input.depth_text = cells.depth.to_string();
    input.width_text = cells.width.to_string();

    Ok(cells)
}

fn parse_field(field: Field, text: &str) -> Result<f32, InputError> {
    let value: f32 = text
        .trim()
        .parse()
        .map_err(|_| InputError::NotANumber { field, text: text.to_owned() })?;

    if !value.is_finite() {
        return Err(InputError::NotFinite { field, text: text.to_owned() });
    }

    Ok(value)
}

/// Round to nearest (ties to even) and clamp into `1..=max_cells`.
///
/// The flag is set when the upper bound cut the value down.
fn sanitize(value: f32, max_cells: u32) -> (u32, bool) {
    let rounded = value.round_ties_even();
    let max = max_cells.max(1) as f32;
    (rounded.clamp(1.0, max) as u32, rounded > max)
}
