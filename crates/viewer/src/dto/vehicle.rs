use busmap::prelude::*;
use serde::Serialize;

/// The animated marker of the selected trip.
#[derive(Debug, Clone, Serialize)]
pub struct AnimatedVehicleDto {
    pub trip_id: Option<String>,
    pub state: AnimationState,
    pub index: usize,
    pub position: Option<Coordinate>,
}

impl AnimatedVehicleDto {
    pub fn from(selection: &Selection, frame: Frame) -> Self {
        Self {
            trip_id: selection.trip_id.as_deref().map(str::to_string),
            state: frame.state,
            index: frame.index,
            position: frame.position,
        }
    }
}
