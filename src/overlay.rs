use nalgebra::{Point2, Point3};

use crate::projection::{screen_projection, Viewport};

pub const MARKER_SIZE: f32 = 6.0;
pub const MARKER_COLOR: [f32; 4] = [0.5, 0.8, 1.0, 1.0];

/// A screen-space point marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub position: Point2<f64>,
    pub size: f32,
    pub color: [f32; 4],
}

pub trait Canvas {
    fn draw_point(&mut self, marker: &Marker);
}

impl Canvas for Vec<Marker> {
    fn draw_point(&mut self, marker: &Marker) {
        self.push(*marker);
    }
}

/// Marker for the pivot, or `None` when the pivot is off screen.
pub fn pivot_marker<V: Viewport + ?Sized>(viewport: &V, pivot: &Point3<f64>) -> Option<Marker> {
    screen_projection(viewport, pivot).map(|position| Marker {
        position,
        size: MARKER_SIZE,
        color: MARKER_COLOR,
    })
}
