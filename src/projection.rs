//! Pointer to world plane mapping, on top of the host's viewport projection.

use nalgebra::{Point2, Point3, Unit, Vector3};

/// Screen-space distance within which a press grabs the pivot marker.
pub const PICK_RADIUS: f64 = 9.0;

const PARALLEL_EPSILON: f64 = 1.0e-6;

/// Projection services of a 3D viewport region. Screen coordinates are
/// region pixels with the origin at the bottom-left corner.
pub trait Viewport {
    /// Unit vector the camera looks along.
    fn view_forward(&self) -> Unit<Vector3<f64>>;

    fn ray_origin(&self, pointer: &Point2<f64>) -> Point3<f64>;

    fn ray_direction(&self, pointer: &Point2<f64>) -> Unit<Vector3<f64>>;

    /// `None` when the point cannot be shown, e.g. behind a perspective camera.
    fn project(&self, point: &Point3<f64>) -> Option<Point2<f64>>;
}

/// Intersects the infinite line through `origin` along `direction` with the
/// plane through `plane_point` with normal `normal`.
pub fn intersect_line_plane(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    plane_point: &Point3<f64>,
    normal: &Vector3<f64>,
) -> Option<Point3<f64>> {
    let facing = normal.dot(direction);
    if facing.abs() <= PARALLEL_EPSILON {
        return None;
    }
    let t = normal.dot(&(plane_point - origin)) / facing;
    Some(origin + direction * t)
}

/// Where the pointer ray meets the plane through `plane_point` facing
/// `view_forward`. `None` when the ray runs parallel to that plane.
pub fn project_to_plane<V: Viewport + ?Sized>(
    viewport: &V,
    pointer: &Point2<f64>,
    view_forward: &Unit<Vector3<f64>>,
    plane_point: &Point3<f64>,
) -> Option<Point3<f64>> {
    let origin = viewport.ray_origin(pointer);
    let direction = viewport.ray_direction(pointer);
    intersect_line_plane(&origin, &direction, plane_point, view_forward)
}

pub fn screen_projection<V: Viewport + ?Sized>(viewport: &V, point: &Point3<f64>) -> Option<Point2<f64>> {
    viewport.project(point)
}

/// True when the pointer sits within `PICK_RADIUS` of the anchor's screen
/// position. An anchor that does not project can never be picked.
pub fn hit_test_point<V: Viewport + ?Sized>(viewport: &V, anchor: &Point3<f64>, pointer: &Point2<f64>) -> bool {
    match screen_projection(viewport, anchor) {
        Some(screen) => nalgebra::distance(&screen, pointer) <= PICK_RADIUS,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{OrthographicViewport, PerspectiveViewport};
    use nalgebra::{UnitQuaternion, Vector2};

    fn top() -> OrthographicViewport {
        OrthographicViewport::new(
            Point3::origin(),
            UnitQuaternion::identity(),
            0.01,
            Vector2::new(800.0, 600.0),
        )
    }

    #[test]
    fn parallel_ray_has_no_intersection() {
        let hit = intersect_line_plane(
            &Point3::new(0.0, 0.0, 1.0),
            &Vector3::x(),
            &Point3::origin(),
            &Vector3::z(),
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn plane_hit_lies_on_plane_behind_origin_too() {
        let hit = intersect_line_plane(
            &Point3::new(1.0, 2.0, 5.0),
            &Vector3::z(),
            &Point3::new(0.0, 0.0, -3.0),
            &Vector3::z(),
        );
        assert_eq!(hit, Some(Point3::new(1.0, 2.0, -3.0)));
    }

    #[test]
    fn pointer_lands_on_pivot_plane() {
        let viewport = top();
        let pivot = Point3::new(0.5, -0.25, 2.0);
        let forward = viewport.view_forward();
        let p = project_to_plane(&viewport, &Point2::new(500.0, 300.0), &forward, &pivot).unwrap();
        assert!((p - Point3::new(1.0, 0.0, 2.0)).norm() < 1.0e-9);
    }

    #[test]
    fn projection_is_repeatable() {
        let viewport = PerspectiveViewport::looking_at(
            Point3::new(3.0, -4.0, 6.0),
            Point3::origin(),
            Vector2::new(640.0, 480.0),
        );
        let pointer = Point2::new(211.0, 377.0);
        let forward = viewport.view_forward();
        let pivot = Point3::new(0.2, 0.1, -0.3);
        let first = project_to_plane(&viewport, &pointer, &forward, &pivot);
        let second = project_to_plane(&viewport, &pointer, &forward, &pivot);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn pointer_ray_parallel_to_plane_is_degenerate() {
        let viewport = top();
        let sideways = Vector3::x_axis();
        let p = project_to_plane(&viewport, &Point2::new(10.0, 10.0), &sideways, &Point3::origin());
        assert_eq!(p, None);
    }

    #[test]
    fn anchor_hits_itself() {
        let viewport = PerspectiveViewport::looking_at(
            Point3::new(0.0, -5.0, 5.0),
            Point3::origin(),
            Vector2::new(640.0, 480.0),
        );
        let anchor = Point3::new(0.3, 0.7, -0.2);
        let screen = screen_projection(&viewport, &anchor).unwrap();
        assert!(hit_test_point(&viewport, &anchor, &screen));
    }

    #[test]
    fn pick_radius_is_inclusive() {
        let viewport = top();
        let anchor = Point3::origin();
        assert!(hit_test_point(&viewport, &anchor, &Point2::new(409.0, 300.0)));
        assert!(!hit_test_point(&viewport, &anchor, &Point2::new(409.5, 300.0)));
    }
}
