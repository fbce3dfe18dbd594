use nalgebra::{Isometry3, Perspective3, Point2, Point3, Unit, UnitQuaternion, Vector2, Vector3};

use crate::projection::Viewport;

/// Parallel projection described the way an editor stores its view: a view
/// rotation, the world point shown at the middle of the region, and zoom as
/// world units per pixel.
#[derive(Clone, Debug)]
pub struct OrthographicViewport {
    pub center: Point3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub units_per_pixel: f64,
    pub size: Vector2<f64>,
}

impl OrthographicViewport {
    pub fn new(
        center: Point3<f64>,
        rotation: UnitQuaternion<f64>,
        units_per_pixel: f64,
        size: Vector2<f64>,
    ) -> Self {
        Self { center, rotation, units_per_pixel, size }
    }

    /// Looking straight down the Z axis with the region centered on `center`.
    pub fn top(center: Point3<f64>, units_per_pixel: f64, size: Vector2<f64>) -> Self {
        Self::new(center, UnitQuaternion::identity(), units_per_pixel, size)
    }

    fn right(&self) -> Vector3<f64> {
        self.rotation * Vector3::x()
    }

    fn up(&self) -> Vector3<f64> {
        self.rotation * Vector3::y()
    }
}

impl Viewport for OrthographicViewport {
    fn view_forward(&self) -> Unit<Vector3<f64>> {
        self.rotation * -Vector3::z_axis()
    }

    fn ray_origin(&self, pointer: &Point2<f64>) -> Point3<f64> {
        let offset = (pointer.coords - self.size / 2.0) * self.units_per_pixel;
        self.center + self.right() * offset.x + self.up() * offset.y
    }

    fn ray_direction(&self, _pointer: &Point2<f64>) -> Unit<Vector3<f64>> {
        self.view_forward()
    }

    fn project(&self, point: &Point3<f64>) -> Option<Point2<f64>> {
        let d = point - self.center;
        let x = d.dot(&self.right()) / self.units_per_pixel;
        let y = d.dot(&self.up()) / self.units_per_pixel;
        Some(Point2::from(self.size / 2.0) + Vector2::new(x, y))
    }
}

#[derive(Clone, Debug)]
pub struct PerspectiveViewport {
    pub eye: Point3<f64>,
    pub view: Isometry3<f64>,
    pub projection: Perspective3<f64>,
    pub size: Vector2<f64>,
}

impl PerspectiveViewport {
    pub const FOV_Y: f64 = 50.0 * std::f64::consts::PI / 180.0;
    pub const Z_NEAR: f64 = 0.1;
    pub const Z_FAR: f64 = 1000.0;

    pub fn looking_at(eye: Point3<f64>, target: Point3<f64>, size: Vector2<f64>) -> Self {
        let forward = target - eye;
        // looking straight along Z needs another up vector
        let up = if forward.cross(&Vector3::z()).norm_squared() < 1.0e-12 {
            Vector3::y()
        } else {
            Vector3::z()
        };
        Self {
            eye,
            view: Isometry3::look_at_rh(&eye, &target, &up),
            projection: Perspective3::new(size.x / size.y, Self::FOV_Y, Self::Z_NEAR, Self::Z_FAR),
            size,
        }
    }

    fn to_ndc(&self, pointer: &Point2<f64>) -> Vector2<f64> {
        Vector2::new(
            2.0 * pointer.x / self.size.x - 1.0,
            2.0 * pointer.y / self.size.y - 1.0,
        )
    }
}

impl Viewport for PerspectiveViewport {
    fn view_forward(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.view.inverse_transform_vector(&-Vector3::z()))
    }

    fn ray_origin(&self, _pointer: &Point2<f64>) -> Point3<f64> {
        self.eye
    }

    fn ray_direction(&self, pointer: &Point2<f64>) -> Unit<Vector3<f64>> {
        let ndc = self.to_ndc(pointer);
        let near = self.projection.unproject_point(&Point3::new(ndc.x, ndc.y, -1.0));
        let far = self.projection.unproject_point(&Point3::new(ndc.x, ndc.y, 1.0));
        let direction = self.view.inverse_transform_point(&far) - self.view.inverse_transform_point(&near);
        Unit::new_normalize(direction)
    }

    fn project(&self, point: &Point3<f64>) -> Option<Point2<f64>> {
        let camera = self.view.transform_point(point);
        if camera.z >= 0.0 {
            return None;
        }
        let ndc = self.projection.project_point(&camera);
        Some(Point2::new(
            (ndc.x + 1.0) * self.size.x / 2.0,
            (ndc.y + 1.0) * self.size.y / 2.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthographic_round_trip_on_view_plane() {
        let rotation = UnitQuaternion::from_euler_angles(0.4, -0.2, 1.1);
        let viewport = OrthographicViewport::new(Point3::new(1.0, 2.0, 3.0), rotation, 0.02, Vector2::new(400.0, 300.0));
        let pointer = Point2::new(123.0, 45.0);
        let origin = viewport.ray_origin(&pointer);
        let back = viewport.project(&origin).unwrap();
        assert!((back - pointer).norm() < 1.0e-9);
    }

    #[test]
    fn perspective_ray_passes_through_projected_point() {
        let viewport = PerspectiveViewport::looking_at(
            Point3::new(4.0, -6.0, 3.0),
            Point3::new(0.0, 0.0, 0.5),
            Vector2::new(800.0, 600.0),
        );
        let point = Point3::new(0.7, -0.4, 1.2);
        let screen = viewport.project(&point).unwrap();
        let origin = viewport.ray_origin(&screen);
        let direction = viewport.ray_direction(&screen);
        let along = (point - origin).normalize();
        assert!((along - direction.into_inner()).norm() < 1.0e-6);
    }

    #[test]
    fn points_behind_the_camera_do_not_project() {
        let viewport = PerspectiveViewport::looking_at(
            Point3::new(0.0, -5.0, 0.0),
            Point3::origin(),
            Vector2::new(800.0, 600.0),
        );
        assert!(viewport.project(&Point3::new(0.0, -10.0, 0.0)).is_none());
        assert!(viewport.project(&Point3::origin()).is_some());
    }

    #[test]
    fn top_view_looks_down() {
        let viewport = OrthographicViewport::top(Point3::origin(), 1.0, Vector2::new(10.0, 10.0));
        assert_eq!(viewport.view_forward().into_inner(), -Vector3::z());
    }
}
