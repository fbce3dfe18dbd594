use std::f64::consts::FRAC_PI_2;

use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// Axis-aligned bounds of a point set in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds {
    /// `None` for an empty point set.
    pub fn of<'a, I>(points: I, world: &Matrix4<f64>) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut points = points.into_iter().map(|p| world.transform_point(p));
        let first = points.next()?;
        let mut bounds = Bounds { min: first, max: first };
        for p in points {
            bounds.min = bounds.min.inf(&p);
            bounds.max = bounds.max.sup(&p);
        }
        Some(bounds)
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Largest of the three axis spans. A scale proxy, not a diameter.
    pub fn extent(&self) -> f64 {
        self.size().max()
    }

    pub fn contains(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }
}

pub fn center_of<'a, I>(points: I, world: &Matrix4<f64>) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = &'a Point3<f64>>,
{
    Bounds::of(points, world).map(|b| b.center())
}

pub fn extent_of<'a, I>(points: I, world: &Matrix4<f64>) -> Option<f64>
where
    I: IntoIterator<Item = &'a Point3<f64>>,
{
    Bounds::of(points, world).map(|b| b.extent())
}

/// `normalize(cross(view, reference))`, or `None` when the two are parallel.
pub fn up_vector(view: &Unit<Vector3<f64>>, reference: &Vector3<f64>) -> Option<Unit<Vector3<f64>>> {
    Unit::try_new(view.cross(reference), 1.0e-12)
}

/// Rotation about `view` taking `reference` onto `candidate`.
///
/// The unsigned angle between the two directions is negated when
/// `candidate` lies more than 90 degrees away from the up vector
/// `view x reference`. With a degenerate up vector the angle stays positive.
pub fn signed_turn(
    view: &Unit<Vector3<f64>>,
    reference: &Vector3<f64>,
    candidate: &Vector3<f64>,
) -> f64 {
    let angle = reference.angle(candidate);
    match up_vector(view, reference) {
        Some(up) if up.angle(candidate) > FRAC_PI_2 => -angle,
        _ => angle,
    }
}

/// Rotation about `view` that brings a ring oriented along `stored` onto
/// `target`. The sign is read from which side of `target` the old direction
/// sits, measured against the up vector of `target`.
pub fn correction_turn(
    view: &Unit<Vector3<f64>>,
    target: &Vector3<f64>,
    stored: &Vector3<f64>,
) -> f64 {
    let angle = target.angle(stored);
    if angle <= 0.0 {
        return angle;
    }
    let up = up_vector(view, target);
    let drift = Unit::try_new(stored - target, 1.0e-12);
    match (up, drift) {
        (Some(up), Some(drift)) if up.angle(&drift.into_inner()) < FRAC_PI_2 => -angle,
        _ => angle,
    }
}
