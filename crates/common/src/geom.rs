use glam::{Mat4, Vec3};

/// A ray with an origin and a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Compute the bounds of a point set. Returns a degenerate box at the
    /// origin for an empty set.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut iter = points.into_iter();
        let first = match iter.next() {
            Some(p) => p,
            None => return Self { min: Vec3::ZERO, max: Vec3::ZERO },
        };
        let mut min = first;
        let mut max = first;
        for p in iter {
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-size of the box along each axis.
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// A bounding sphere, used for cursor picking against scene instances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere transformed by a model matrix. The radius is scaled by the
    /// largest axis scale so non-uniform transforms stay conservative.
    pub fn transformed(&self, m: &Mat4) -> Self {
        let center = m.transform_point3(self.center);
        let scale = m
            .x_axis
            .truncate()
            .length()
            .max(m.y_axis.truncate().length())
            .max(m.z_axis.truncate().length());
        Self {
            center,
            radius: self.radius * scale,
        }
    }

    /// Ray-sphere intersection. Returns the entry and exit distances along
    /// the ray, or `None` when the ray misses or the sphere lies entirely
    /// behind the origin. An origin inside the sphere yields an entry of 0.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let t0 = (-b - sqrt_disc) / (2.0 * a);
        let t1 = (-b + sqrt_disc) / (2.0 * a);
        if t1 < 0.0 {
            return None;
        }
        Some((t0.max(0.0), t1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_normalizes_direction() {
        let r = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0));
        assert!((r.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(r.at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn aabb_from_points() {
        let b = Aabb::from_points([
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, -2.0, 0.0),
        ]);
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(3.0, 0.0, 2.0));
        assert_eq!(b.center(), Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(b.extents(), Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn sphere_hit_straight_on() {
        let s = BoundingSphere::new(Vec3::ZERO, 1.0);
        let r = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let (near, far) = s.intersect(&r).unwrap();
        assert!((near - 4.0).abs() < 1e-4);
        assert!((far - 6.0).abs() < 1e-4);
    }

    #[test]
    fn sphere_miss() {
        let s = BoundingSphere::new(Vec3::ZERO, 1.0);
        let r = Ray::new(Vec3::new(0.0, 5.0, 5.0), Vec3::NEG_Z);
        assert!(s.intersect(&r).is_none());
    }

    #[test]
    fn sphere_behind_origin() {
        let s = BoundingSphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0);
        let r = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(s.intersect(&r).is_none());
    }

    #[test]
    fn origin_inside_sphere_clamps_entry() {
        let s = BoundingSphere::new(Vec3::ZERO, 2.0);
        let r = Ray::new(Vec3::ZERO, Vec3::X);
        let (near, far) = s.intersect(&r).unwrap();
        assert_eq!(near, 0.0);
        assert!((far - 2.0).abs() < 1e-4);
    }

    #[test]
    fn transformed_sphere_moves_with_translation() {
        let s = BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 0.5);
        let m = Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0));
        let t = s.transformed(&m);
        assert_eq!(t.center, Vec3::new(1.0, 3.0, 0.0));
        assert_eq!(t.radius, 0.5);
    }

    #[test]
    fn transformed_sphere_scales_radius() {
        let s = BoundingSphere::new(Vec3::ZERO, 1.0);
        let m = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let t = s.transformed(&m);
        assert_eq!(t.radius, 2.0);
    }
}
