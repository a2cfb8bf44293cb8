use defocus_common::{BoundingSphere, Prng, Ray};
use glam::{IVec3, Mat4, Vec3};

/// Half-extent of the instance grid: coordinates run −4..=4 on each axis.
pub const GRID_HALF_EXTENT: i32 = 4;
/// World-space spacing between neighboring instances.
pub const GRID_SPACING: f32 = 5.0;
/// Total number of instances (9×9×9).
pub const INSTANCE_COUNT: usize = 729;
/// Seed used by the demo.
pub const DEFAULT_SEED: u64 = 12345;

/// Per-instance animation parameters, fixed at field creation.
#[derive(Debug, Clone, Copy)]
pub struct InstanceSeed {
    /// Grid coordinate, each component in −4..=4.
    pub grid_pos: IVec3,
    /// Unit rotation axis.
    pub axis: Vec3,
    /// Initial rotation angle in degrees.
    pub base_angle_deg: f32,
    /// Rotation speed in degrees per second.
    pub spin_deg_per_sec: f32,
}

impl InstanceSeed {
    /// World-space translation of this instance.
    pub fn position(&self) -> Vec3 {
        self.grid_pos.as_vec3() * GRID_SPACING
    }

    /// Model matrix at simulation time `time`.
    pub fn model_matrix(&self, time: f64) -> Mat4 {
        let angle = (self.base_angle_deg + self.spin_deg_per_sec * time as f32).to_radians();
        Mat4::from_translation(self.position()) * Mat4::from_axis_angle(self.axis, angle)
    }
}

/// The animated field of instances.
///
/// All per-instance parameters derive from one seed, so two fields built
/// with the same seed are identical and model matrices depend only on time.
#[derive(Debug, Clone)]
pub struct InstanceField {
    seeds: Vec<InstanceSeed>,
    seed: u64,
}

impl Default for InstanceField {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl InstanceField {
    pub fn new(seed: u64) -> Self {
        let mut rng = Prng::new(seed);
        let mut seeds = Vec::with_capacity(INSTANCE_COUNT);
        for z in -GRID_HALF_EXTENT..=GRID_HALF_EXTENT {
            for y in -GRID_HALF_EXTENT..=GRID_HALF_EXTENT {
                for x in -GRID_HALF_EXTENT..=GRID_HALF_EXTENT {
                    seeds.push(InstanceSeed {
                        grid_pos: IVec3::new(x, y, z),
                        axis: rng.unit_vec3(),
                        base_angle_deg: rng.range_f32(-180.0, 180.0),
                        spin_deg_per_sec: rng.range_f32(1.0, 90.0),
                    });
                }
            }
        }
        tracing::debug!(seed, instances = seeds.len(), "instance field built");
        Self { seeds, seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn seeds(&self) -> &[InstanceSeed] {
        &self.seeds
    }

    /// Model matrices for all instances at time `time`, written into `out`
    /// (cleared first) to let callers reuse the allocation every frame.
    pub fn write_model_matrices(&self, time: f64, out: &mut Vec<Mat4>) {
        out.clear();
        out.extend(self.seeds.iter().map(|s| s.model_matrix(time)));
    }

    /// Cast a ray against every instance's transformed bounding sphere and
    /// return the nearest entry distance. Used for cursor auto-focus.
    pub fn pick(&self, ray: &Ray, bounds: &BoundingSphere, time: f64) -> Option<f32> {
        let mut nearest: Option<f32> = None;
        for seed in &self.seeds {
            let sphere = bounds.transformed(&seed.model_matrix(time));
            if let Some((entry, _)) = sphere.intersect(ray) {
                if nearest.is_none_or(|d| entry < d) {
                    nearest = Some(entry);
                }
            }
        }
        nearest
    }

    /// Deterministic checksum over all model matrices at `time`. Two fields
    /// with the same seed produce the same hash for the same time.
    pub fn state_hash(&self, time: f64) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for seed in &self.seeds {
            for v in seed.model_matrix(time).to_cols_array() {
                mix(&v.to_le_bytes());
            }
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_has_729_instances() {
        let field = InstanceField::default();
        assert_eq!(field.len(), INSTANCE_COUNT);
        assert!(!field.is_empty());
    }

    #[test]
    fn grid_positions_cover_the_lattice() {
        let field = InstanceField::default();
        let corner = field
            .seeds()
            .iter()
            .find(|s| s.grid_pos == IVec3::new(-4, -4, -4))
            .unwrap();
        assert_eq!(corner.position(), Vec3::splat(-20.0));
        let center = field
            .seeds()
            .iter()
            .find(|s| s.grid_pos == IVec3::ZERO)
            .unwrap();
        assert_eq!(center.position(), Vec3::ZERO);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let a = InstanceField::new(DEFAULT_SEED);
        let b = InstanceField::new(DEFAULT_SEED);
        assert_eq!(a.state_hash(1.5), b.state_hash(1.5));
    }

    #[test]
    fn different_seeds_diverge() {
        let a = InstanceField::new(1);
        let b = InstanceField::new(2);
        assert_ne!(a.state_hash(0.0), b.state_hash(0.0));
    }

    #[test]
    fn time_changes_the_matrices() {
        let field = InstanceField::default();
        assert_ne!(field.state_hash(0.0), field.state_hash(1.0));
    }

    #[test]
    fn spin_rates_stay_in_range() {
        let field = InstanceField::default();
        for seed in field.seeds() {
            assert!((1.0..90.0).contains(&seed.spin_deg_per_sec));
            assert!((-180.0..180.0).contains(&seed.base_angle_deg));
            assert!((seed.axis.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn model_matrix_translates_to_grid_position() {
        let field = InstanceField::default();
        let seed = &field.seeds()[0];
        let m = seed.model_matrix(0.0);
        let origin = m.transform_point3(Vec3::ZERO);
        assert!((origin - seed.position()).length() < 1e-4);
    }

    #[test]
    fn write_model_matrices_reuses_buffer() {
        let field = InstanceField::default();
        let mut out = Vec::new();
        field.write_model_matrices(0.0, &mut out);
        assert_eq!(out.len(), INSTANCE_COUNT);
        field.write_model_matrices(2.0, &mut out);
        assert_eq!(out.len(), INSTANCE_COUNT);
    }

    #[test]
    fn pick_finds_nearest_instance_along_ray() {
        let field = InstanceField::default();
        let bounds = BoundingSphere::new(Vec3::ZERO, 1.0);
        // Looking down −Z from outside the grid: the nearest instance
        // center on the axis is (0, 0, 20).
        let ray = Ray::new(Vec3::new(0.0, 0.0, 30.0), Vec3::NEG_Z);
        let dist = field.pick(&ray, &bounds, 0.0).unwrap();
        assert!((dist - 9.0).abs() < 0.5, "distance was {dist}");
    }

    #[test]
    fn pick_misses_when_looking_away() {
        let field = InstanceField::default();
        let bounds = BoundingSphere::new(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 30.0), Vec3::Z);
        assert!(field.pick(&ray, &bounds, 0.0).is_none());
    }
}
