use crate::color::Rgb;
use crate::emitter::EmitterRegistry;
use crate::force;
use rand::Rng;

/// Range of the per-particle responsiveness scalar
const DENSITY_RANGE: std::ops::Range<f32> = 1.0..31.0;

/// A grid-sampled point displaced by the pointer and relaxed back to rest
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Live position, mutated every frame
    pub x: f32,
    pub y: f32,
    /// Rest position from the grid sample
    pub base_x: f32,
    pub base_y: f32,
    pub radius: f32,
    /// Scales how strongly the pointer pushes this particle (1.0..31.0)
    pub density: f32,
    /// Nearest emitter color at generation time
    pub color: Rgb,
}

impl Particle {
    /// Apply one frame of repulsion/relaxation in place
    pub fn update(&mut self, pointer: Option<(f32, f32)>) {
        let (x, y) = force::step((self.x, self.y), self.rest(), pointer, self.density);
        self.x = x;
        self.y = y;
    }

    pub fn rest(&self) -> (f32, f32) {
        (self.base_x, self.base_y)
    }
}

/// Number of grid samples along an axis of `extent` with the given spacing
pub fn samples_along(extent: f32, spacing: f32) -> usize {
    if extent <= 0.0 || spacing <= 0.0 {
        return 0;
    }
    (extent / spacing).ceil() as usize
}

/// The particle collection. Always rebuilt wholesale, never patched.
#[derive(Debug, Clone, Default)]
pub struct ParticleGrid {
    particles: Vec<Particle>,
    /// Display radius given to regenerated particles
    pub radius: f32,
}

impl ParticleGrid {
    pub fn new(radius: f32) -> Self {
        Self {
            particles: Vec::new(),
            radius,
        }
    }

    /// Discard every particle and resample the grid.
    ///
    /// Rows are generated top to bottom, each left to right. Colors come from
    /// `emitters` as they are right now, which costs one nearest lookup per
    /// particle (particles x emitters).
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        width: f32,
        height: f32,
        spacing: f32,
        emitters: &EmitterRegistry,
        rng: &mut R,
    ) {
        let cols = samples_along(width, spacing);
        let rows = samples_along(height, spacing);

        self.particles.clear();
        self.particles.reserve(cols * rows);

        for row in 0..rows {
            let y = row as f32 * spacing;
            for col in 0..cols {
                let x = col as f32 * spacing;
                self.particles.push(Particle {
                    x,
                    y,
                    base_x: x,
                    base_y: y,
                    radius: self.radius,
                    density: rng.gen_range(DENSITY_RANGE),
                    color: emitters.nearest_color(x, y),
                });
            }
        }
    }

    /// Change display radius in place; positions and colors are untouched
    pub fn set_particle_radius(&mut self, radius: f32) {
        self.radius = radius;
        for particle in &mut self.particles {
            particle.radius = radius;
        }
    }

    #[cfg(test)]
    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_count_is_ceil_product() {
        let registry = EmitterRegistry::new(10.0);
        let mut grid = ParticleGrid::new(2.0);
        for &(w, h, s) in &[(100.0_f32, 50.0_f32, 20.0_f32), (101.0, 40.0, 20.0), (7.0, 7.0, 14.0), (360.0, 180.0, 14.0)] {
            grid.regenerate(w, h, s, &registry, &mut rng());
            let expected = (w / s).ceil() as usize * (h / s).ceil() as usize;
            assert_eq!(grid.len(), expected, "w={} h={} s={}", w, h, s);
        }
    }

    #[test]
    fn test_empty_viewport_has_no_particles() {
        let registry = EmitterRegistry::new(10.0);
        let mut grid = ParticleGrid::new(2.0);
        grid.regenerate(0.0, 100.0, 10.0, &registry, &mut rng());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_regenerated_particles_start_at_rest() {
        let registry = EmitterRegistry::new(10.0);
        let mut grid = ParticleGrid::new(3.0);
        grid.regenerate(120.0, 60.0, 15.0, &registry, &mut rng());
        for p in grid.iter() {
            assert_eq!((p.x, p.y), p.rest());
            assert!(p.x < 120.0 && p.y < 60.0);
            assert!(DENSITY_RANGE.contains(&p.density));
            assert_eq!(p.radius, 3.0);
            assert_eq!(p.color, Rgb::WHITE);
        }
    }

    #[test]
    fn test_layout_is_row_major() {
        let registry = EmitterRegistry::new(10.0);
        let mut grid = ParticleGrid::new(2.0);
        grid.regenerate(30.0, 20.0, 10.0, &registry, &mut rng());
        let rests: Vec<_> = grid.iter().map(|p| p.rest()).collect();
        assert_eq!(
            rests,
            vec![(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (0.0, 10.0), (10.0, 10.0), (20.0, 10.0)]
        );
    }

    #[test]
    fn test_colors_follow_nearest_emitter() {
        let mut registry = EmitterRegistry::new(10.0);
        registry.place_colored(0.0, 0.0, RED);
        registry.place_colored(100.0, 0.0, BLUE);
        let mut grid = ParticleGrid::new(2.0);
        grid.regenerate(101.0, 1.0, 10.0, &registry, &mut rng());

        let colors: Vec<_> = grid.iter().map(|p| (p.base_x, p.color)).collect();
        for (x, color) in colors {
            if x <= 50.0 {
                assert_eq!(color, RED, "x={}", x);
            } else {
                assert_eq!(color, BLUE, "x={}", x);
            }
        }
    }

    #[test]
    fn test_regenerate_discards_displacement() {
        let registry = EmitterRegistry::new(10.0);
        let mut grid = ParticleGrid::new(2.0);
        grid.regenerate(50.0, 50.0, 10.0, &registry, &mut rng());
        for p in grid.iter_mut() {
            p.update(Some((p.x + 1.0, p.y)));
        }
        assert!(grid.iter().any(|p| (p.x, p.y) != p.rest()));

        grid.regenerate(50.0, 50.0, 10.0, &registry, &mut rng());
        assert!(grid.iter().all(|p| (p.x, p.y) == p.rest()));
    }

    #[test]
    fn test_set_particle_radius_is_visual_only() {
        let mut registry = EmitterRegistry::new(10.0);
        registry.place_colored(0.0, 0.0, RED);
        let mut grid = ParticleGrid::new(2.0);
        grid.regenerate(40.0, 40.0, 10.0, &registry, &mut rng());
        let before: Vec<_> = grid.iter().map(|p| (p.x, p.y, p.color)).collect();

        grid.set_particle_radius(7.0);

        let after: Vec<_> = grid.iter().map(|p| (p.x, p.y, p.color)).collect();
        assert_eq!(before, after);
        assert!(grid.iter().all(|p| p.radius == 7.0));
    }
}
