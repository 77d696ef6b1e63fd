use crate::color::Rgb;
use rand::Rng;

/// Stable identity of an emitter within its registry.
///
/// Ids are never reused, so a stale id (e.g. held by an open action menu)
/// simply stops matching once its emitter is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmitterId(u64);

/// A positioned, colored marker whose proximity colors nearby particles
#[derive(Debug, Clone, PartialEq)]
pub struct Emitter {
    pub id: EmitterId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Rgb,
}

impl Emitter {
    /// Whether (x, y) lies strictly inside the emitter's visual radius
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        (dx * dx + dy * dy).sqrt() < self.radius
    }
}

/// Ordered collection of emitters. Order is insertion order and decides
/// both tie-breaks in [`nearest_color`](Self::nearest_color) and hit-test
/// priority.
#[derive(Debug, Clone)]
pub struct EmitterRegistry {
    emitters: Vec<Emitter>,
    next_id: u64,
    /// Display radius given to newly placed emitters
    pub radius: f32,
}

impl EmitterRegistry {
    pub fn new(radius: f32) -> Self {
        Self {
            emitters: Vec::new(),
            next_id: 0,
            radius,
        }
    }

    /// Place an emitter at (x, y) with a random color
    pub fn place<R: Rng + ?Sized>(&mut self, x: f32, y: f32, rng: &mut R) -> &Emitter {
        let id = EmitterId(self.next_id);
        self.next_id += 1;
        let color = Rgb::random(rng);
        self.emitters.push(Emitter {
            id,
            x,
            y,
            radius: self.radius,
            color,
        });
        &self.emitters[self.emitters.len() - 1]
    }

    /// Place an emitter at a uniformly random point of a `width` x `height` viewport
    pub fn place_random<R: Rng + ?Sized>(&mut self, width: f32, height: f32, rng: &mut R) -> &Emitter {
        let x = if width > 0.0 { rng.gen_range(0.0..width) } else { 0.0 };
        let y = if height > 0.0 { rng.gen_range(0.0..height) } else { 0.0 };
        self.place(x, y, rng)
    }

    /// Give an emitter a new random color. Returns false if it no longer exists.
    pub fn recolor<R: Rng + ?Sized>(&mut self, id: EmitterId, rng: &mut R) -> bool {
        match self.emitters.iter_mut().find(|e| e.id == id) {
            Some(emitter) => {
                emitter.color = Rgb::random(rng);
                true
            }
            None => false,
        }
    }

    /// Remove an emitter by identity. Returns false if it no longer exists.
    pub fn remove(&mut self, id: EmitterId) -> bool {
        match self.emitters.iter().position(|e| e.id == id) {
            Some(idx) => {
                self.emitters.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.emitters.clear();
    }

    /// Color of the closest emitter to (x, y); white when empty.
    /// Ties go to the earliest-inserted emitter.
    pub fn nearest_color(&self, x: f32, y: f32) -> Rgb {
        if self.is_empty() {
            return Rgb::WHITE;
        }

        let mut closest_dist = f32::INFINITY;
        let mut closest_color = Rgb::WHITE;

        for emitter in &self.emitters {
            let dx = x - emitter.x;
            let dy = y - emitter.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance < closest_dist {
                closest_dist = distance;
                closest_color = emitter.color;
            }
        }

        closest_color
    }

    /// First emitter (in collection order) whose radius contains (x, y)
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&Emitter> {
        self.emitters.iter().find(|e| e.contains(x, y))
    }

    /// Update the display radius of every emitter and of future placements
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        for emitter in &mut self.emitters {
            emitter.radius = radius;
        }
    }

    pub fn get(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Emitter> {
        self.emitters.iter()
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn place_colored(&mut self, x: f32, y: f32, color: Rgb) -> EmitterId {
        let id = EmitterId(self.next_id);
        self.next_id += 1;
        self.emitters.push(Emitter {
            id,
            x,
            y,
            radius: self.radius,
            color,
        });
        id
    }
}
