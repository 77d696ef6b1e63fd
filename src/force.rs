//! Pointer repulsion and relaxation for a single particle.
//!
//! Each frame a particle is either pushed away from the pointer (when inside
//! the influence radius) or eased back toward its rest position. Both terms
//! are O(1) and independent of every other particle.

/// Distance within which the pointer repels particles (surface units)
pub const INFLUENCE_RADIUS: f32 = 100.0;

/// Fraction of the remaining offset recovered per frame is `1 / RELAXATION_DIVISOR`
pub const RELAXATION_DIVISOR: f32 = 10.0;

/// Repulsion displacement for a particle at `position`.
///
/// Returns `None` when the pointer is out of range (the caller should relax
/// instead). A pointer exactly on the particle has no defined direction and
/// yields a zero displacement rather than NaN.
pub fn repulsion(position: (f32, f32), pointer: (f32, f32), density: f32) -> Option<(f32, f32)> {
    let dx = pointer.0 - position.0;
    let dy = pointer.1 - position.1;
    let distance = (dx * dx + dy * dy).sqrt();

    if distance >= INFLUENCE_RADIUS {
        return None;
    }
    if distance == 0.0 {
        return Some((0.0, 0.0));
    }

    let force = (INFLUENCE_RADIUS - distance) / INFLUENCE_RADIUS;
    Some((dx / distance * force * density, dy / distance * force * density))
}

/// Move one axis 1/10 of the way back toward rest
fn relax_axis(value: f32, rest: f32) -> f32 {
    if value != rest {
        value - (value - rest) / RELAXATION_DIVISOR
    } else {
        value
    }
}

/// Advance a particle by one frame, returning its new live position.
///
/// With no pointer (no move event yet) only relaxation applies.
pub fn step(
    position: (f32, f32),
    rest: (f32, f32),
    pointer: Option<(f32, f32)>,
    density: f32,
) -> (f32, f32) {
    if let Some(push) = pointer.and_then(|p| repulsion(position, p, density)) {
        return (position.0 - push.0, position.1 - push.1);
    }
    (relax_axis(position.0, rest.0), relax_axis(position.1, rest.1))
}
