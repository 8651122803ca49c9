//! Horizontal drift and screen wrap
//!
//! Swimmers only ever move along x. Once a swimmer is a full buffer past an
//! edge it reappears a buffer past the opposite edge, so sprites leave the
//! screen completely before wrapping.

use crate::consts::WRAP_BUFFER;

/// Outcome of one drift step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drift {
    /// Still inside the wrap bounds
    Moved,
    /// Crossed a wrap bound and was teleported to the opposite side
    Wrapped,
}

/// Advance `x` by `speed * direction * dt` unless `stopped`, then apply the
/// wrap rule. At most one wrap per call.
pub fn drift(x: &mut f32, speed: f32, direction: f32, stopped: bool, dt: f32, field_width: f32) -> Drift {
    if !stopped {
        *x += speed * direction * dt;
    }
    wrap(x, field_width)
}

/// Apply the wrap rule to `x`
pub fn wrap(x: &mut f32, field_width: f32) -> Drift {
    let left = -WRAP_BUFFER;
    let right = field_width + WRAP_BUFFER;
    if *x < left {
        *x = right;
        Drift::Wrapped
    } else if *x > right {
        *x = left;
        Drift::Wrapped
    } else {
        Drift::Moved
    }
}
