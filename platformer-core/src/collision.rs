//! Axis-aligned boxes and platform contact resolution.

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

// Absorbs float drift when comparing a previous edge against a platform face.
const EDGE_EPSILON: f32 = 1e-3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }

    /// Strict interior test; points on an edge are outside.
    #[inline]
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px > self.left() && px < self.right() && py > self.top() && py < self.bottom()
    }

    pub fn center_distance(&self, other: &Rect) -> f32 {
        let dx = other.center_x() - self.center_x();
        let dy = other.center_y() - self.center_y();
        (dx * dx + dy * dy).sqrt()
    }
}

/// Standard AABB intersection. Touching edges do not count.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Position, size and velocity shared by every moving entity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            vx: 0.0,
            vy: 0.0,
        }
    }

    pub fn apply_gravity(&mut self, gravity: f32, terminal_velocity: Option<f32>) {
        self.vy += gravity;
        if let Some(terminal) = terminal_velocity {
            if self.vy > terminal {
                self.vy = terminal;
            }
        }
    }

    #[inline]
    pub fn integrate(&mut self) {
        self.rect.x += self.vx;
        self.rect.y += self.vy;
    }

    pub fn is_finite(&self) -> bool {
        self.rect.x.is_finite()
            && self.rect.y.is_finite()
            && self.vx.is_finite()
            && self.vy.is_finite()
    }
}

/// Platform face that stopped a horizontal move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Contact {
    Landed { friction: f32 },
    Ceiling,
    Wall(Side),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContactSummary {
    pub grounded: bool,
    pub on_floor: bool,
    pub hit_ceiling: bool,
    pub wall: Option<Side>,
    /// Index of the platform the body landed on this tick.
    pub support: Option<usize>,
}

/// Resolves one overlap between `body` (already integrated this tick) and
/// `platform`. The body's previous edges are recovered from its velocity; the
/// platform's from its own previous position, so landings on a rising platform
/// still count.
///
/// Rules are tried top, bottom, then sides. Pass-through platforms only take part in
/// the landing rule.
pub fn resolve_platform(body: &mut Body, platform: &Platform) -> Option<Contact> {
    let solid = platform.rect();
    if !overlaps(&body.rect, &solid) {
        return None;
    }
    let before = platform.previous_rect();

    let prev_bottom = body.rect.bottom() - body.vy;
    if body.vy >= 0.0 && prev_bottom <= before.top().max(solid.top()) + EDGE_EPSILON {
        body.rect.y = solid.top() - body.rect.h;
        body.vy = 0.0;
        let friction = platform.friction();
        body.vx *= friction;
        return Some(Contact::Landed { friction });
    }

    if platform.pass_through {
        return None;
    }

    let prev_top = body.rect.top() - body.vy;
    if body.vy < 0.0 && prev_top >= before.bottom().min(solid.bottom()) - EDGE_EPSILON {
        body.rect.y = solid.bottom();
        body.vy = 0.0;
        return Some(Contact::Ceiling);
    }

    let prev_right = body.rect.right() - body.vx;
    let prev_left = body.rect.left() - body.vx;
    if body.vx > 0.0 && prev_right <= before.left().max(solid.left()) + EDGE_EPSILON {
        body.rect.x = solid.left() - body.rect.w;
        body.vx = 0.0;
        return Some(Contact::Wall(Side::Left));
    }
    if body.vx < 0.0 && prev_left >= before.right().min(solid.right()) - EDGE_EPSILON {
        body.rect.x = solid.right();
        body.vx = 0.0;
        return Some(Contact::Wall(Side::Right));
    }

    None
}

/// Resolves `body` against every platform and then the implicit floor at
/// `ground_line`.
pub fn resolve_against(body: &mut Body, platforms: &[Platform], ground_line: f32) -> ContactSummary {
    let mut summary = ContactSummary::default();

    for (index, platform) in platforms.iter().enumerate() {
        match resolve_platform(body, platform) {
            Some(Contact::Landed { .. }) => {
                summary.grounded = true;
                summary.support = Some(index);
            }
            Some(Contact::Ceiling) => summary.hit_ceiling = true,
            Some(Contact::Wall(side)) => summary.wall = Some(side),
            None => {}
        }
    }

    if !summary.grounded && body.rect.bottom() >= ground_line {
        body.rect.y = ground_line - body.rect.h;
        body.vy = 0.0;
        summary.grounded = true;
        summary.on_floor = true;
    }

    summary
}

/// True when a platform top (or the floor) lies just under the probe point.
pub fn has_support_at(px: f32, py: f32, platforms: &[Platform], ground_line: f32) -> bool {
    if py >= ground_line {
        return true;
    }
    platforms.iter().any(|platform| {
        let r = platform.rect();
        px >= r.left()
            && px <= r.right()
            && py >= r.top()
            && py <= r.top() + crate::constants::ENEMY_LEDGE_PROBE_TOLERANCE
    })
}
