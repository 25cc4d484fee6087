use crate::collision::Rect;
use crate::config::GameConfig;
use crate::constants::{PROJECTILE_RADIUS, PROJECTILE_SPEED};
use crate::draw::{Canvas, Color};
use crate::platform::Platform;

const PROJECTILE_COLOR: Color = Color::rgb(0xff, 0x8c, 0x00);

/// Straight-line shot. `x`/`y` is the centre.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub damage: f32,
    pub active: bool,
}

impl Projectile {
    /// Aims from `(x, y)` at the target. A target sitting exactly on the muzzle has
    /// no direction, so the shot goes horizontally along `facing` instead.
    pub fn aimed(x: f32, y: f32, target_x: f32, target_y: f32, facing: f32, damage: f32) -> Self {
        let dx = target_x - x;
        let dy = target_y - y;
        let distance = (dx * dx + dy * dy).sqrt();
        let (ux, uy) = if distance > f32::EPSILON {
            (dx / distance, dy / distance)
        } else if facing < 0.0 {
            (-1.0, 0.0)
        } else {
            (1.0, 0.0)
        };

        Self {
            x,
            y,
            vx: ux * PROJECTILE_SPEED,
            vy: uy * PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            damage,
            active: true,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x - self.radius,
            self.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    pub fn update(&mut self, platforms: &[Platform], config: &GameConfig) {
        if !self.active {
            return;
        }
        self.x += self.vx;
        self.y += self.vy;

        let out_of_bounds = self.x < 0.0
            || self.x > config.world_width
            || self.y < 0.0
            || self.y > config.world_height
            || self.y >= config.ground_line;
        let rect = self.rect();
        let hit_platform = platforms
            .iter()
            .any(|p| !p.pass_through && rect.overlaps(&p.rect()));
        if out_of_bounds || hit_platform {
            self.active = false;
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_circle(self.x, self.y, self.radius, PROJECTILE_COLOR, 1.0);
    }
}
