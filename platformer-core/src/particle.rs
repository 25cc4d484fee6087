use crate::constants::{PARTICLE_FRICTION, PARTICLE_GRAVITY, PARTICLE_MIN_SIZE, PARTICLE_SHRINK};
use crate::draw::{Canvas, Color};
use crate::rng::SeededRng;

/// Cosmetic debris. Particles never collide with anything.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    vx: f32,
    vy: f32,
    pub size: f32,
    pub color: Color,
    pub alpha: f32,
    fade: f32,
}

impl Particle {
    pub fn spawn(rng: &mut SeededRng, x: f32, y: f32, color: Color) -> Self {
        Self {
            x,
            y,
            vx: rng.next_range(-3.0, 3.0),
            vy: rng.next_range(-3.0, 3.0),
            size: rng.next_range(5.0, 15.0),
            color,
            alpha: 1.0,
            fade: rng.next_range(0.01, 0.06),
        }
    }

    pub fn update(&mut self) {
        self.vx *= PARTICLE_FRICTION;
        self.vy += PARTICLE_GRAVITY;
        self.x += self.vx;
        self.y += self.vy;
        self.alpha -= self.fade;
        self.size = (self.size - PARTICLE_SHRINK).max(0.0);
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0 && self.size > PARTICLE_MIN_SIZE
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_circle(self.x, self.y, self.size / 2.0, self.color, self.alpha.clamp(0.0, 1.0));
    }
}

pub fn burst(
    particles: &mut Vec<Particle>,
    rng: &mut SeededRng,
    x: f32,
    y: f32,
    color: Color,
    count: usize,
) {
    particles.reserve(count);
    for _ in 0..count {
        particles.push(Particle::spawn(rng, x, y, color));
    }
}
