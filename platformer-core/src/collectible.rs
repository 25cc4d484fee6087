use serde::{Deserialize, Serialize};

use crate::collision::Rect;
use crate::constants::{
    COLLECTIBLE_BOB_AMPLITUDE, COLLECTIBLE_BOB_FREQUENCY, COLLECTIBLE_SIZE, ENERGY_PICKUP_AMOUNT,
    HEALTH_PICKUP_AMOUNT, STAR_INVULNERABLE_TICKS,
};
use crate::draw::{Canvas, Color};
use crate::player::Player;
use crate::rng::SeededRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectibleKind {
    Coin,
    Health,
    Energy,
    Key,
    Star,
}

impl CollectibleKind {
    pub fn points(self) -> u32 {
        match self {
            Self::Coin => 10,
            Self::Health | Self::Energy => 5,
            Self::Key => 20,
            Self::Star => 50,
        }
    }

    pub fn size(self) -> (f32, f32) {
        match self {
            Self::Key => (15.0, 25.0),
            _ => (COLLECTIBLE_SIZE, COLLECTIBLE_SIZE),
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Coin => Color::rgb(0xff, 0xd7, 0x00),
            Self::Health => Color::rgb(0xff, 0x44, 0x44),
            Self::Energy => Color::rgb(0x44, 0x88, 0xff),
            Self::Key => Color::rgb(0xda, 0xa5, 0x20),
            Self::Star => Color::rgb(0xff, 0xff, 0x66),
        }
    }

    /// Applies the pickup to the player. Points are handled by the caller.
    pub fn apply(self, player: &mut Player) {
        match self {
            Self::Coin => {}
            Self::Health => player.heal(HEALTH_PICKUP_AMOUNT),
            Self::Energy => player.restore_energy(ENERGY_PICKUP_AMOUNT),
            Self::Key => player.add_key(),
            Self::Star => player.grant_invulnerability(STAR_INVULNERABLE_TICKS),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Collectible {
    pub kind: CollectibleKind,
    rect: Rect,
    base_y: f32,
    phase: f32,
    age_ms: f32,
    pub rotation: f32,
    pub scale: f32,
    pub active: bool,
}

impl Collectible {
    pub fn new(kind: CollectibleKind, x: f32, y: f32, rng: &mut SeededRng) -> Self {
        let (w, h) = kind.size();
        Self {
            kind,
            rect: Rect::new(x, y, w, h),
            base_y: y,
            phase: rng.next_range(0.0, std::f32::consts::TAU),
            age_ms: 0.0,
            rotation: 0.0,
            scale: 1.0,
            active: true,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Bob, spin and pulse. Position only moves vertically around the spawn point.
    pub fn update(&mut self, delta_ms: f32) {
        self.age_ms += delta_ms;
        let wave = self.age_ms * COLLECTIBLE_BOB_FREQUENCY + self.phase;
        self.rect.y = self.base_y + wave.sin() * COLLECTIBLE_BOB_AMPLITUDE;
        self.rotation = (self.rotation + 0.05) % std::f32::consts::TAU;
        self.scale = 1.0 + 0.2 * (wave * 2.0).sin();
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let color = self.kind.color();
        match self.kind {
            CollectibleKind::Key => canvas.fill_rect(self.rect, color, 1.0),
            _ => canvas.fill_circle(
                self.rect.center_x(),
                self.rect.center_y(),
                self.rect.w / 2.0 * self.scale,
                color,
                1.0,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_table() {
        assert_eq!(CollectibleKind::Coin.points(), 10);
        assert_eq!(CollectibleKind::Health.points(), 5);
        assert_eq!(CollectibleKind::Energy.points(), 5);
        assert_eq!(CollectibleKind::Key.points(), 20);
        assert_eq!(CollectibleKind::Star.points(), 50);
    }

    #[test]
    fn bobbing_stays_near_spawn() {
        let mut rng = SeededRng::new(3);
        let mut coin = Collectible::new(CollectibleKind::Coin, 40.0, 300.0, &mut rng);
        for _ in 0..600 {
            coin.update(16.0);
            assert!((coin.rect().y - 300.0).abs() <= COLLECTIBLE_BOB_AMPLITUDE + 1e-3);
            assert!((0.8 - 1e-4..=1.2 + 1e-4).contains(&coin.scale));
            assert_eq!(coin.rect().x, 40.0);
        }
    }
}
