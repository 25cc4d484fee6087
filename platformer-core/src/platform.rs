use serde::{Deserialize, Serialize};

use crate::collision::Rect;
use crate::draw::Color;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Normal,
    Grass,
    Metal,
    Stone,
    Wood,
    Ice,
}

impl Material {
    /// Multiplier applied to horizontal velocity when landing on the surface.
    pub fn friction(self) -> f32 {
        match self {
            Self::Ice => 0.98,
            Self::Metal => 0.85,
            Self::Normal | Self::Grass | Self::Stone | Self::Wood => 0.9,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal | Self::Stone => Color::rgb(0x55, 0x55, 0x55),
            Self::Grass => Color::rgb(0x3a, 0x7d, 0x2d),
            Self::Metal => Color::rgb(0x77, 0x77, 0x77),
            Self::Wood => Color::rgb(0x8b, 0x45, 0x13),
            Self::Ice => Color::rgb(0xad, 0xd8, 0xe6),
        }
    }

    /// Accent strip drawn along the top face.
    pub fn trim(self) -> Option<Color> {
        match self {
            Self::Grass => Some(Color::rgb(0x4d, 0xa8, 0x3a)),
            Self::Metal => Some(Color::rgb(0x99, 0x99, 0x99)),
            Self::Ice => Some(Color::rgb(0xc9, 0xf0, 0xff)),
            Self::Wood => Some(Color::rgb(0x9b, 0x6c, 0x3b)),
            Self::Normal | Self::Stone => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveAxis {
    X,
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Oscillation {
    axis: MoveAxis,
    speed: f32,
    distance: f32,
    direction: f32,
    origin: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Platform {
    rect: Rect,
    previous: Rect,
    pub material: Material,
    pub pass_through: bool,
    motion: Option<Oscillation>,
}

impl Platform {
    pub fn new(rect: Rect, material: Material) -> Self {
        Self {
            rect,
            previous: rect,
            material,
            pass_through: false,
            motion: None,
        }
    }

    /// Back-and-forth motion along `axis`, reversing once the platform is `distance`
    /// away from where it started.
    pub fn with_motion(mut self, axis: MoveAxis, speed: f32, distance: f32) -> Self {
        let origin = match axis {
            MoveAxis::X => self.rect.x,
            MoveAxis::Y => self.rect.y,
        };
        self.motion = Some(Oscillation {
            axis,
            speed,
            distance,
            direction: 1.0,
            origin,
        });
        self
    }

    pub fn passable(mut self) -> Self {
        self.pass_through = true;
        self
    }

    pub fn set_direction(&mut self, direction: f32) {
        if let Some(motion) = self.motion.as_mut() {
            motion.direction = direction.signum();
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Where the platform was before the latest `update`.
    #[inline]
    pub fn previous_rect(&self) -> Rect {
        self.previous
    }

    #[inline]
    pub fn friction(&self) -> f32 {
        self.material.friction()
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    pub fn update(&mut self) {
        self.previous = self.rect;
        let Some(motion) = self.motion.as_mut() else {
            return;
        };

        let step = motion.speed * motion.direction;
        let position = match motion.axis {
            MoveAxis::X => {
                self.rect.x += step;
                self.rect.x
            }
            MoveAxis::Y => {
                self.rect.y += step;
                self.rect.y
            }
        };

        if (position - motion.origin).abs() >= motion.distance {
            motion.direction = -motion.direction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_friction_table() {
        assert_eq!(Material::Ice.friction(), 0.98);
        assert_eq!(Material::Metal.friction(), 0.85);
        assert_eq!(Material::Grass.friction(), 0.9);
        assert_eq!(Material::Normal.friction(), 0.9);
    }

    #[test]
    fn static_platform_does_not_move() {
        let mut platform = Platform::new(Rect::new(10.0, 20.0, 30.0, 5.0), Material::Wood);
        platform.update();
        assert_eq!(platform.rect(), Rect::new(10.0, 20.0, 30.0, 5.0));
        assert_eq!(platform.previous_rect(), platform.rect());
    }

    #[test]
    fn oscillation_stays_within_bounds_and_reverses() {
        let mut platform = Platform::new(Rect::new(100.0, 50.0, 80.0, 20.0), Material::Grass)
            .with_motion(MoveAxis::X, 1.0, 10.0);

        let mut max_offset: f32 = 0.0;
        let mut reversed = false;
        let mut last_x = platform.rect().x;
        for _ in 0..100 {
            platform.update();
            let x = platform.rect().x;
            max_offset = max_offset.max((x - 100.0).abs());
            if x < last_x {
                reversed = true;
            }
            last_x = x;
            assert_eq!(platform.rect().y, 50.0);
        }
        assert!(reversed);
        assert!(max_offset <= 10.0 + 1.0);
    }

    #[test]
    fn vertical_motion_tracks_previous_rect() {
        let mut platform = Platform::new(Rect::new(0.0, 200.0, 80.0, 20.0), Material::Metal)
            .with_motion(MoveAxis::Y, 0.8, 70.0);
        platform.update();
        assert_eq!(platform.previous_rect().y, 200.0);
        assert!((platform.rect().y - 200.8).abs() < 1e-4);
    }
}
