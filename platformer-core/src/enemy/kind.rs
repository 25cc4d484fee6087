use serde::{Deserialize, Serialize};

use crate::constants::ENEMY_ATTACK_INTERVAL_MS;
use crate::draw::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Basic,
    Robot,
    Turret,
    Boss,
}

/// Per-variant numbers, looked up once at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyParams {
    pub width: f32,
    pub height: f32,
    pub health: f32,
    /// Damage of an attack (lunge, dash, projectile).
    pub damage: f32,
    /// Damage from simply touching the enemy.
    pub contact_damage: f32,
    pub points: u32,
    pub speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_interval_ms: f32,
    pub color: Color,
}

impl EnemyKind {
    pub const fn params(self) -> EnemyParams {
        match self {
            Self::Basic => EnemyParams {
                width: 40.0,
                height: 40.0,
                health: 50.0,
                damage: 10.0,
                contact_damage: 10.0,
                points: 50,
                speed: 1.0,
                detection_range: 200.0,
                attack_range: 50.0,
                attack_interval_ms: ENEMY_ATTACK_INTERVAL_MS,
                color: Color::rgb(0xe7, 0x4c, 0x3c),
            },
            Self::Robot => EnemyParams {
                width: 45.0,
                height: 45.0,
                health: 80.0,
                damage: 15.0,
                contact_damage: 15.0,
                points: 100,
                speed: 1.5,
                detection_range: 250.0,
                attack_range: 150.0,
                attack_interval_ms: ENEMY_ATTACK_INTERVAL_MS,
                color: Color::rgb(0x7f, 0x8c, 0x8d),
            },
            Self::Turret => EnemyParams {
                width: 40.0,
                height: 40.0,
                health: 60.0,
                damage: 20.0,
                contact_damage: 5.0,
                points: 75,
                speed: 0.0,
                detection_range: 350.0,
                attack_range: 300.0,
                attack_interval_ms: ENEMY_ATTACK_INTERVAL_MS,
                color: Color::rgb(0x8e, 0x44, 0xad),
            },
            Self::Boss => EnemyParams {
                width: 80.0,
                height: 100.0,
                health: 300.0,
                damage: 25.0,
                contact_damage: 25.0,
                points: 500,
                speed: 2.0,
                detection_range: 400.0,
                attack_range: 200.0,
                attack_interval_ms: ENEMY_ATTACK_INTERVAL_MS,
                color: Color::rgb(0xc0, 0x39, 0x2b),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BossPattern {
    Melee,
    RangedBurst,
    DashSlam,
    Summon,
}

impl BossPattern {
    pub const fn next(self) -> Self {
        match self {
            Self::Melee => Self::RangedBurst,
            Self::RangedBurst => Self::DashSlam,
            Self::DashSlam => Self::Summon,
            Self::Summon => Self::Melee,
        }
    }
}
