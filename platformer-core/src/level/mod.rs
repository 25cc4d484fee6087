//! Stage layouts and the live entity collections built from them.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collectible::{Collectible, CollectibleKind};
use crate::collision::Rect;
use crate::config::GameConfig;
use crate::draw::{Canvas, Color};
use crate::enemy::{Enemy, EnemyId, EnemyKind};
use crate::error::LevelError;
use crate::platform::{Material, MoveAxis, Platform};
use crate::rng::SeededRng;

mod layouts;

pub use layouts::{builtin, builtin_layouts, STAGE_COUNT};

const EXIT_OPEN_COLOR: Color = Color::rgb(0x2e, 0xcc, 0x71);
const EXIT_LOCKED_COLOR: Color = Color::rgb(0x7f, 0x1d, 0x1d);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub name: String,
    /// Fraction of the camera movement the layer follows.
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub color: String,
    #[serde(default)]
    pub layers: Vec<ParallaxLayer>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionSpec {
    pub axis: MoveAxis,
    pub speed: f32,
    pub distance: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Falls back to the stage material.
    #[serde(default)]
    pub material: Option<Material>,
    #[serde(default)]
    pub pass_through: bool,
    #[serde(default)]
    pub motion: Option<MotionSpec>,
}

/// Spawn points are bottom-anchored: `y` is where the enemy's feet are, and it drops
/// onto whatever is below.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectibleSpawn {
    pub kind: CollectibleKind,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageLayout {
    pub name: String,
    pub background: Background,
    #[serde(default)]
    pub material: Material,
    pub platforms: Vec<PlatformSpec>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleSpawn>,
    /// Trigger zone that completes the stage.
    pub exit: Rect,
}

impl StageLayout {
    pub fn from_json(text: &str) -> Result<Self, LevelError> {
        let layout: StageLayout =
            serde_json::from_str(text).map_err(|err| LevelError::InvalidLayout(err.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    /// Parses either a single layout object or an array of them.
    pub fn list_from_json(text: &str) -> Result<Vec<Self>, LevelError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|err| LevelError::InvalidLayout(err.to_string()))?;
        let layouts: Vec<StageLayout> = if value.is_array() {
            serde_json::from_value(value)
        } else {
            serde_json::from_value(value).map(|layout| vec![layout])
        }
        .map_err(|err| LevelError::InvalidLayout(err.to_string()))?;

        if layouts.is_empty() {
            return Err(LevelError::InvalidLayout("no stages defined".into()));
        }
        for layout in &layouts {
            layout.validate()?;
        }
        Ok(layouts)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if Color::parse_hex(&self.background.color).is_none() {
            return Err(LevelError::InvalidLayout(format!(
                "background colour {:?} is not #rgb or #rrggbb",
                self.background.color
            )));
        }
        for (index, spec) in self.platforms.iter().enumerate() {
            if !(spec.w > 0.0 && spec.h > 0.0) {
                return Err(LevelError::InvalidPlatform {
                    index,
                    width: spec.w as i32,
                    height: spec.h as i32,
                });
            }
            if let Some(motion) = spec.motion {
                if !(motion.speed > 0.0 && motion.distance > 0.0) {
                    return Err(LevelError::InvalidLayout(format!(
                        "platform {index} motion needs positive speed and distance"
                    )));
                }
            }
        }
        if !(self.exit.w > 0.0 && self.exit.h > 0.0) {
            return Err(LevelError::InvalidLayout("exit zone has no area".into()));
        }
        Ok(())
    }
}

/// A loaded stage. Entity collections are compacted once per tick by the game.
#[derive(Clone, Debug)]
pub struct Level {
    pub stage: usize,
    pub name: String,
    background: Color,
    layers: Vec<ParallaxLayer>,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    exit: Rect,
    next_enemy_id: u32,
}

impl Level {
    pub fn load(
        stage: usize,
        layout: &StageLayout,
        config: &GameConfig,
        rng: &mut SeededRng,
    ) -> Result<Self, LevelError> {
        layout.validate()?;
        let offset = config.ground_offset();
        let background = Color::parse_hex(&layout.background.color).unwrap_or(Color::BLACK);

        let platforms = layout
            .platforms
            .iter()
            .map(|spec| {
                let rect = Rect::new(spec.x, spec.y + offset, spec.w, spec.h);
                let mut platform = Platform::new(rect, spec.material.unwrap_or(layout.material));
                if let Some(motion) = spec.motion {
                    platform = platform.with_motion(motion.axis, motion.speed, motion.distance);
                }
                if spec.pass_through {
                    platform = platform.passable();
                }
                platform
            })
            .collect();

        let mut level = Self {
            stage,
            name: layout.name.clone(),
            background,
            layers: layout.background.layers.clone(),
            platforms,
            enemies: Vec::with_capacity(layout.enemies.len()),
            collectibles: Vec::with_capacity(layout.collectibles.len()),
            exit: Rect::new(
                layout.exit.x,
                layout.exit.y + offset,
                layout.exit.w,
                layout.exit.h,
            ),
            next_enemy_id: 1,
        };

        for spawn in &layout.enemies {
            let height = spawn.kind.params().height;
            let id = level.next_enemy_id();
            level
                .enemies
                .push(Enemy::new(id, spawn.kind, spawn.x, spawn.y + offset - height));
        }
        for spawn in &layout.collectibles {
            let (_, height) = spawn.kind.size();
            level.collectibles.push(Collectible::new(
                spawn.kind,
                spawn.x,
                spawn.y + offset - height,
                rng,
            ));
        }

        info!(
            stage,
            name = %level.name,
            platforms = level.platforms.len(),
            enemies = level.enemies.len(),
            collectibles = level.collectibles.len(),
            "level loaded"
        );
        Ok(level)
    }

    pub fn next_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        id
    }

    pub fn update_platforms(&mut self) {
        for platform in &mut self.platforms {
            platform.update();
        }
    }

    #[inline]
    pub fn exit_zone(&self) -> Rect {
        self.exit
    }

    pub fn boss_alive(&self) -> bool {
        self.enemies.iter().any(|e| e.is_boss() && !e.is_dead())
    }

    /// The exit stays shut while a boss is alive.
    #[inline]
    pub fn exit_locked(&self) -> bool {
        self.boss_alive()
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Drops dead enemies and taken collectibles.
    pub fn compact(&mut self) {
        let before = self.enemies.len();
        self.enemies.retain(|e| !e.is_dead());
        self.collectibles.retain(|c| c.active);
        let removed = before - self.enemies.len();
        if removed > 0 {
            debug!(removed, remaining = self.enemies.len(), "enemies compacted");
        }
    }

    pub fn draw_background(&self, canvas: &mut dyn Canvas, camera_x: f32, config: &GameConfig) {
        canvas.clear(self.background);
        for (depth, layer) in self.layers.iter().enumerate() {
            // Bands get darker and lower the nearer they are.
            let shade = 0x30u8.saturating_add(0x18u8.saturating_mul(depth.min(8) as u8));
            let top = config.ground_line - 160.0 + 50.0 * depth as f32;
            let shift = -(camera_x * layer.speed) % config.world_width;
            canvas.fill_rect(
                Rect::new(shift, top, config.world_width * 2.0, config.ground_line - top),
                Color::rgb(shade, shade, shade),
                0.35,
            );
        }
    }

    pub fn draw_platforms(&self, canvas: &mut dyn Canvas) {
        for platform in &self.platforms {
            let rect = platform.rect();
            let alpha = if platform.pass_through { 0.7 } else { 1.0 };
            canvas.fill_rect(rect, platform.material.color(), alpha);
            if let Some(trim) = platform.material.trim() {
                canvas.fill_rect(Rect::new(rect.x, rect.y, rect.w, 4.0_f32.min(rect.h)), trim, alpha);
            }
        }
    }

    pub fn draw_exit(&self, canvas: &mut dyn Canvas) {
        let color = if self.exit_locked() {
            EXIT_LOCKED_COLOR
        } else {
            EXIT_OPEN_COLOR
        };
        canvas.fill_rect(self.exit, color, 0.8);
    }
}
