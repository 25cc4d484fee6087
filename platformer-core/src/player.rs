use serde::Serialize;

use crate::collision::{resolve_against, Body, Rect};
use crate::config::GameConfig;
use crate::constants::*;
use crate::draw::{Canvas, Color};
use crate::enemy::EnemyId;
use crate::input::FrameInput;
use crate::platform::Platform;

const PLAYER_COLOR: Color = Color::rgb(0x34, 0x98, 0xdb);
const SWING_COLOR: Color = Color::rgb(0xff, 0xff, 0xff);
const SPECIAL_COLOR: Color = Color::rgb(0x9b, 0x59, 0xb6);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Idle,
    Running,
    Jumping,
    Falling,
    Attacking,
    Special,
    Hurt,
}

/// What the player started this tick; the game turns these into hits and events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerActions {
    pub jumped: bool,
    pub double_jumped: bool,
    pub attack_started: bool,
    pub special_fired: bool,
    pub fell_out: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    health: f32,
    energy: f32,
    facing: Facing,
    state: PlayerState,
    grounded: bool,
    is_jumping: bool,
    can_double_jump: bool,
    invulnerable_ticks: u32,
    hurt_ticks: u32,
    attack_cooldown_ms: f32,
    attack_active_ms: f32,
    special_cooldown_ms: f32,
    special_active_ms: f32,
    keys: u32,
    support: Option<usize>,
    spawn: (f32, f32),
    // Enemies already struck by the current swing.
    swing_hits: Vec<EnemyId>,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            health: PLAYER_MAX_HEALTH,
            energy: PLAYER_MAX_ENERGY,
            facing: Facing::Right,
            state: PlayerState::Idle,
            grounded: false,
            is_jumping: false,
            can_double_jump: false,
            invulnerable_ticks: 0,
            hurt_ticks: 0,
            attack_cooldown_ms: 0.0,
            attack_active_ms: 0.0,
            special_cooldown_ms: 0.0,
            special_active_ms: 0.0,
            keys: 0,
            support: None,
            spawn: (x, y),
            swing_hits: Vec::new(),
        }
    }

    /// Fresh player at the stage spawn point.
    pub fn spawn(config: &GameConfig) -> Self {
        Self::new(PLAYER_SPAWN_X, config.ground_line - PLAYER_SPAWN_HEIGHT)
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect
    }

    #[inline]
    pub fn health(&self) -> f32 {
        self.health
    }

    #[inline]
    pub fn energy(&self) -> f32 {
        self.energy
    }

    #[inline]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[inline]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    #[inline]
    pub fn keys(&self) -> u32 {
        self.keys
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    #[inline]
    pub fn invulnerable_ticks(&self) -> u32 {
        self.invulnerable_ticks
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn update(
        &mut self,
        delta_ms: f32,
        input: &FrameInput,
        platforms: &[Platform],
        config: &GameConfig,
    ) -> PlayerActions {
        let mut actions = PlayerActions::default();
        self.tick_timers(delta_ms);
        self.ride_support(platforms);

        // Horizontal
        if input.left != input.right {
            self.facing = if input.left { Facing::Left } else { Facing::Right };
            let speed = if input.boost {
                PLAYER_MAX_SPEED * PLAYER_BOOST_FACTOR
            } else {
                PLAYER_MAX_SPEED
            };
            self.body.vx = self.facing.sign() * speed;
        } else {
            self.body.vx *= config.friction;
        }

        // Jumps
        if input.jump_pressed {
            if self.grounded && !self.is_jumping {
                self.body.vy = PLAYER_JUMP_FORCE;
                self.grounded = false;
                self.is_jumping = true;
                self.can_double_jump = true;
                actions.jumped = true;
            } else if !self.grounded && self.can_double_jump {
                self.body.vy = PLAYER_DOUBLE_JUMP_FORCE;
                self.can_double_jump = false;
                actions.double_jumped = true;
            }
        }
        if self.is_jumping && !input.jump_held && self.body.vy < 0.0 {
            self.body.vy *= PLAYER_SHORT_HOP_DAMPING;
        }

        // Combat
        if input.attack_pressed && self.attack_cooldown_ms <= 0.0 {
            self.attack_cooldown_ms = ATTACK_COOLDOWN_MS;
            self.attack_active_ms = ATTACK_ACTIVE_MS;
            self.swing_hits.clear();
            actions.attack_started = true;
        }
        if input.special_pressed
            && self.special_cooldown_ms <= 0.0
            && self.energy >= SPECIAL_ENERGY_COST
        {
            self.energy -= SPECIAL_ENERGY_COST;
            self.special_cooldown_ms = SPECIAL_COOLDOWN_MS;
            self.special_active_ms = SPECIAL_ACTIVE_MS;
            actions.special_fired = true;
        }

        // Gravity always pulls; resting contact re-grounds the body every tick.
        self.body
            .apply_gravity(config.gravity, Some(PLAYER_TERMINAL_VELOCITY));
        self.body.integrate();

        let contact = resolve_against(&mut self.body, platforms, config.ground_line);
        self.grounded = contact.grounded;
        self.support = contact.support;
        if self.grounded {
            self.is_jumping = false;
            self.can_double_jump = false;
        }

        let max_x = config.world_width - self.body.rect.w;
        self.body.rect.x = self.body.rect.x.clamp(0.0, max_x.max(0.0));
        if self.body.rect.top() > config.world_height {
            self.body.rect.x = self.spawn.0;
            self.body.rect.y = self.spawn.1;
            self.body.vx = 0.0;
            self.body.vy = 0.0;
            actions.fell_out = true;
        }

        self.state = self.derive_state();
        actions
    }

    fn tick_timers(&mut self, delta_ms: f32) {
        self.attack_cooldown_ms = (self.attack_cooldown_ms - delta_ms).max(0.0);
        self.attack_active_ms = (self.attack_active_ms - delta_ms).max(0.0);
        self.special_cooldown_ms = (self.special_cooldown_ms - delta_ms).max(0.0);
        self.special_active_ms = (self.special_active_ms - delta_ms).max(0.0);
        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);
        self.hurt_ticks = self.hurt_ticks.saturating_sub(1);
        self.energy = (self.energy + PLAYER_ENERGY_REGEN_PER_TICK).min(PLAYER_MAX_ENERGY);
    }

    /// Moves the player along with the platform it stood on last tick.
    fn ride_support(&mut self, platforms: &[Platform]) {
        if !self.grounded {
            return;
        }
        if let Some(platform) = self.support.and_then(|index| platforms.get(index)) {
            let now = platform.rect();
            let before = platform.previous_rect();
            self.body.rect.x += now.x - before.x;
            self.body.rect.y += now.y - before.y;
        }
    }

    fn derive_state(&self) -> PlayerState {
        if self.hurt_ticks > 0 {
            PlayerState::Hurt
        } else if self.attack_active_ms > 0.0 {
            PlayerState::Attacking
        } else if self.special_active_ms > 0.0 {
            PlayerState::Special
        } else if !self.grounded && self.body.vy < 0.0 {
            PlayerState::Jumping
        } else if !self.grounded {
            PlayerState::Falling
        } else if self.body.vx.abs() > PLAYER_RUN_THRESHOLD {
            PlayerState::Running
        } else {
            PlayerState::Idle
        }
    }

    /// Melee box in front of the player while a swing is active.
    pub fn attack_hitbox(&self) -> Option<Rect> {
        if self.attack_active_ms <= 0.0 {
            return None;
        }
        let rect = self.body.rect;
        let x = match self.facing {
            Facing::Right => rect.right(),
            Facing::Left => rect.left() - ATTACK_REACH,
        };
        Some(Rect::new(x, rect.y + rect.h * 0.25, ATTACK_REACH, rect.h * 0.5))
    }

    /// Records a swing hit. False when the enemy was already struck by this swing.
    pub fn register_hit(&mut self, enemy: EnemyId) -> bool {
        if self.swing_hits.contains(&enemy) {
            return false;
        }
        self.swing_hits.push(enemy);
        true
    }

    /// Returns false when the hit was ignored.
    pub fn take_damage(&mut self, amount: f32, source_x: f32) -> bool {
        if self.is_invulnerable() || self.is_dead() || amount <= 0.0 {
            return false;
        }
        self.health = (self.health - amount).clamp(0.0, PLAYER_MAX_HEALTH);
        let away = if self.body.rect.center_x() >= source_x {
            1.0
        } else {
            -1.0
        };
        self.body.vx = away * PLAYER_KNOCKBACK_X;
        self.body.vy = PLAYER_KNOCKBACK_Y;
        self.grounded = false;
        self.invulnerable_ticks = PLAYER_INVULNERABLE_TICKS;
        self.hurt_ticks = PLAYER_HURT_TICKS;
        self.state = PlayerState::Hurt;
        true
    }

    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, PLAYER_MAX_HEALTH);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, PLAYER_MAX_HEALTH);
    }

    pub fn restore_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).clamp(0.0, PLAYER_MAX_ENERGY);
    }

    pub fn add_key(&mut self) {
        self.keys += 1;
    }

    pub fn grant_invulnerability(&mut self, ticks: u32) {
        self.invulnerable_ticks = self.invulnerable_ticks.max(ticks);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let blink = self.is_invulnerable() && (self.invulnerable_ticks / 5) % 2 == 1;
        canvas.fill_rect(self.body.rect, PLAYER_COLOR, if blink { 0.4 } else { 1.0 });

        if let Some(hitbox) = self.attack_hitbox() {
            canvas.fill_rect(hitbox, SWING_COLOR, 0.35);
        }
        if self.special_active_ms > 0.0 {
            canvas.fill_circle(
                self.body.rect.center_x(),
                self.body.rect.center_y(),
                SPECIAL_RADIUS,
                SPECIAL_COLOR,
                0.25,
            );
        }
    }
}
