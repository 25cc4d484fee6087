//! Enemy behaviour. One struct covers every variant; the variant only selects the
//! parameter row and the attack routine.

use serde::Serialize;
use tracing::debug;

use crate::collision::{has_support_at, resolve_against, Body, Rect};
use crate::config::GameConfig;
use crate::constants::*;
use crate::draw::{Canvas, Color};
use crate::platform::Platform;

mod kind;
mod projectile;

pub use kind::{BossPattern, EnemyKind, EnemyParams};
pub use projectile::Projectile;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EnemyId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyState {
    Idle,
    Patrol,
    Chase,
    Attack,
    Hurt,
    Dead,
}

/// Requests an enemy cannot carry out on its own during `update`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyAction {
    Fired { owner: EnemyId },
    Summon { boss: EnemyId, x: f32, y: f32 },
    Slam { x: f32, y: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    params: EnemyParams,
    pub body: Body,
    health: f32,
    state: EnemyState,
    direction: f32,
    patrol_origin: f32,
    grounded: bool,
    attack_timer_ms: f32,
    // Lunges, dashes and knockback own the horizontal velocity until this runs out.
    motion_lock_ms: f32,
    hurt_ms: f32,
    dash_cooldown_ms: f32,
    pattern: BossPattern,
    burst_remaining: u8,
    burst_timer_ms: f32,
    slam_timer_ms: Option<f32>,
    minions: u32,
    /// Boss that summoned this enemy.
    pub owner: Option<EnemyId>,
    pub projectiles: Vec<Projectile>,
    rewarded: bool,
}

impl Enemy {
    pub fn new(id: EnemyId, kind: EnemyKind, x: f32, y: f32) -> Self {
        let params = kind.params();
        Self {
            id,
            kind,
            params,
            body: Body::new(x, y, params.width, params.height),
            health: params.health,
            state: if params.speed > 0.0 {
                EnemyState::Patrol
            } else {
                EnemyState::Idle
            },
            direction: 1.0,
            patrol_origin: x,
            grounded: false,
            attack_timer_ms: 0.0,
            motion_lock_ms: 0.0,
            hurt_ms: 0.0,
            dash_cooldown_ms: 0.0,
            pattern: BossPattern::Melee,
            burst_remaining: 0,
            burst_timer_ms: 0.0,
            slam_timer_ms: None,
            minions: 0,
            owner: None,
            projectiles: Vec::new(),
            rewarded: false,
        }
    }

    pub fn minion(id: EnemyId, boss: EnemyId, x: f32, y: f32) -> Self {
        let mut enemy = Self::new(id, EnemyKind::Basic, x, y);
        enemy.owner = Some(boss);
        enemy
    }

    #[inline]
    pub fn params(&self) -> &EnemyParams {
        &self.params
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
    pub fn state(&self) -> EnemyState {
        self.state
    }

    #[inline]
    pub fn direction(&self) -> f32 {
        self.direction
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    /// Pattern the next boss attack will use.
    #[inline]
    pub fn pattern(&self) -> BossPattern {
        self.pattern
    }

    #[inline]
    pub fn minion_count(&self) -> u32 {
        self.minions
    }

    pub fn minion_died(&mut self) {
        self.minions = self.minions.saturating_sub(1);
    }

    /// Returns true exactly once after death, so kill rewards are paid once.
    pub fn claim_reward(&mut self) -> bool {
        if self.is_dead() && !self.rewarded {
            self.rewarded = true;
            return true;
        }
        false
    }

    /// Damage the player takes on overlap: attack damage mid-lunge, contact otherwise.
    pub fn touch_damage(&self) -> f32 {
        if self.state == EnemyState::Attack && self.motion_lock_ms > 0.0 {
            self.params.damage
        } else {
            self.params.contact_damage
        }
    }

    pub fn update(
        &mut self,
        delta_ms: f32,
        player: &Rect,
        platforms: &[Platform],
        config: &GameConfig,
        actions: &mut Vec<EnemyAction>,
    ) {
        if self.is_dead() {
            return;
        }
        self.tick_timers(delta_ms, player, actions);

        let distance = self.body.rect.center_distance(player);
        self.state = if self.hurt_ms > 0.0 {
            self.body.vx *= config.friction;
            EnemyState::Hurt
        } else if self.motion_lock_ms > 0.0 {
            EnemyState::Attack
        } else if distance <= self.params.attack_range && self.attack_timer_ms <= 0.0 {
            self.perform_attack(player, actions);
            EnemyState::Attack
        } else if distance <= self.params.detection_range {
            self.chase(player);
            EnemyState::Chase
        } else if self.params.speed > 0.0 {
            self.patrol();
            EnemyState::Patrol
        } else {
            self.body.vx = 0.0;
            EnemyState::Idle
        };

        self.move_and_collide(platforms, config);
    }

    pub fn update_projectiles(&mut self, platforms: &[Platform], config: &GameConfig) {
        for projectile in &mut self.projectiles {
            projectile.update(platforms, config);
        }
        self.projectiles.retain(|p| p.active);
    }

    /// Runs the variant's attack and restarts the attack cooldown. Bosses advance to
    /// the next pattern every call.
    pub fn perform_attack(&mut self, player: &Rect, actions: &mut Vec<EnemyAction>) {
        self.attack_timer_ms = self.params.attack_interval_ms;
        self.face(player);

        match self.kind {
            EnemyKind::Basic => self.lunge(self.params.speed * BASIC_LUNGE_FACTOR, BASIC_LUNGE_MS),
            EnemyKind::Robot => {
                if self.dash_cooldown_ms <= 0.0 {
                    self.lunge(ROBOT_DASH_SPEED, ROBOT_DASH_MS);
                    self.dash_cooldown_ms = ROBOT_DASH_COOLDOWN_MS;
                }
            }
            EnemyKind::Turret => self.fire_at(player, actions),
            EnemyKind::Boss => {
                let pattern = self.pattern;
                self.pattern = pattern.next();
                debug!(id = self.id.0, ?pattern, "boss attack");
                self.run_pattern(pattern, player, actions);
            }
        }
    }

    fn run_pattern(&mut self, pattern: BossPattern, player: &Rect, actions: &mut Vec<EnemyAction>) {
        match pattern {
            BossPattern::Melee => self.lunge(self.params.speed * BOSS_MELEE_FACTOR, BOSS_MELEE_MS),
            BossPattern::RangedBurst => {
                self.fire_at(player, actions);
                self.burst_remaining = BOSS_BURST_SHOTS.saturating_sub(1);
                self.burst_timer_ms = BOSS_BURST_INTERVAL_MS;
            }
            BossPattern::DashSlam => {
                self.lunge(self.params.speed * BOSS_DASH_FACTOR, BOSS_DASH_MS);
                self.body.vy = BOSS_HOP_FORCE;
                self.slam_timer_ms = Some(BOSS_SLAM_DELAY_MS);
            }
            BossPattern::Summon => {
                if self.minions < BOSS_MAX_MINIONS {
                    self.minions += 1;
                    actions.push(EnemyAction::Summon {
                        boss: self.id,
                        x: self.body.rect.center_x() + self.direction * BOSS_SUMMON_OFFSET,
                        y: self.body.rect.y,
                    });
                }
            }
        }
    }

    /// Applies damage and knockback away from `source_x`. Returns true when this hit
    /// killed the enemy.
    pub fn take_damage(&mut self, amount: f32, source_x: f32, knockback: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.is_dead() {
            self.state = EnemyState::Dead;
            self.body.vx = 0.0;
            return true;
        }

        self.hurt_ms = ENEMY_HURT_MS;
        self.state = EnemyState::Hurt;
        if self.params.speed > 0.0 {
            let away = if self.body.rect.center_x() >= source_x {
                1.0
            } else {
                -1.0
            };
            self.body.vx = away * knockback;
            self.body.vy = -1.5;
            self.motion_lock_ms = ENEMY_HURT_MS;
        }
        false
    }

    fn tick_timers(&mut self, delta_ms: f32, player: &Rect, actions: &mut Vec<EnemyAction>) {
        self.attack_timer_ms = (self.attack_timer_ms - delta_ms).max(0.0);
        self.motion_lock_ms = (self.motion_lock_ms - delta_ms).max(0.0);
        self.hurt_ms = (self.hurt_ms - delta_ms).max(0.0);
        self.dash_cooldown_ms = (self.dash_cooldown_ms - delta_ms).max(0.0);

        if self.burst_remaining > 0 {
            self.burst_timer_ms -= delta_ms;
            if self.burst_timer_ms <= 0.0 {
                self.fire_at(player, actions);
                self.burst_remaining -= 1;
                self.burst_timer_ms += BOSS_BURST_INTERVAL_MS;
            }
        }

        if let Some(remaining) = self.slam_timer_ms {
            let remaining = remaining - delta_ms;
            if remaining <= 0.0 {
                self.slam_timer_ms = None;
                actions.push(EnemyAction::Slam {
                    x: self.body.rect.center_x(),
                    y: self.body.rect.bottom(),
                });
            } else {
                self.slam_timer_ms = Some(remaining);
            }
        }
    }

    fn face(&mut self, player: &Rect) {
        let dx = player.center_x() - self.body.rect.center_x();
        if dx.abs() > 1.0 {
            self.direction = dx.signum();
        }
    }

    fn lunge(&mut self, speed: f32, duration_ms: f32) {
        self.body.vx = self.direction * speed;
        self.motion_lock_ms = duration_ms;
    }

    fn chase(&mut self, player: &Rect) {
        self.face(player);
        self.body.vx = self.direction * self.params.speed;
    }

    fn patrol(&mut self) {
        let offset = self.body.rect.x - self.patrol_origin;
        if offset >= ENEMY_PATROL_DISTANCE && self.direction > 0.0 {
            self.direction = -1.0;
        } else if offset <= -ENEMY_PATROL_DISTANCE && self.direction < 0.0 {
            self.direction = 1.0;
        }
        self.body.vx = self.direction * self.params.speed * ENEMY_PATROL_SPEED_FACTOR;
    }

    fn fire_at(&mut self, player: &Rect, actions: &mut Vec<EnemyAction>) {
        self.projectiles.push(Projectile::aimed(
            self.body.rect.center_x(),
            self.body.rect.center_y(),
            player.center_x(),
            player.center_y(),
            self.direction,
            self.params.damage,
        ));
        actions.push(EnemyAction::Fired { owner: self.id });
    }

    fn move_and_collide(&mut self, platforms: &[Platform], config: &GameConfig) {
        self.body
            .apply_gravity(config.gravity, Some(PLAYER_TERMINAL_VELOCITY));
        let start_x = self.body.rect.x;
        self.body.integrate();

        let contact = resolve_against(&mut self.body, platforms, config.ground_line);
        self.grounded = contact.grounded;
        if contact.wall.is_some() && self.motion_lock_ms <= 0.0 {
            self.direction = -self.direction;
        }

        // Ledge avoidance: step back and turn around when nothing is underfoot ahead.
        if self.grounded && self.motion_lock_ms <= 0.0 && self.body.vx != 0.0 {
            let rect = self.body.rect;
            let probe_x = if self.body.vx > 0.0 {
                rect.right() + 1.0
            } else {
                rect.left() - 1.0
            };
            let probe_y = rect.bottom() + ENEMY_LEDGE_PROBE_DEPTH;
            if !has_support_at(probe_x, probe_y, platforms, config.ground_line) {
                self.body.rect.x = start_x;
                self.body.vx = 0.0;
                self.direction = -self.direction;
            }
        }

        let max_x = config.world_width - self.body.rect.w;
        if self.body.rect.x < 0.0 {
            self.body.rect.x = 0.0;
            self.direction = 1.0;
        } else if self.body.rect.x > max_x {
            self.body.rect.x = max_x;
            self.direction = -1.0;
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let color = if self.hurt_ms > 0.0 {
            Color::WHITE
        } else {
            self.params.color
        };
        canvas.fill_rect(self.body.rect, color, 1.0);

        if self.is_boss() {
            let rect = self.body.rect;
            let ratio = (self.health / self.params.health).clamp(0.0, 1.0);
            canvas.fill_rect(Rect::new(rect.x, rect.y - 10.0, rect.w, 5.0), Color::BLACK, 0.6);
            canvas.fill_rect(
                Rect::new(rect.x, rect.y - 10.0, rect.w * ratio, 5.0),
                Color::RED,
                1.0,
            );
        }

        for projectile in &self.projectiles {
            projectile.draw(canvas);
        }
    }
}
