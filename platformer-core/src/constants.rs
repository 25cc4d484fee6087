//! Tuning constants for the simulation.
//!
//! Velocities are pixels per tick, timers are milliseconds unless the name says
//! `_TICKS`. Layout coordinates are authored against `DESIGN_GROUND_LINE` and shifted to
//! the configured ground line at load time.

// World
pub const WORLD_WIDTH: f32 = 960.0;
pub const WORLD_HEIGHT: f32 = 600.0;
pub const DESIGN_GROUND_LINE: f32 = 500.0;
pub const GRAVITY: f32 = 0.5;
pub const FRICTION: f32 = 0.9;
pub const MAX_FRAME_DELTA_MS: f32 = 33.0;
pub const NOMINAL_FRAME_MS: f32 = 1000.0 / 60.0;
// One hour of play.
pub const MAX_SCRIPT_FRAMES: u64 = 60 * 60 * 60;
pub const LEVEL_COMPLETE_BONUS: u32 = 100;

// Player body
pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 80.0;
pub const PLAYER_SPAWN_X: f32 = 100.0;
pub const PLAYER_SPAWN_HEIGHT: f32 = 200.0; // above the ground line

// Player movement
pub const PLAYER_MAX_SPEED: f32 = 4.0;
pub const PLAYER_BOOST_FACTOR: f32 = 1.2;
pub const PLAYER_BOOST_HOLD_MS: f64 = 300.0;
pub const PLAYER_JUMP_FORCE: f32 = -10.0;
pub const PLAYER_DOUBLE_JUMP_FORCE: f32 = -8.0;
pub const PLAYER_TERMINAL_VELOCITY: f32 = 10.0;
pub const PLAYER_SHORT_HOP_DAMPING: f32 = 0.85;
pub const PLAYER_RUN_THRESHOLD: f32 = 0.1;

// Player vitals
pub const PLAYER_MAX_HEALTH: f32 = 100.0;
pub const PLAYER_MAX_ENERGY: f32 = 100.0;
pub const PLAYER_ENERGY_REGEN_PER_TICK: f32 = 0.1;
pub const PLAYER_INVULNERABLE_TICKS: u32 = 60;
pub const PLAYER_HURT_TICKS: u32 = 15;
pub const PLAYER_KNOCKBACK_X: f32 = 5.0;
pub const PLAYER_KNOCKBACK_Y: f32 = -4.0;

// Player combat
pub const ATTACK_COOLDOWN_MS: f32 = 400.0;
pub const ATTACK_ACTIVE_MS: f32 = 200.0;
pub const ATTACK_REACH: f32 = 60.0;
pub const ATTACK_DAMAGE: f32 = 25.0;
pub const SPECIAL_ENERGY_COST: f32 = 30.0;
pub const SPECIAL_COOLDOWN_MS: f32 = 1_500.0;
pub const SPECIAL_ACTIVE_MS: f32 = 300.0;
pub const SPECIAL_RADIUS: f32 = 150.0;
pub const SPECIAL_DAMAGE: f32 = 40.0;
pub const SPECIAL_KNOCKBACK: f32 = 8.0;

// Enemies
pub const ENEMY_ATTACK_INTERVAL_MS: f32 = 1_000.0;
pub const ENEMY_PATROL_DISTANCE: f32 = 100.0;
pub const ENEMY_PATROL_SPEED_FACTOR: f32 = 0.5;
pub const ENEMY_HURT_MS: f32 = 200.0;
pub const ENEMY_KNOCKBACK: f32 = 3.0;
pub const ENEMY_LEDGE_PROBE_DEPTH: f32 = 5.0;
pub const ENEMY_LEDGE_PROBE_TOLERANCE: f32 = 10.0;
pub const ENEMY_DROP_CHANCE_PCT: u32 = 50;

pub const BASIC_LUNGE_FACTOR: f32 = 2.0;
pub const BASIC_LUNGE_MS: f32 = 300.0;

pub const ROBOT_DASH_SPEED: f32 = 5.0;
pub const ROBOT_DASH_MS: f32 = 300.0;
pub const ROBOT_DASH_COOLDOWN_MS: f32 = 2_000.0;

pub const BOSS_MELEE_FACTOR: f32 = 3.0;
pub const BOSS_MELEE_MS: f32 = 500.0;
pub const BOSS_BURST_SHOTS: u8 = 3;
pub const BOSS_BURST_INTERVAL_MS: f32 = 200.0;
pub const BOSS_DASH_FACTOR: f32 = 4.0;
pub const BOSS_DASH_MS: f32 = 300.0;
pub const BOSS_HOP_FORCE: f32 = -10.0;
pub const BOSS_SLAM_DELAY_MS: f32 = 500.0;
pub const BOSS_MAX_MINIONS: u32 = 3;
pub const BOSS_SUMMON_OFFSET: f32 = 50.0;

// Projectiles
pub const PROJECTILE_RADIUS: f32 = 5.0;
pub const PROJECTILE_SPEED: f32 = 5.0;

// Collectibles
pub const COLLECTIBLE_SIZE: f32 = 20.0;
pub const COLLECTIBLE_BOB_AMPLITUDE: f32 = 5.0;
pub const COLLECTIBLE_BOB_FREQUENCY: f32 = 0.005; // radians per ms
pub const HEALTH_PICKUP_AMOUNT: f32 = 25.0;
pub const ENERGY_PICKUP_AMOUNT: f32 = 30.0;
pub const STAR_INVULNERABLE_TICKS: u32 = 300;

// Particles
pub const PARTICLE_GRAVITY: f32 = 0.1;
pub const PARTICLE_FRICTION: f32 = 0.95;
pub const PARTICLE_MIN_SIZE: f32 = 0.5;
pub const PARTICLE_SHRINK: f32 = 0.1;
