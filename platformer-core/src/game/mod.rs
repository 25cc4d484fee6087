//! Run orchestration: state machine, per-tick update order, scoring and the draw pass.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::collectible::{Collectible, CollectibleKind};
use crate::collision::Rect;
use crate::config::GameConfig;
use crate::constants::*;
use crate::draw::{Canvas, Color};
use crate::enemy::{Enemy, EnemyAction, EnemyId, EnemyKind};
use crate::error::{LevelError, SimError};
use crate::events::{GameEvent, ScoreReason, SoundCue};
use crate::input::FrameInput;
use crate::level::{builtin_layouts, Level, StageLayout};
use crate::particle::{burst, Particle};
use crate::player::Player;
use crate::rng::SeededRng;

const MENU_BACKGROUND: Color = Color::rgb(0x1a, 0x1a, 0x2e);
const HEALTH_BAR: Color = Color::rgb(0xe7, 0x4c, 0x3c);
const ENERGY_BAR: Color = Color::rgb(0x34, 0x98, 0xdb);
const HIT_SPARK: Color = Color::rgb(0xff, 0xee, 0x88);
const SPECIAL_SPARK: Color = Color::rgb(0x9b, 0x59, 0xb6);
const DUST: Color = Color::rgb(0x8b, 0x5a, 0x2b);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Menu,
    Loading,
    Playing,
    Paused,
    LevelComplete,
    GameOver,
    Instructions,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub state: GameState,
    pub score: u32,
    pub stage: usize,
    pub stage_name: Option<String>,
    pub health: f32,
    pub energy: f32,
    pub keys: u32,
    pub player_x: f32,
    pub player_y: f32,
    pub enemies_alive: usize,
    pub collectibles_left: usize,
    pub tick_count: u64,
    pub won: bool,
    pub diagnostic: Option<String>,
}

pub struct Game {
    config: GameConfig,
    layouts: Vec<StageLayout>,
    state: GameState,
    score: u32,
    stage: usize,
    level: Option<Level>,
    player: Player,
    particles: Vec<Particle>,
    events: Vec<GameEvent>,
    enemy_actions: Vec<EnemyAction>,
    rng: SeededRng,
    last_timestamp_ms: Option<f64>,
    tick_count: u64,
    won: bool,
    diagnostic: Option<String>,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self::with_layouts(config, builtin_layouts())
    }

    pub fn with_layouts(config: GameConfig, layouts: Vec<StageLayout>) -> Self {
        let player = Player::spawn(&config);
        let rng = SeededRng::new(config.seed);
        Self {
            stage: config.start_stage.max(1),
            config,
            layouts,
            state: GameState::Menu,
            score: 0,
            level: None,
            player,
            particles: Vec::new(),
            events: Vec::new(),
            enemy_actions: Vec::new(),
            rng,
            last_timestamp_ms: None,
            tick_count: 0,
            won: false,
            diagnostic: None,
        }
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn stage(&self) -> usize {
        self.stage
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    #[inline]
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    #[inline]
    pub fn won(&self) -> bool {
        self.won
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state,
            score: self.score,
            stage: self.stage,
            stage_name: self.level.as_ref().map(|level| level.name.clone()),
            health: self.player.health(),
            energy: self.player.energy(),
            keys: self.player.keys(),
            player_x: self.player.rect().x,
            player_y: self.player.rect().y,
            enemies_alive: self.level.as_ref().map_or(0, |level| level.enemies.len()),
            collectibles_left: self.level.as_ref().map_or(0, |level| level.collectibles.len()),
            tick_count: self.tick_count,
            won: self.won,
            diagnostic: self.diagnostic.clone(),
        }
    }

    /// Starts a new run from the menu, the instructions screen or a finished run.
    pub fn start(&mut self) {
        match self.state {
            GameState::Menu | GameState::Instructions | GameState::GameOver => self.restart(),
            other => warn!(state = ?other, "start ignored"),
        }
    }

    /// Throws away the current run and loads the first stage again.
    pub fn restart(&mut self) {
        self.score = 0;
        self.stage = self.config.start_stage.max(1);
        self.won = false;
        self.level = None;
        self.particles.clear();
        self.enemy_actions.clear();
        self.player = Player::spawn(&self.config);
        self.transition(GameState::Loading);
    }

    pub fn show_instructions(&mut self) {
        if self.state == GameState::Menu {
            self.transition(GameState::Instructions);
        }
    }

    pub fn back_to_menu(&mut self) {
        if matches!(
            self.state,
            GameState::Instructions | GameState::GameOver | GameState::Paused
        ) {
            self.level = None;
            self.transition(GameState::Menu);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => self.transition(GameState::Paused),
            GameState::Paused => self.transition(GameState::Playing),
            _ => {}
        }
    }

    pub fn next_level(&mut self) {
        if self.state != GameState::LevelComplete {
            warn!(state = ?self.state, "next_level ignored");
            return;
        }
        self.stage += 1;
        self.level = None;
        self.transition(GameState::Loading);
    }

    /// One display frame: tick, then draw. A failed tick is logged and shown on screen;
    /// the next frame runs normally.
    pub fn frame(&mut self, timestamp_ms: f64, input: &FrameInput, canvas: &mut dyn Canvas) {
        let delta_ms = match self.last_timestamp_ms {
            Some(last) => (timestamp_ms - last) as f32,
            None => NOMINAL_FRAME_MS,
        };
        self.last_timestamp_ms = Some(timestamp_ms);

        match self.tick(delta_ms, input) {
            Ok(()) => self.diagnostic = None,
            Err(err) => {
                error!(%err, state = ?self.state, stage = self.stage, "tick failed");
                self.diagnostic = Some(err.to_string());
            }
        }
        self.draw(canvas);
    }

    pub fn tick(&mut self, delta_ms: f32, input: &FrameInput) -> Result<(), SimError> {
        let delta_ms = self.config.clamp_delta(delta_ms);

        if input.pause_pressed
            && matches!(self.state, GameState::Playing | GameState::Paused)
        {
            self.toggle_pause();
            return Ok(());
        }

        match self.state {
            GameState::Loading => {
                self.load_stage()?;
                self.transition(GameState::Playing);
                Ok(())
            }
            GameState::Playing => {
                self.tick_count += 1;
                let mut level = self.level.take().ok_or(SimError::LevelNotLoaded)?;
                let result = self.step(&mut level, delta_ms, input);
                self.level = Some(level);
                result
            }
            _ => Ok(()),
        }
    }

    fn load_stage(&mut self) -> Result<(), SimError> {
        let layout = self
            .layouts
            .get(self.stage.wrapping_sub(1))
            .ok_or(LevelError::UnknownStage {
                stage: self.stage,
                available: self.layouts.len(),
            })?;
        let level = Level::load(self.stage, layout, &self.config, &mut self.rng)?;

        self.events.push(GameEvent::LevelLoaded {
            stage: self.stage,
            name: level.name.clone(),
        });
        self.level = Some(level);
        self.player = Player::spawn(&self.config);
        self.particles.clear();
        Ok(())
    }

    /// Fixed update order: platforms, player, enemies, projectiles, particles,
    /// collectibles, then terminal conditions.
    fn step(&mut self, level: &mut Level, delta_ms: f32, input: &FrameInput) -> Result<(), SimError> {
        level.update_platforms();

        let actions = self
            .player
            .update(delta_ms, input, &level.platforms, &self.config);
        if !self.player.body.is_finite() {
            return Err(SimError::NonFiniteState { what: "player" });
        }
        if actions.jumped {
            self.sound(SoundCue::Jump);
        }
        if actions.double_jumped {
            self.sound(SoundCue::DoubleJump);
        }
        if actions.attack_started {
            self.sound(SoundCue::Attack);
        }
        if actions.fell_out {
            debug!(stage = self.stage, "player fell out of the world");
        }
        self.player_strikes(level, actions.special_fired);

        let player_rect = self.player.rect();
        for enemy in level.enemies.iter_mut() {
            enemy.update(
                delta_ms,
                &player_rect,
                &level.platforms,
                &self.config,
                &mut self.enemy_actions,
            );
            if !enemy.body.is_finite() {
                return Err(SimError::NonFiniteState { what: "enemy" });
            }
            if !enemy.is_dead() && enemy.rect().overlaps(&player_rect) {
                let (damage, source_x) = (enemy.touch_damage(), enemy.rect().center_x());
                self.hurt_player(damage, source_x);
            }
        }
        self.apply_enemy_actions(level);

        let mut projectile_hits = Vec::new();
        for enemy in level.enemies.iter_mut() {
            enemy.update_projectiles(&level.platforms, &self.config);
            for projectile in enemy.projectiles.iter_mut() {
                if projectile.rect().overlaps(&player_rect) {
                    projectile.active = false;
                    projectile_hits.push((projectile.damage, projectile.x));
                }
            }
            enemy.projectiles.retain(|p| p.active);
        }
        for (damage, source_x) in projectile_hits {
            self.hurt_player(damage, source_x);
        }

        self.settle_deaths(level)?;

        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(Particle::is_alive);

        let player_rect = self.player.rect();
        let mut collected = Vec::new();
        for collectible in level.collectibles.iter_mut() {
            collectible.update(delta_ms);
            if collectible.active && collectible.rect().overlaps(&player_rect) {
                collectible.active = false;
                collected.push((collectible.kind, collectible.rect()));
            }
        }
        for (kind, rect) in collected {
            kind.apply(&mut self.player);
            self.add_score(kind.points(), ScoreReason::Collected);
            self.events.push(GameEvent::Collected {
                kind,
                points: kind.points(),
            });
            self.sound(SoundCue::Pickup);
            burst(
                &mut self.particles,
                &mut self.rng,
                rect.center_x(),
                rect.center_y(),
                kind.color(),
                8,
            );
        }

        level.compact();
        self.check_terminal(level);
        Ok(())
    }

    fn player_strikes(&mut self, level: &mut Level, special_fired: bool) {
        let origin_x = self.player.rect().center_x();

        if let Some(hitbox) = self.player.attack_hitbox() {
            for enemy in level.enemies.iter_mut() {
                if enemy.is_dead() || !hitbox.overlaps(&enemy.rect()) {
                    continue;
                }
                if !self.player.register_hit(enemy.id) {
                    continue;
                }
                enemy.take_damage(ATTACK_DAMAGE, origin_x, ENEMY_KNOCKBACK);
                self.events.push(GameEvent::EnemyDamaged {
                    id: enemy.id,
                    amount: ATTACK_DAMAGE,
                });
                self.sound(SoundCue::Hit);
                let rect = enemy.rect();
                burst(
                    &mut self.particles,
                    &mut self.rng,
                    rect.center_x(),
                    rect.center_y(),
                    HIT_SPARK,
                    5,
                );
            }
        }

        if special_fired {
            let center = self.player.rect();
            self.sound(SoundCue::Special);
            burst(
                &mut self.particles,
                &mut self.rng,
                center.center_x(),
                center.center_y(),
                SPECIAL_SPARK,
                20,
            );
            for enemy in level.enemies.iter_mut() {
                if enemy.is_dead() || center.center_distance(&enemy.rect()) > SPECIAL_RADIUS {
                    continue;
                }
                enemy.take_damage(SPECIAL_DAMAGE, origin_x, SPECIAL_KNOCKBACK);
                self.events.push(GameEvent::EnemyDamaged {
                    id: enemy.id,
                    amount: SPECIAL_DAMAGE,
                });
            }
        }
    }

    fn apply_enemy_actions(&mut self, level: &mut Level) {
        for action in std::mem::take(&mut self.enemy_actions) {
            match action {
                EnemyAction::Fired { owner } => {
                    self.events.push(GameEvent::ProjectileFired { owner });
                    self.sound(SoundCue::Shoot);
                }
                EnemyAction::Summon { boss, x, y } => {
                    let id = level.next_enemy_id();
                    let width = EnemyKind::Basic.params().width;
                    level.enemies.push(Enemy::minion(id, boss, x - width / 2.0, y));
                    self.events.push(GameEvent::MinionSummoned { boss, minion: id });
                    debug!(boss = boss.0, minion = id.0, "minion summoned");
                }
                EnemyAction::Slam { x, y } => {
                    self.events.push(GameEvent::ScreenShake {
                        intensity: 8.0,
                        duration_ms: 300.0,
                    });
                    self.sound(SoundCue::Slam);
                    burst(&mut self.particles, &mut self.rng, x, y, DUST, 15);
                }
            }
        }
    }

    /// Pays out kills, spawns drops and keeps boss minion counts in step.
    fn settle_deaths(&mut self, level: &mut Level) -> Result<(), SimError> {
        let killed: Vec<(EnemyId, EnemyKind, Option<EnemyId>, u32, f32, f32)> = level
            .enemies
            .iter_mut()
            .filter_map(|enemy| {
                enemy.claim_reward().then(|| {
                    let rect = enemy.rect();
                    (
                        enemy.id,
                        enemy.kind,
                        enemy.owner,
                        enemy.params().points,
                        rect.center_x(),
                        rect.bottom(),
                    )
                })
            })
            .collect();

        let mut fault = None;
        for (id, kind, owner, points, x, bottom) in killed {
            self.add_score(points, ScoreReason::EnemyKilled);
            self.events.push(GameEvent::EnemyKilled { id, kind, points });
            self.sound(SoundCue::EnemyDeath);
            burst(
                &mut self.particles,
                &mut self.rng,
                x,
                bottom - 20.0,
                kind.params().color,
                15,
            );

            let drop = if kind == EnemyKind::Boss {
                Some(CollectibleKind::Star)
            } else if self.rng.chance_pct(ENEMY_DROP_CHANCE_PCT) {
                Some(CollectibleKind::Coin)
            } else {
                None
            };
            if let Some(drop) = drop {
                let (w, h) = drop.size();
                level
                    .collectibles
                    .push(Collectible::new(drop, x - w / 2.0, bottom - h, &mut self.rng));
            }

            if let Some(boss) = owner {
                match level.enemy_mut(boss) {
                    Some(boss_enemy) => boss_enemy.minion_died(),
                    None => {
                        // Rewards are already claimed; settle the rest before reporting.
                        fault.get_or_insert(SimError::MissingBoss {
                            minion: id.0,
                            boss: boss.0,
                        });
                    }
                }
            }
            if kind == EnemyKind::Boss {
                for minion in level.enemies.iter_mut().filter(|e| e.owner == Some(id)) {
                    minion.owner = None;
                }
            }
            info!(id = id.0, ?kind, points, score = self.score, "enemy killed");
        }
        fault.map_or(Ok(()), Err)
    }

    fn check_terminal(&mut self, level: &Level) {
        if self.state != GameState::Playing {
            return;
        }
        if self.player.is_dead() {
            self.finish_run(false);
            return;
        }
        if level.exit_locked() || !self.player.rect().overlaps(&level.exit_zone()) {
            return;
        }

        self.add_score(LEVEL_COMPLETE_BONUS, ScoreReason::LevelComplete);
        self.sound(SoundCue::LevelComplete);
        if self.stage >= self.layouts.len() {
            self.finish_run(true);
        } else {
            self.transition(GameState::LevelComplete);
        }
    }

    fn finish_run(&mut self, won: bool) {
        if self.state == GameState::GameOver {
            return;
        }
        self.won = won;
        self.transition(GameState::GameOver);
        self.sound(SoundCue::GameOver);
        self.events.push(GameEvent::RunFinished {
            score: self.score,
            stage: self.stage,
            won,
        });
        info!(score = self.score, stage = self.stage, won, "run finished");
    }

    fn hurt_player(&mut self, amount: f32, source_x: f32) {
        if !self.player.take_damage(amount, source_x) {
            return;
        }
        self.events.push(GameEvent::PlayerDamaged {
            amount,
            health: self.player.health(),
        });
        self.sound(SoundCue::Hurt);
        let rect = self.player.rect();
        burst(
            &mut self.particles,
            &mut self.rng,
            rect.center_x(),
            rect.center_y(),
            Color::RED,
            5,
        );
    }

    /// Score only ever grows within a run.
    fn add_score(&mut self, amount: u32, reason: ScoreReason) {
        if amount == 0 {
            return;
        }
        self.score = self.score.saturating_add(amount);
        self.events.push(GameEvent::ScoreGained {
            amount,
            total: self.score,
            reason,
        });
    }

    fn sound(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Sound { cue });
    }

    fn transition(&mut self, to: GameState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        info!(?from, ?to, stage = self.stage, "state change");
        self.events.push(GameEvent::StateChanged { from, to });
    }

    /// Background, platforms, collectibles, enemies and projectiles, player,
    /// particles, HUD.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        match self.state {
            GameState::Menu => {
                canvas.clear(MENU_BACKGROUND);
                canvas.text(380.0, 240.0, "PLATFORM ADVENTURE", Color::WHITE);
                canvas.text(380.0, 280.0, "Press start", Color::WHITE);
            }
            GameState::Instructions => {
                canvas.clear(MENU_BACKGROUND);
                let lines = [
                    "Arrow keys: move",
                    "Space: jump (press again in the air to double jump)",
                    "Z: attack",
                    "X: special (costs energy)",
                    "Esc: pause",
                ];
                for (row, line) in lines.iter().enumerate() {
                    canvas.text(300.0, 200.0 + row as f32 * 30.0, line, Color::WHITE);
                }
            }
            GameState::Loading => {
                canvas.clear(Color::BLACK);
                canvas.text(400.0, 300.0, &format!("Loading stage {}...", self.stage), Color::WHITE);
            }
            _ => self.draw_world(canvas),
        }

        if let Some(diagnostic) = &self.diagnostic {
            canvas.text(10.0, self.config.world_height - 10.0, &format!("Error: {diagnostic}"), Color::RED);
        }
    }

    fn draw_world(&self, canvas: &mut dyn Canvas) {
        let Some(level) = self.level.as_ref() else {
            canvas.clear(Color::BLACK);
            return;
        };

        level.draw_background(canvas, self.player.rect().center_x(), &self.config);
        level.draw_platforms(canvas);
        level.draw_exit(canvas);
        for collectible in &level.collectibles {
            collectible.draw(canvas);
        }
        for enemy in &level.enemies {
            enemy.draw(canvas);
        }
        self.player.draw(canvas);
        for particle in &self.particles {
            particle.draw(canvas);
        }
        self.draw_hud(canvas, level);
    }

    fn draw_hud(&self, canvas: &mut dyn Canvas, level: &Level) {
        canvas.text(10.0, 20.0, &format!("Score: {}", self.score), Color::WHITE);
        canvas.text(10.0, 40.0, &format!("Stage {}: {}", self.stage, level.name), Color::WHITE);

        let health = self.player.health() / PLAYER_MAX_HEALTH;
        let energy = self.player.energy() / PLAYER_MAX_ENERGY;
        canvas.fill_rect(Rect::new(10.0, 50.0, 200.0 * health, 10.0), HEALTH_BAR, 1.0);
        canvas.fill_rect(Rect::new(10.0, 65.0, 200.0 * energy, 10.0), ENERGY_BAR, 1.0);
        if self.player.keys() > 0 {
            canvas.text(10.0, 95.0, &format!("Keys: {}", self.player.keys()), Color::WHITE);
        }

        let overlay = match self.state {
            GameState::Paused => Some("PAUSED"),
            GameState::LevelComplete => Some("LEVEL COMPLETE"),
            GameState::GameOver if self.won => Some("YOU WIN"),
            GameState::GameOver => Some("GAME OVER"),
            _ => None,
        };
        if let Some(title) = overlay {
            canvas.fill_rect(
                Rect::new(0.0, 0.0, self.config.world_width, self.config.world_height),
                Color::BLACK,
                0.5,
            );
            canvas.text(400.0, 260.0, title, Color::WHITE);
            if self.state == GameState::GameOver {
                canvas.text(400.0, 300.0, &format!("Final score: {}", self.score), Color::WHITE);
            }
        }
    }
}

#[cfg(test)]
mod tests;
