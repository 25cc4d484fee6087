use serde::Serialize;

use crate::collectible::CollectibleKind;
use crate::enemy::{EnemyId, EnemyKind};
use crate::game::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Jump,
    DoubleJump,
    Attack,
    Special,
    Hit,
    Hurt,
    Pickup,
    EnemyDeath,
    Shoot,
    Slam,
    LevelComplete,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreReason {
    EnemyKilled,
    Collected,
    LevelComplete,
}

/// Side effects of one tick, queued for the host (audio, camera shake, UI).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    StateChanged {
        from: GameState,
        to: GameState,
    },
    LevelLoaded {
        stage: usize,
        name: String,
    },
    ScoreGained {
        amount: u32,
        total: u32,
        reason: ScoreReason,
    },
    PlayerDamaged {
        amount: f32,
        health: f32,
    },
    EnemyDamaged {
        id: EnemyId,
        amount: f32,
    },
    EnemyKilled {
        id: EnemyId,
        kind: EnemyKind,
        points: u32,
    },
    MinionSummoned {
        boss: EnemyId,
        minion: EnemyId,
    },
    Collected {
        kind: CollectibleKind,
        points: u32,
    },
    ProjectileFired {
        owner: EnemyId,
    },
    ScreenShake {
        intensity: f32,
        duration_ms: f32,
    },
    Sound {
        cue: SoundCue,
    },
    RunFinished {
        score: u32,
        stage: usize,
        won: bool,
    },
}

impl GameEvent {
    /// Stable name matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StateChanged { .. } => "state_changed",
            Self::LevelLoaded { .. } => "level_loaded",
            Self::ScoreGained { .. } => "score_gained",
            Self::PlayerDamaged { .. } => "player_damaged",
            Self::EnemyDamaged { .. } => "enemy_damaged",
            Self::EnemyKilled { .. } => "enemy_killed",
            Self::MinionSummoned { .. } => "minion_summoned",
            Self::Collected { .. } => "collected",
            Self::ProjectileFired { .. } => "projectile_fired",
            Self::ScreenShake { .. } => "screen_shake",
            Self::Sound { .. } => "sound",
            Self::RunFinished { .. } => "run_finished",
        }
    }
}
