use super::*;
use crate::draw::{CommandList, DrawCommand, NullCanvas};
use crate::level::{Background, CollectibleSpawn, EnemySpawn};

fn flat_layout(enemies: Vec<EnemySpawn>, collectibles: Vec<CollectibleSpawn>) -> StageLayout {
    StageLayout {
        name: "flat".to_string(),
        background: Background {
            color: "#000000".to_string(),
            layers: Vec::new(),
        },
        material: crate::platform::Material::Normal,
        platforms: Vec::new(),
        enemies,
        collectibles,
        exit: Rect::new(600.0, 420.0, 40.0, 80.0),
    }
}

fn playing(layouts: Vec<StageLayout>) -> Game {
    let mut game = Game::with_layouts(GameConfig::default(), layouts);
    game.start();
    game.tick(16.0, &FrameInput::IDLE).unwrap();
    assert_eq!(game.state(), GameState::Playing);
    game.drain_events();
    game
}

fn place_player(game: &mut Game, x: f32) {
    let ground = game.config.ground_line;
    game.player.body.rect.x = x;
    game.player.body.rect.y = ground - PLAYER_HEIGHT;
    game.player.body.vx = 0.0;
    game.player.body.vy = 0.0;
}

fn count<F: Fn(&GameEvent) -> bool>(events: &[GameEvent], predicate: F) -> usize {
    events.iter().filter(|e| predicate(e)).count()
}

#[test]
fn menu_flow_and_pause() {
    let mut game = Game::new(GameConfig::default());
    assert_eq!(game.state(), GameState::Menu);

    game.show_instructions();
    assert_eq!(game.state(), GameState::Instructions);
    game.back_to_menu();
    assert_eq!(game.state(), GameState::Menu);

    game.start();
    assert_eq!(game.state(), GameState::Loading);
    game.tick(16.0, &FrameInput::IDLE).unwrap();
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.level().map(|l| l.stage), Some(1));

    let pause = FrameInput {
        pause_pressed: true,
        ..FrameInput::IDLE
    };
    game.tick(16.0, &pause).unwrap();
    assert_eq!(game.state(), GameState::Paused);

    let before = game.player().rect();
    let ticks = game.tick_count();
    let run = FrameInput {
        right: true,
        ..FrameInput::IDLE
    };
    for _ in 0..10 {
        game.tick(16.0, &run).unwrap();
    }
    assert_eq!(game.player().rect(), before);
    assert_eq!(game.tick_count(), ticks);

    game.tick(16.0, &pause).unwrap();
    assert_eq!(game.state(), GameState::Playing);
}

#[test]
fn lethal_hit_enters_game_over_exactly_once() {
    let mut game = playing(vec![flat_layout(Vec::new(), Vec::new())]);
    game.player.set_health(10.0);
    assert!(game.player.take_damage(15.0, 0.0));
    assert_eq!(game.player().health(), 0.0);

    for _ in 0..10 {
        game.tick(16.0, &FrameInput::IDLE).unwrap();
    }
    assert_eq!(game.state(), GameState::GameOver);
    assert!(!game.won());

    let events = game.drain_events();
    assert_eq!(
        count(&events, |e| matches!(
            e,
            GameEvent::StateChanged {
                to: GameState::GameOver,
                ..
            }
        )),
        1
    );
    assert_eq!(
        count(&events, |e| matches!(e, GameEvent::RunFinished { won: false, .. })),
        1
    );
}

#[test]
fn contact_damage_respects_invulnerability() {
    let enemy = EnemySpawn {
        kind: EnemyKind::Basic,
        x: 300.0,
        y: 500.0,
    };
    let mut game = playing(vec![flat_layout(vec![enemy], Vec::new())]);
    place_player(&mut game, 290.0);

    let mut healths = Vec::new();
    for _ in 0..PLAYER_INVULNERABLE_TICKS {
        game.tick(16.0, &FrameInput::IDLE).unwrap();
        healths.push(game.player().health());
    }
    let first_hit = healths
        .iter()
        .position(|&h| h < PLAYER_MAX_HEALTH)
        .unwrap();
    // Nothing else lands while the window from the first hit is open.
    let window_end = (first_hit + PLAYER_INVULNERABLE_TICKS as usize - 1).min(healths.len());
    assert!(healths[first_hit..window_end]
        .iter()
        .all(|&h| h == healths[first_hit]));
}

#[test]
fn melee_kill_pays_points_once() {
    let enemy = EnemySpawn {
        kind: EnemyKind::Basic,
        x: 300.0,
        y: 500.0,
    };
    let mut game = playing(vec![flat_layout(vec![enemy], Vec::new())]);
    place_player(&mut game, 240.0);
    game.player.grant_invulnerability(1_000);
    if let Some(level) = game.level.as_mut() {
        level.enemies[0].take_damage(25.0, 0.0, 0.0);
    }

    let swing = FrameInput {
        attack_pressed: true,
        ..FrameInput::IDLE
    };
    game.tick(16.0, &swing).unwrap();
    assert_eq!(game.score(), 50);
    assert!(game.level().unwrap().enemies.is_empty());

    for _ in 0..5 {
        game.tick(16.0, &FrameInput::IDLE).unwrap();
    }
    let events = game.drain_events();
    assert_eq!(count(&events, |e| matches!(e, GameEvent::EnemyKilled { .. })), 1);
    assert_eq!(game.score(), 50);
}

#[test]
fn special_hits_everything_in_radius() {
    let spawns = vec![
        EnemySpawn {
            kind: EnemyKind::Robot,
            x: 200.0,
            y: 500.0,
        },
        EnemySpawn {
            kind: EnemyKind::Robot,
            x: 700.0,
            y: 500.0,
        },
    ];
    let mut game = playing(vec![flat_layout(spawns, Vec::new())]);
    place_player(&mut game, 120.0);
    game.player.grant_invulnerability(1_000);

    let special = FrameInput {
        special_pressed: true,
        ..FrameInput::IDLE
    };
    game.tick(16.0, &special).unwrap();
    let level = game.level().unwrap();
    let near = &level.enemies[0];
    let far = &level.enemies[1];
    assert_eq!(near.health(), near.params().health - SPECIAL_DAMAGE);
    assert_eq!(far.health(), far.params().health);
}

#[test]
fn pickups_apply_and_score() {
    let coin = CollectibleSpawn {
        kind: CollectibleKind::Coin,
        x: 300.0,
        y: 500.0,
    };
    let key = CollectibleSpawn {
        kind: CollectibleKind::Key,
        x: 310.0,
        y: 500.0,
    };
    let mut game = playing(vec![flat_layout(Vec::new(), vec![coin, key])]);
    place_player(&mut game, 290.0);
    game.tick(16.0, &FrameInput::IDLE).unwrap();

    assert_eq!(game.score(), 30);
    assert_eq!(game.player().keys(), 1);
    assert!(game.level().unwrap().collectibles.is_empty());
}

#[test]
fn reaching_exit_completes_stage_and_advances() {
    let mut game = playing(vec![
        flat_layout(Vec::new(), Vec::new()),
        flat_layout(Vec::new(), Vec::new()),
    ]);
    place_player(&mut game, 595.0);
    game.tick(16.0, &FrameInput::IDLE).unwrap();
    assert_eq!(game.state(), GameState::LevelComplete);
    assert_eq!(game.score(), LEVEL_COMPLETE_BONUS);

    game.next_level();
    assert_eq!(game.state(), GameState::Loading);
    game.tick(16.0, &FrameInput::IDLE).unwrap();
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.stage(), 2);
    assert_eq!(game.score(), LEVEL_COMPLETE_BONUS);
}

#[test]
fn boss_keeps_exit_locked_until_defeated() {
    let boss = EnemySpawn {
        kind: EnemyKind::Boss,
        x: 850.0,
        y: 500.0,
    };
    let mut game = playing(vec![flat_layout(vec![boss], Vec::new())]);
    game.player.grant_invulnerability(10_000);
    place_player(&mut game, 595.0);

    game.tick(16.0, &FrameInput::IDLE).unwrap();
    assert_eq!(game.state(), GameState::Playing);
    assert!(game.level().unwrap().exit_locked());

    if let Some(level) = game.level.as_mut() {
        level.enemies[0].take_damage(10_000.0, 0.0, 0.0);
    }
    place_player(&mut game, 595.0);
    game.tick(16.0, &FrameInput::IDLE).unwrap();

    assert_eq!(game.state(), GameState::GameOver);
    assert!(game.won());
    assert_eq!(game.score(), 500 + LEVEL_COMPLETE_BONUS);
    let level = game.level().unwrap();
    assert!(level
        .collectibles
        .iter()
        .any(|c| c.kind == CollectibleKind::Star));
}

#[test]
fn minion_death_frees_a_boss_slot() {
    let boss = EnemySpawn {
        kind: EnemyKind::Boss,
        x: 800.0,
        y: 500.0,
    };
    let mut game = playing(vec![flat_layout(vec![boss], Vec::new())]);
    game.player.grant_invulnerability(10_000);
    let far_target = Rect::new(0.0, 0.0, 10.0, 10.0);

    if let Some(level) = game.level.as_mut() {
        for _ in 0..4 {
            level.enemies[0].perform_attack(&far_target, &mut game.enemy_actions);
        }
    }
    game.tick(16.0, &FrameInput::IDLE).unwrap();

    let (boss_id, minion_id) = {
        let level = game.level().unwrap();
        assert_eq!(level.enemies.len(), 2);
        assert_eq!(level.enemies[0].minion_count(), 1);
        (level.enemies[0].id, level.enemies[1].id)
    };
    assert_eq!(game.level().unwrap().enemies[1].owner, Some(boss_id));

    if let Some(level) = game.level.as_mut() {
        level.enemy_mut(minion_id).unwrap().take_damage(1_000.0, 0.0, 0.0);
    }
    game.tick(16.0, &FrameInput::IDLE).unwrap();
    let level = game.level().unwrap();
    assert_eq!(level.enemies.len(), 1);
    assert_eq!(level.enemies[0].minion_count(), 0);
}

#[test]
fn orphaned_minion_reference_is_reported() {
    let mut game = playing(vec![flat_layout(Vec::new(), Vec::new())]);
    if let Some(level) = game.level.as_mut() {
        let id = level.next_enemy_id();
        let mut minion = Enemy::minion(id, EnemyId(999), 400.0, 460.0);
        minion.take_damage(1_000.0, 0.0, 0.0);
        level.enemies.push(minion);
    }
    assert_eq!(
        game.tick(16.0, &FrameInput::IDLE),
        Err(SimError::MissingBoss {
            minion: 1,
            boss: 999
        })
    );
}

#[test]
fn orphan_fault_still_pays_every_kill_in_the_tick() {
    let mut game = playing(vec![flat_layout(Vec::new(), Vec::new())]);
    if let Some(level) = game.level.as_mut() {
        let id = level.next_enemy_id();
        let mut minion = Enemy::minion(id, EnemyId(999), 400.0, 460.0);
        minion.take_damage(1_000.0, 0.0, 0.0);
        level.enemies.push(minion);

        let id = level.next_enemy_id();
        let mut robot = Enemy::new(id, EnemyKind::Robot, 300.0, 455.0);
        robot.take_damage(1_000.0, 0.0, 0.0);
        level.enemies.push(robot);
    }

    assert!(matches!(
        game.tick(16.0, &FrameInput::IDLE),
        Err(SimError::MissingBoss { minion: 1, boss: 999 })
    ));
    let events = game.drain_events();
    assert_eq!(count(&events, |e| matches!(e, GameEvent::EnemyKilled { .. })), 2);
    let paid = EnemyKind::Basic.params().points + EnemyKind::Robot.params().points;
    assert_eq!(game.score(), paid);

    game.tick(16.0, &FrameInput::IDLE).unwrap();
    game.tick(16.0, &FrameInput::IDLE).unwrap();
    assert_eq!(game.score(), paid);
    assert!(game.level().map_or(false, |l| l.enemies.is_empty()));
}

#[test]
fn turret_shot_hurts_player_and_is_spent() {
    let turret = EnemySpawn {
        kind: EnemyKind::Turret,
        x: 800.0,
        y: 500.0,
    };
    let mut game = playing(vec![flat_layout(vec![turret], Vec::new())]);
    place_player(&mut game, 100.0);
    let center_y = game.player().rect().center_y();
    if let Some(level) = game.level.as_mut() {
        level.enemies[0].projectiles.push(crate::enemy::Projectile::aimed(
            150.0,
            center_y,
            125.0,
            center_y,
            -1.0,
            EnemyKind::Turret.params().damage,
        ));
    }

    game.tick(16.0, &FrameInput::IDLE).unwrap();
    assert_eq!(
        game.player().health(),
        PLAYER_MAX_HEALTH - EnemyKind::Turret.params().damage
    );
    assert_eq!(game.player().state(), crate::player::PlayerState::Hurt);
    assert!(game.level().map_or(false, |l| l.enemies[0].projectiles.is_empty()));
    let events = game.drain_events();
    assert_eq!(count(&events, |e| matches!(e, GameEvent::PlayerDamaged { .. })), 1);
}

#[test]
fn score_never_decreases_during_a_run() {
    let mut game = Game::new(GameConfig::default());
    game.start();
    let mut rng = SeededRng::new(77);
    let mut last = 0;
    for _ in 0..3_000 {
        let input = FrameInput::from_bits(rng.next_int(1 << 7) as u16);
        let _ = game.tick(16.0, &input);
        assert!(game.score() >= last);
        last = game.score();
        if game.state() == GameState::LevelComplete {
            game.next_level();
        }
        if game.state() == GameState::GameOver {
            break;
        }
    }
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    let run = || {
        let mut game = Game::new(GameConfig::default());
        game.start();
        let mut rng = SeededRng::new(1234);
        let mut canvas = NullCanvas;
        for frame in 0..900u32 {
            let input = FrameInput::from_bits(rng.next_int(1 << 7) as u16);
            game.frame(f64::from(frame) * 16.0, &input, &mut canvas);
        }
        game.snapshot()
    };
    assert_eq!(run(), run());
}

#[test]
fn missing_stage_is_shown_and_retried() {
    let mut game = Game::with_layouts(GameConfig::default(), Vec::new());
    game.start();

    let mut canvas = CommandList::new();
    game.frame(0.0, &FrameInput::IDLE, &mut canvas);
    assert_eq!(game.state(), GameState::Loading);
    let diagnostic = game.diagnostic().unwrap().to_string();
    assert!(diagnostic.contains("unknown stage 1"), "{diagnostic}");
    assert!(canvas.texts().any(|t| t.starts_with("Error:")));

    canvas.clear_commands();
    game.frame(16.0, &FrameInput::IDLE, &mut canvas);
    assert_eq!(game.state(), GameState::Loading);
    assert_eq!(game.diagnostic(), Some(diagnostic.as_str()));
}

#[test]
fn frame_clamps_long_stalls() {
    let mut game = playing(vec![flat_layout(Vec::new(), Vec::new())]);
    let mut canvas = NullCanvas;
    game.frame(0.0, &FrameInput::IDLE, &mut canvas);
    let swing = FrameInput {
        attack_pressed: true,
        ..FrameInput::IDLE
    };
    game.frame(16.0, &swing, &mut canvas);
    assert!(game.player().attack_hitbox().is_some());
    // A 5 second hitch only advances timers by the clamp.
    game.frame(5_016.0, &FrameInput::IDLE, &mut canvas);
    assert!(game.player().attack_hitbox().is_some());
}

#[test]
fn draw_order_is_back_to_front() {
    let mut game = Game::new(GameConfig::default());
    game.start();
    let mut canvas = CommandList::new();
    for frame in 0..5u32 {
        canvas.clear_commands();
        game.frame(f64::from(frame) * 16.0, &FrameInput::IDLE, &mut canvas);
    }

    let level = game.level().unwrap();
    let platform = level.platforms[0].rect();
    let enemy = level.enemies[0].rect();
    let player = game.player().rect();

    let clear = canvas.position_of(|c| matches!(c, DrawCommand::Clear { .. }));
    let platform_at = canvas.position_of(|c| matches!(c, DrawCommand::Rect { rect, .. } if *rect == platform));
    let enemy_at = canvas.position_of(|c| matches!(c, DrawCommand::Rect { rect, .. } if *rect == enemy));
    let player_at = canvas.position_of(|c| matches!(c, DrawCommand::Rect { rect, .. } if *rect == player));
    let hud_at = canvas.position_of(|c| matches!(c, DrawCommand::Text { text, .. } if text.starts_with("Score:")));

    assert_eq!(clear, Some(0));
    assert!(platform_at < enemy_at);
    assert!(enemy_at < player_at);
    assert!(player_at < hud_at);
}

#[test]
fn restart_resets_the_run() {
    let mut game = playing(vec![flat_layout(Vec::new(), Vec::new())]);
    place_player(&mut game, 595.0);
    game.tick(16.0, &FrameInput::IDLE).unwrap();
    assert_eq!(game.state(), GameState::GameOver);
    assert!(game.score() > 0);

    game.start();
    assert_eq!(game.score(), 0);
    assert_eq!(game.state(), GameState::Loading);
    assert!(!game.won());
}
