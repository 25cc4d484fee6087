//! Built-in stages, authored against `DESIGN_GROUND_LINE`.

use crate::collectible::CollectibleKind;
use crate::collision::Rect;
use crate::enemy::EnemyKind;
use crate::platform::{Material, MoveAxis};

use super::{Background, CollectibleSpawn, EnemySpawn, MotionSpec, ParallaxLayer, PlatformSpec, StageLayout};

pub const STAGE_COUNT: usize = 3;

/// Layout for a 1-based stage number.
pub fn builtin(stage: usize) -> Option<StageLayout> {
    match stage {
        1 => Some(training()),
        2 => Some(factory()),
        3 => Some(final_challenge()),
        _ => None,
    }
}

pub fn builtin_layouts() -> Vec<StageLayout> {
    (1..=STAGE_COUNT).filter_map(builtin).collect()
}

fn platform(x: f32, y: f32, w: f32, h: f32) -> PlatformSpec {
    PlatformSpec {
        x,
        y,
        w,
        h,
        material: None,
        pass_through: false,
        motion: None,
    }
}

fn moving(x: f32, y: f32, w: f32, h: f32, axis: MoveAxis, speed: f32, distance: f32) -> PlatformSpec {
    PlatformSpec {
        motion: Some(MotionSpec {
            axis,
            speed,
            distance,
        }),
        ..platform(x, y, w, h)
    }
}

fn ledge(x: f32, y: f32, w: f32, h: f32) -> PlatformSpec {
    PlatformSpec {
        pass_through: true,
        ..platform(x, y, w, h)
    }
}

fn enemy(kind: EnemyKind, x: f32, y: f32) -> EnemySpawn {
    EnemySpawn { kind, x, y }
}

fn item(kind: CollectibleKind, x: f32, y: f32) -> CollectibleSpawn {
    CollectibleSpawn { kind, x, y }
}

fn layers(entries: &[(&str, f32)]) -> Vec<ParallaxLayer> {
    entries
        .iter()
        .map(|(name, speed)| ParallaxLayer {
            name: (*name).to_string(),
            speed: *speed,
        })
        .collect()
}

fn training() -> StageLayout {
    StageLayout {
        name: "基础训练".to_string(),
        background: Background {
            color: "#87CEEB".to_string(),
            layers: layers(&[("mountains", 0.2), ("trees", 0.4)]),
        },
        material: Material::Grass,
        platforms: vec![
            platform(0.0, 500.0, 200.0, 100.0),
            platform(250.0, 450.0, 120.0, 20.0),
            moving(420.0, 400.0, 100.0, 20.0, MoveAxis::X, 1.0, 100.0),
            platform(570.0, 350.0, 80.0, 20.0),
            ledge(700.0, 280.0, 100.0, 20.0),
            ledge(500.0, 200.0, 120.0, 20.0),
            platform(750.0, 500.0, 200.0, 100.0),
        ],
        enemies: vec![
            enemy(EnemyKind::Basic, 300.0, 400.0),
            enemy(EnemyKind::Basic, 600.0, 300.0),
        ],
        collectibles: vec![
            item(CollectibleKind::Coin, 300.0, 400.0),
            item(CollectibleKind::Coin, 450.0, 350.0),
            item(CollectibleKind::Energy, 600.0, 300.0),
            item(CollectibleKind::Health, 750.0, 230.0),
        ],
        exit: Rect::new(900.0, 420.0, 40.0, 80.0),
    }
}

fn factory() -> StageLayout {
    StageLayout {
        name: "工厂危机".to_string(),
        background: Background {
            color: "#555".to_string(),
            layers: layers(&[("factory", 0.2), ("smoke", 0.3)]),
        },
        material: Material::Metal,
        platforms: vec![
            platform(0.0, 500.0, 200.0, 100.0),
            moving(250.0, 450.0, 100.0, 20.0, MoveAxis::Y, 0.8, 70.0),
            platform(400.0, 400.0, 80.0, 20.0),
            moving(520.0, 350.0, 80.0, 20.0, MoveAxis::X, 1.2, 50.0),
            platform(640.0, 300.0, 80.0, 20.0),
            ledge(400.0, 250.0, 120.0, 20.0),
            ledge(200.0, 200.0, 120.0, 20.0),
            platform(700.0, 450.0, 200.0, 150.0),
        ],
        enemies: vec![
            enemy(EnemyKind::Robot, 300.0, 400.0),
            enemy(EnemyKind::Robot, 600.0, 250.0),
            enemy(EnemyKind::Turret, 750.0, 400.0),
        ],
        collectibles: vec![
            item(CollectibleKind::Coin, 300.0, 400.0),
            item(CollectibleKind::Coin, 450.0, 350.0),
            item(CollectibleKind::Energy, 600.0, 200.0),
            item(CollectibleKind::Health, 500.0, 500.0),
        ],
        exit: Rect::new(850.0, 370.0, 40.0, 80.0),
    }
}

fn final_challenge() -> StageLayout {
    StageLayout {
        name: "最终挑战".to_string(),
        background: Background {
            color: "#300".to_string(),
            layers: layers(&[("lava", 0.1), ("castle", 0.3)]),
        },
        material: Material::Stone,
        platforms: vec![
            platform(0.0, 500.0, 150.0, 100.0),
            moving(200.0, 500.0, 80.0, 20.0, MoveAxis::X, 0.5, 50.0),
            platform(350.0, 450.0, 80.0, 20.0),
            moving(480.0, 400.0, 80.0, 20.0, MoveAxis::Y, 0.8, 60.0),
            platform(620.0, 350.0, 80.0, 20.0),
            ledge(500.0, 280.0, 100.0, 20.0),
            ledge(350.0, 220.0, 100.0, 20.0),
            ledge(200.0, 180.0, 100.0, 20.0),
            platform(700.0, 350.0, 200.0, 250.0),
        ],
        enemies: vec![
            enemy(EnemyKind::Basic, 200.0, 450.0),
            enemy(EnemyKind::Robot, 350.0, 400.0),
            enemy(EnemyKind::Robot, 500.0, 350.0),
            enemy(EnemyKind::Turret, 620.0, 300.0),
            enemy(EnemyKind::Boss, 750.0, 300.0),
        ],
        collectibles: vec![
            item(CollectibleKind::Coin, 280.0, 450.0),
            item(CollectibleKind::Coin, 430.0, 350.0),
            item(CollectibleKind::Energy, 580.0, 200.0),
            item(CollectibleKind::Health, 400.0, 500.0),
            item(CollectibleKind::Star, 750.0, 300.0),
        ],
        exit: Rect::new(850.0, 270.0, 40.0, 80.0),
    }
}
