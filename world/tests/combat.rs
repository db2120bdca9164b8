use quiz_defence_core::{
    CellCoord, Command, EnemyId, Event, PlacementError, TowerId, TowerKind, WaveNumber,
    WaveStartError, WaveStatus,
};
use quiz_defence_world::{self as world, query, BuildWindow, Rules, World};

fn apply(world: &mut World, command: Command, log: &mut Vec<Event>) {
    world::apply(world, command, log);
}

fn rich_rules() -> Rules {
    Rules {
        starting_gold: 1_000,
        build_window: BuildWindow::Anytime,
        ..Rules::default()
    }
}

fn spawn(world: &mut World, log: &mut Vec<Event>) -> EnemyId {
    let before = log.len();
    apply(
        world,
        Command::SpawnEnemy {
            wave: query::wave_number(world),
            remaining: 0,
        },
        log,
    );
    log[before..]
        .iter()
        .find_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .expect("spawn accepted")
}

fn resolve_tick(world: &mut World, log: &mut Vec<Event>) {
    apply(world, Command::Tick, log);
    apply(world, Command::AdvanceEnemies, log);
    apply(world, Command::ResolveProjectiles, log);
    apply(world, Command::SweepRemovals, log);
}

#[test]
fn simultaneous_lethal_hits_reward_the_kill_once() {
    let mut world = World::with_rules(rich_rules());
    let mut log = Vec::new();
    apply(&mut world, Command::StartWave, &mut log);
    let enemy = spawn(&mut world, &mut log);

    for cell in [CellCoord::new(1, 0), CellCoord::new(1, 2)] {
        apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Sniper,
                cell,
            },
            &mut log,
        );
    }
    for tower in [TowerId::new(0), TowerId::new(1)] {
        apply(
            &mut world,
            Command::FireProjectile {
                tower,
                target: enemy,
            },
            &mut log,
        );
    }
    assert_eq!(query::projectile_view(&world).len(), 2);

    for _ in 0..50 {
        resolve_tick(&mut world, &mut log);
    }

    let kills: Vec<_> = log
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .collect();
    assert_eq!(
        kills,
        vec![&Event::EnemyKilled {
            enemy,
            gold_reward: 16,
            experience_reward: 5,
        }]
    );
    let removals = log
        .iter()
        .filter(|event| matches!(event, Event::EnemyRemoved { .. }))
        .count();
    assert_eq!(removals, 1);

    let economy = query::economy(&world);
    assert_eq!(economy.gold, 1_000 - 300 + 16);
    assert_eq!(economy.experience, 5);
    assert!(query::projectile_view(&world).is_empty());
    assert_eq!(query::live_enemy_count(&world), 0);
}

#[test]
fn killed_and_leaked_enemies_are_removed_on_the_same_tick() {
    let mut world = World::with_rules(rich_rules());
    let mut log = Vec::new();
    apply(&mut world, Command::StartWave, &mut log);
    let target = spawn(&mut world, &mut log);
    let runner = spawn(&mut world, &mut log);
    apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Sniper,
            cell: CellCoord::new(1, 0),
        },
        &mut log,
    );
    apply(
        &mut world,
        Command::FireProjectile {
            tower: TowerId::new(0),
            target,
        },
        &mut log,
    );

    let mut stamped = Vec::new();
    for _ in 0..5_000 {
        let mut events = Vec::new();
        resolve_tick(&mut world, &mut events);
        let tick = query::tick_index(&world);
        stamped.extend(events.into_iter().map(|event| (tick, event)));
        if query::live_enemy_count(&world) == 0 {
            break;
        }
    }

    let tick_of = |wanted: &Event| {
        stamped
            .iter()
            .find(|(_, event)| event == wanted)
            .map(|(tick, _)| *tick)
    };
    let killed = stamped
        .iter()
        .find_map(|(tick, event)| match event {
            Event::EnemyKilled { enemy, .. } if *enemy == target => Some(*tick),
            _ => None,
        })
        .expect("sniper kills its target");
    let leaked = tick_of(&Event::EnemyLeaked { enemy: runner }).expect("second enemy leaks");

    assert_eq!(tick_of(&Event::EnemyRemoved { enemy: target }), Some(killed));
    assert_eq!(tick_of(&Event::EnemyRemoved { enemy: runner }), Some(leaked));
    assert!(killed < leaked);
}

#[test]
fn wave_completes_after_the_last_enemy_dies() {
    let mut world = World::with_rules(rich_rules());
    let mut log = Vec::new();
    apply(&mut world, Command::StartWave, &mut log);
    let enemy = spawn(&mut world, &mut log);
    apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Sniper,
            cell: CellCoord::new(1, 0),
        },
        &mut log,
    );
    apply(
        &mut world,
        Command::FireProjectile {
            tower: TowerId::new(0),
            target: enemy,
        },
        &mut log,
    );
    for _ in 0..20 {
        resolve_tick(&mut world, &mut log);
    }
    assert_eq!(query::wave_status(&world), WaveStatus::Combat);

    log.clear();
    apply(
        &mut world,
        Command::CompleteWave {
            wave: WaveNumber::FIRST,
        },
        &mut log,
    );
    assert!(log.contains(&Event::WaveCompleted {
        wave: WaveNumber::FIRST,
        gold_bonus: 50,
    }));
    assert_eq!(query::wave_number(&world), WaveNumber::new(2));
    assert_eq!(query::wave_status(&world), WaveStatus::Idle);
    assert_eq!(query::economy(&world).gold, 1_000 - 150 + 16 + 50);

    log.clear();
    apply(
        &mut world,
        Command::CompleteWave {
            wave: WaveNumber::FIRST,
        },
        &mut log,
    );
    assert!(log.is_empty(), "a wave completes exactly once");
}

#[test]
fn leaking_the_last_life_ends_the_game() {
    let mut world = World::with_rules(Rules {
        starting_lives: 1,
        ..Rules::default()
    });
    let mut log = Vec::new();
    apply(&mut world, Command::StartWave, &mut log);
    let enemy = spawn(&mut world, &mut log);

    for _ in 0..5_000 {
        if query::wave_status(&world) == WaveStatus::GameOver {
            break;
        }
        resolve_tick(&mut world, &mut log);
    }

    assert!(log.contains(&Event::EnemyLeaked { enemy }));
    assert!(log.contains(&Event::GameOver {
        wave: WaveNumber::FIRST
    }));
    assert_eq!(query::economy(&world).lives, 0);
    assert_eq!(query::live_enemy_count(&world), 0);

    log.clear();
    apply(&mut world, Command::StartWave, &mut log);
    apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: CellCoord::new(1, 0),
        },
        &mut log,
    );
    apply(&mut world, Command::Tick, &mut log);
    assert_eq!(
        log,
        vec![
            Event::WaveStartRejected {
                reason: WaveStartError::GameOver
            },
            Event::TowerPlacementRejected {
                kind: TowerKind::Basic,
                cell: CellCoord::new(1, 0),
                reason: PlacementError::GameOver,
            },
        ]
    );

    log.clear();
    apply(&mut world, Command::Reset, &mut log);
    assert_eq!(query::wave_status(&world), WaveStatus::Idle);
    assert_eq!(query::economy(&world).lives, 1);
}

#[test]
fn ice_hits_slow_the_target() {
    let mut world = World::with_rules(rich_rules());
    let mut log = Vec::new();
    apply(&mut world, Command::AwardExperience { amount: 50 }, &mut log);
    apply(
        &mut world,
        Command::UnlockTowerKind {
            kind: TowerKind::Ice,
            xp_cost: 50,
        },
        &mut log,
    );
    apply(&mut world, Command::StartWave, &mut log);
    let enemy = spawn(&mut world, &mut log);
    apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Ice,
            cell: CellCoord::new(1, 0),
        },
        &mut log,
    );
    apply(
        &mut world,
        Command::FireProjectile {
            tower: TowerId::new(0),
            target: enemy,
        },
        &mut log,
    );

    let mut slowed = None;
    for _ in 0..40 {
        resolve_tick(&mut world, &mut log);
        let snapshot = query::enemy_view(&world).get(enemy).copied();
        if let Some(snapshot) = snapshot.filter(|s| s.slow_ticks_remaining > 0) {
            slowed = Some(snapshot);
            break;
        }
    }
    let snapshot = slowed.expect("ice projectile lands within range");
    assert_eq!(snapshot.slow_ticks_remaining, 90);
    assert_eq!(snapshot.health.current(), 70 - 5);
}
