use quiz_defence_core::{Command, Event, WaveNumber, WaveStatus};
use quiz_defence_system_waves::{Config, WaveView, Waves};
use quiz_defence_world::{self as world, query, World};

fn wave_view(world: &World) -> WaveView {
    WaveView {
        wave: query::wave_number(world),
        status: query::wave_status(world),
        live_enemies: query::live_enemy_count(world),
        lives: query::economy(world).lives,
    }
}

/// Runs ticks until the first wave completes, returning the tick-stamped log.
fn run_first_wave(config: Config) -> (World, Vec<(u64, Event)>) {
    let mut world = World::new();
    let mut waves = Waves::new(config);
    let mut log = Vec::new();
    let mut pending = Vec::new();
    world::apply(&mut world, Command::StartWave, &mut pending);

    for _ in 0..10_000 {
        let mut events = std::mem::take(&mut pending);
        world::apply(&mut world, Command::Tick, &mut events);

        let mut commands = Vec::new();
        waves.handle(&events, wave_view(&world), &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        for command in [
            Command::AdvanceEnemies,
            Command::ResolveProjectiles,
            Command::SweepRemovals,
        ] {
            world::apply(&mut world, command, &mut events);
        }

        let tick = query::tick_index(&world);
        let done = events
            .iter()
            .any(|event| matches!(event, Event::WaveCompleted { .. }));
        log.extend(events.into_iter().map(|event| (tick, event)));
        if done {
            break;
        }
    }

    (world, log)
}

#[test]
fn undefended_wave_leaks_every_enemy_then_completes_once() {
    let (world, log) = run_first_wave(Config::default());

    let spawn_ticks: Vec<u64> = log
        .iter()
        .filter(|(_, event)| matches!(event, Event::EnemySpawned { .. }))
        .map(|(tick, _)| *tick)
        .collect();
    assert_eq!(spawn_ticks, vec![1, 61, 121, 181, 241, 301]);

    let leaks = log
        .iter()
        .filter(|(_, event)| matches!(event, Event::EnemyLeaked { .. }))
        .count();
    assert_eq!(leaks, 6);

    let completions: Vec<_> = log
        .iter()
        .filter(|(_, event)| matches!(event, Event::WaveCompleted { .. }))
        .collect();
    assert_eq!(completions.len(), 1);
    assert_eq!(
        completions[0].1,
        Event::WaveCompleted {
            wave: WaveNumber::FIRST,
            gold_bonus: 50,
        }
    );

    let last_removal = log
        .iter()
        .filter(|(_, event)| matches!(event, Event::EnemyRemoved { .. }))
        .map(|(tick, _)| *tick)
        .max()
        .expect("enemies were removed");
    assert_eq!(
        completions[0].0,
        last_removal + 30,
        "completion follows thirty resolved ticks"
    );

    let economy = query::economy(&world);
    assert_eq!(economy.wave, WaveNumber::new(2));
    assert_eq!(economy.gold, 200);
    assert_eq!(economy.lives, 14);
    assert_eq!(query::wave_status(&world), WaveStatus::Idle);
}

#[test]
fn replaying_a_wave_is_deterministic() {
    let (_, first) = run_first_wave(Config::new(20, 5, 10));
    let (_, second) = run_first_wave(Config::new(20, 5, 10));
    assert_eq!(first, second);
}
