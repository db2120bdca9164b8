use quiz_defence_core::{CellCoord, Command, Event, PlacementError, TowerKind, WaveNumber};
use quiz_defence_system_builder::{Builder, PendingBuild};

fn accept(_: TowerKind, _: CellCoord) -> Result<(), PlacementError> {
    Ok(())
}

#[test]
fn correct_answer_emits_place_command() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    let pending = builder
        .request(TowerKind::Basic, CellCoord::new(2, 2), accept)
        .expect("request accepted");
    assert_eq!(pending, PendingBuild::new(TowerKind::Basic, CellCoord::new(2, 2)));

    let resolved = builder.resolve(true, &mut commands);

    assert_eq!(resolved, Some(pending));
    assert_eq!(
        commands,
        vec![Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: CellCoord::new(2, 2),
        }],
        "builder should emit a placement command when the quiz is passed",
    );
    assert_eq!(builder.pending(), None);
}

#[test]
fn wrong_answer_cancels_without_commands() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();

    let _ = builder
        .request(TowerKind::Sniper, CellCoord::new(6, 6), accept)
        .expect("request accepted");
    let resolved = builder.resolve(false, &mut commands);

    assert!(resolved.is_some());
    assert!(commands.is_empty(), "failed quiz must not place a tower");
    assert_eq!(builder.pending(), None);
}

#[test]
fn validation_failure_leaves_no_pending_request() {
    let mut builder = Builder::new();

    let result = builder.request(TowerKind::Basic, CellCoord::new(0, 1), |_, _| {
        Err(PlacementError::OnPath)
    });

    assert_eq!(result, Err(PlacementError::OnPath));
    assert_eq!(builder.pending(), None);
}

#[test]
fn second_request_is_rejected_while_quiz_pending() {
    let mut builder = Builder::new();

    let _ = builder
        .request(TowerKind::Basic, CellCoord::new(2, 2), accept)
        .expect("request accepted");
    let second = builder.request(TowerKind::Basic, CellCoord::new(3, 3), accept);

    assert_eq!(second, Err(PlacementError::QuizPending));
    assert_eq!(
        builder.pending(),
        Some(PendingBuild::new(TowerKind::Basic, CellCoord::new(2, 2)))
    );
}

#[test]
fn abandon_releases_the_gate() {
    let mut builder = Builder::new();
    let mut commands = Vec::new();

    let _ = builder
        .request(TowerKind::Basic, CellCoord::new(2, 2), accept)
        .expect("request accepted");
    assert!(builder.abandon().is_some());
    assert!(builder.resolve(true, &mut commands).is_none());
    assert!(commands.is_empty());

    assert!(builder
        .request(TowerKind::Basic, CellCoord::new(3, 3), accept)
        .is_ok());
}

#[test]
fn reset_and_game_over_discard_pending_request() {
    for event in [
        Event::WorldReset,
        Event::GameOver {
            wave: WaveNumber::FIRST,
        },
    ] {
        let mut builder = Builder::new();
        let _ = builder
            .request(TowerKind::Basic, CellCoord::new(2, 2), accept)
            .expect("request accepted");

        builder.handle(&[event]);

        assert_eq!(builder.pending(), None);
    }
}
