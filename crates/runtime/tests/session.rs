//! Session dispatch, observers and save/restore over the standard content.

use std::sync::{Arc, Mutex};

use arena_core::{
    AttackCommand, AttackResolution, CommandResult, DefendCommand, EndReason, FighterConfig,
    FighterId, MoveId, MoveOracle, Race, SurrenderCommand, SurrenderResponse,
};
use arena_runtime::{
    CombatObserver, ObserverContext, ObserverCriticality, ObserverError, RuntimeError, SaveError,
    Session, TranscriptObserver,
};

const F1: FighterId = FighterId(0);
const F2: FighterId = FighterId(1);

fn standard() -> Session {
    Session::standard(42).expect("standard content builds a session")
}

fn move_id(session: &Session, name: &str) -> MoveId {
    session
        .oracles()
        .catalog()
        .lookup(name)
        .unwrap_or_else(|| panic!("{name} is in the standard catalog"))
}

/// Two fighters, standard catalog, nobody else in the rotation.
fn duel(observer: Option<Arc<dyn CombatObserver>>) -> Session {
    let catalog = arena_content::standard_catalog().expect("catalog");
    let moves: Vec<MoveId> = ["Punch", "Nothing", "Skip My Turn", "Surrender"]
        .into_iter()
        .map(|name| catalog.lookup(name).expect("standard move"))
        .collect();
    let roster = vec![
        FighterConfig::new("Fighter One", Race::Human, 1000).with_moves(moves.clone()),
        FighterConfig::new("Fighter Two", Race::Saiyan, 1000).with_moves(moves),
    ];

    let mut builder = Session::builder().catalog(catalog).roster(roster).seed(7);
    if let Some(observer) = observer {
        builder = builder.observer(observer);
    }
    builder.build().expect("duel session")
}

#[test]
fn standard_session_starts_with_first_active_fighter() {
    let session = standard();
    assert_eq!(session.state().current_actor(), F1);
    assert_eq!(session.state().turn.number, 1);
    assert_eq!(session.state().roster.len(), 8);
    assert_eq!(session.state().roster.active().count(), 3);
    assert!(!session.state().is_game_over());
}

#[test]
fn builder_requires_catalog_and_roster() {
    assert!(matches!(
        Session::builder().build(),
        Err(RuntimeError::MissingCatalog)
    ));
    let catalog = arena_content::standard_catalog().expect("catalog");
    assert!(matches!(
        Session::builder().catalog(catalog).build(),
        Err(RuntimeError::MissingRoster)
    ));
}

#[test]
fn attack_then_defense_lands_damage() {
    let mut session = standard();
    let punch = move_id(&session, "Punch");
    let nothing = move_id(&session, "Nothing");

    let outcome = session
        .submit(AttackCommand::use_move(F1, F2, punch))
        .expect("attack accepted");
    assert_eq!(
        outcome.result,
        CommandResult::Attack(AttackResolution::AwaitingDefense)
    );
    assert!(session.state().pending.is_some());

    let outcome = session
        .submit(DefendCommand::new(F2, nothing))
        .expect("defense accepted");
    let CommandResult::Defense { landed } = outcome.result else {
        panic!("unexpected result {:?}", outcome.result);
    };
    assert!(landed >= 30);
    assert_eq!(session.state().fighter(F2).map(|f| f.power), Some(1000 - landed));
    assert!(session.state().pending.is_none());
    assert_eq!(session.transcript().len(), session.state().log.len());
}

#[test]
fn rejected_command_leaves_battle_untouched() {
    let mut session = standard();
    let punch = move_id(&session, "Punch");
    let before = session.battle().clone();

    let err = session
        .submit(AttackCommand::use_move(F2, F1, punch))
        .expect_err("fighter two is not the current actor");
    assert_eq!(err.error_code(), "SEQUENCE_NOT_CURRENT_ACTOR");
    assert_eq!(session.battle(), &before);
}

#[test]
fn transcript_observer_sees_every_accepted_entry() {
    let transcript = TranscriptObserver::new();
    let mut session = duel(Some(Arc::new(transcript.clone())));
    let punch = move_id(&session, "Punch");
    let nothing = move_id(&session, "Nothing");

    session
        .submit(AttackCommand::use_move(F1, F2, punch))
        .expect("attack");
    session
        .submit(DefendCommand::new(F2, nothing))
        .expect("defense");
    // rejected: nothing pending
    assert!(session.submit(DefendCommand::new(F2, nothing)).is_err());

    let lines = transcript.lines();
    assert_eq!(lines.len(), session.state().log.len());
    assert!(lines.iter().any(|line| line.contains("Punch")));
}

struct Recorder {
    seen: Mutex<Vec<(Option<&'static str>, bool)>>,
}

impl CombatObserver for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn notify(&self, ctx: &ObserverContext<'_>) -> Result<(), ObserverError> {
        let mut seen = self
            .seen
            .lock()
            .map_err(|_| ObserverError::new("poisoned"))?;
        seen.push((ctx.command.map(|c| c.label()), ctx.match_ended));
        Ok(())
    }
}

#[test]
fn observers_learn_when_the_match_ends() {
    let recorder = Arc::new(Recorder {
        seen: Mutex::new(Vec::new()),
    });
    let mut session = duel(Some(recorder.clone() as Arc<dyn CombatObserver>));

    session
        .submit(SurrenderCommand::new(F1))
        .expect("surrender attempt");
    let outcome = session
        .submit(SurrenderResponse::accept())
        .expect("surrender accepted");
    assert!(matches!(outcome.result, CommandResult::SurrenderResolved(_)));
    assert!(session.state().is_game_over());
    assert_eq!(session.state().outcome.winner, Some(F2));
    assert_eq!(
        session.state().outcome.reason,
        Some(EndReason::SurrenderAccepted)
    );

    let seen = recorder.seen.lock().expect("lock").clone();
    assert_eq!(
        seen,
        vec![
            (Some("attempt_surrender"), false),
            (Some("respond_to_surrender"), true),
        ]
    );

    session.reset().expect("reset");
    assert!(!session.state().is_game_over());
    let seen = recorder.seen.lock().expect("lock").clone();
    assert_eq!(seen.last(), Some(&(None, false)));
}

struct Failing(ObserverCriticality);

impl CombatObserver for Failing {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn criticality(&self) -> ObserverCriticality {
        self.0
    }

    fn notify(&self, _ctx: &ObserverContext<'_>) -> Result<(), ObserverError> {
        Err(ObserverError::new("boom"))
    }
}

#[test]
fn critical_observer_failure_surfaces_but_keeps_the_command() {
    let mut session = duel(Some(Arc::new(Failing(ObserverCriticality::Critical))));
    let skip = move_id(&session, "Skip My Turn");

    let err = session
        .submit(AttackCommand::use_move(F1, F1, skip))
        .expect_err("critical observer fails");
    assert!(matches!(err, RuntimeError::ObserverFailed { name: "failing", .. }));
    assert_eq!(session.state().current_actor(), F2);

    let mut session = duel(Some(Arc::new(Failing(ObserverCriticality::Optional))));
    session
        .submit(AttackCommand::use_move(F1, F1, skip))
        .expect("optional failures are swallowed");
}

#[test]
fn save_restore_brings_back_state_and_history() {
    let mut session = duel(None);
    let punch = move_id(&session, "Punch");
    let nothing = move_id(&session, "Nothing");

    session
        .submit(AttackCommand::use_move(F1, F2, punch))
        .expect("attack");
    session
        .submit(DefendCommand::new(F2, nothing))
        .expect("defense");
    let saved_battle = session.battle().clone();
    let blob = session.save().expect("save");

    let current = session.state().current_actor();
    let skip = move_id(&session, "Skip My Turn");
    session
        .submit(AttackCommand::use_move(current, current, skip))
        .expect("skip");
    assert_ne!(session.battle(), &saved_battle);

    session.restore(&blob).expect("restore");
    assert_eq!(session.battle(), &saved_battle);

    // history came back too: rollback to the opening turn still works
    let current = session.state().current_actor();
    session
        .submit(AttackCommand::use_move(current, current, skip))
        .expect("skip");
    session.rollback_to(1).expect("rollback after restore");
    assert_eq!(session.state().turn.number, 1);
    assert_eq!(session.state().fighter(F2).map(|f| f.power), Some(1000));
}

#[test]
fn tampered_save_is_rejected_and_state_kept() {
    let mut session = duel(None);
    let mut blob = session.save().expect("save");
    let middle = blob.len() / 2;
    blob[middle] ^= 0xff;
    let before = session.battle().clone();

    let err = session.restore(&blob).expect_err("tampered blob");
    assert!(matches!(
        err,
        RuntimeError::Save(SaveError::DigestMismatch { .. })
    ));
    assert_eq!(session.battle(), &before);
}

#[test]
fn restore_checks_moves_against_the_catalog() {
    let standard = standard();
    let blob = standard.save().expect("save");

    // a catalog holding only one move cannot host the standard roster
    let catalog = arena_core::StaticMoveCatalog::new(vec![arena_core::MoveDefinition::new(
        MoveId(0),
        "Punch",
        arena_core::MoveCategory::Basic,
    )])
    .expect("catalog");
    let mut small = Session::builder()
        .catalog(catalog)
        .roster(vec![FighterConfig::new("Solo", Race::Human, 100)])
        .build()
        .expect("small session");

    assert!(matches!(
        small.restore(&blob),
        Err(RuntimeError::Save(SaveError::UnknownMove { .. }))
    ));
}

#[test]
fn export_json_is_a_read_model_of_the_state() {
    let session = standard();
    let json = session.export_json().expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["seed"], 42);
    assert_eq!(value["turn"]["number"], 1);
    assert!(value["roster"].is_object());
}

#[test]
fn rollback_rejections_come_back_as_errors() {
    let mut session = standard();
    assert!(matches!(
        session.rollback_to(0),
        Err(RuntimeError::Rollback(_))
    ));
    assert!(matches!(
        session.rollback_to(5),
        Err(RuntimeError::Rollback(_))
    ));
}

#[test]
fn next_actor_follows_the_rotation() {
    let mut session = standard();
    assert_eq!(session.next_actor(), F2);

    let skip = move_id(&session, "Skip My Turn");
    session
        .submit(AttackCommand::use_move(F1, F1, skip))
        .expect("skip");
    assert_eq!(session.state().current_actor(), F2);
    assert_eq!(session.next_actor(), FighterId(2));
}

#[test]
fn oversized_history_capacity_is_clamped() {
    let catalog = arena_content::standard_catalog().expect("catalog");
    let roster = arena_content::standard_roster(&catalog).expect("roster");
    let config = arena_core::CombatConfig {
        history_capacity: 100,
        ..arena_core::CombatConfig::default()
    };
    let mut session = Session::builder()
        .config(config)
        .catalog(catalog)
        .roster(roster)
        .build()
        .expect("session");
    assert_eq!(
        session.battle().history.capacity(),
        arena_core::CombatConfig::HISTORY_LIMIT
    );

    let skip = move_id(&session, "Skip My Turn");
    for _ in 0..30 {
        let current = session.state().current_actor();
        session
            .submit(AttackCommand::use_move(current, current, skip))
            .expect("skip");
    }
    assert_eq!(
        session.battle().history.len(),
        arena_core::CombatConfig::HISTORY_LIMIT
    );
}
