//! Scripted bouts loaded from RON files.

use std::io::Write;

use arena_runtime::{BoutScript, RuntimeError, ScriptError, Session, play};

const SCRIPT: &str = r#"(
    seed: Some(99),
    steps: [
        AdjustDamageBias(percent: 10),
        Attack(actor: 1, target: 2, move: "Punch"),
        Defend(defender: 2, move: "Nothing"),
        Defend(defender: 2, move: "Nothing"),
        Reset,
        Surrender(actor: 1),
        Respond(accept: false),
    ],
)"#;

fn write_script(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write script");
    file
}

#[test]
fn bout_from_file_records_rejections_and_carries_on() {
    let file = write_script(SCRIPT);
    let script = BoutScript::load(file.path()).expect("script loads");
    let mut session = Session::standard(script.seed.unwrap_or_default()).expect("session");

    let report = play(&mut session, &script, false).expect("bout plays");

    assert_eq!(report.applied, 6);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].0, 3);
    assert!(report.rejected[0].1.contains("no defense is pending"));
    assert_eq!(report.lines, session.transcript());
    // declined surrender hands the turn back to the surrenderer
    assert!(session.state().pending.is_none());
    assert_eq!(session.state().current_actor(), arena_core::FighterId(0));
    assert!(!session.state().is_game_over());
}

#[test]
fn stop_on_rejection_halts_at_the_first_failure() {
    let script = BoutScript::parse(SCRIPT).expect("script parses");
    let mut session = Session::standard(99).expect("session");

    let report = play(&mut session, &script, true).expect("bout plays");

    assert_eq!(report.applied, 3);
    assert_eq!(report.rejected.len(), 1);
    // the reset never ran, so the attack is still in the log
    assert!(report.lines.iter().any(|line| line.contains("Punch")));
}

#[test]
fn unresolvable_script_applies_nothing() {
    let script = BoutScript::parse(
        r#"(steps: [
            AdjustDamageBias(percent: 25),
            Attack(actor: 1, target: 9, move: "Punch"),
        ])"#,
    )
    .expect("script parses");
    let mut session = Session::standard(1).expect("session");
    let before = session.battle().clone();

    let err = play(&mut session, &script, false).expect_err("slot 9 does not exist");
    assert!(matches!(
        err,
        RuntimeError::Script(ScriptError::UnknownFighter {
            step: 1,
            fighter: 9
        })
    ));
    assert_eq!(session.battle(), &before);
}

#[test]
fn missing_script_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = BoutScript::load(&dir.path().join("absent.ron")).expect_err("no file");
    assert!(matches!(err, ScriptError::Io(_)));
}
