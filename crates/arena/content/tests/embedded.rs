use std::fs;

use arena_content::{ContentFactory, standard_catalog, standard_config, standard_roster};
use arena_core::state::Roster;
use arena_core::{CombatConfig, MoveOracle, Race};

#[test]
fn standard_content_loads() {
    let catalog = standard_catalog().expect("embedded moves parse");
    let roster = standard_roster(&catalog).expect("embedded roster parses");
    let config = standard_config().expect("embedded config parses");

    assert_eq!(config, CombatConfig::default());
    assert_eq!(roster.len(), CombatConfig::MAX_COMBATANTS);
    assert_eq!(roster.iter().filter(|f| !f.auto_skip).count(), 3);
    assert_eq!(roster[2].race, Race::InfiniteKiAndroid);

    let built = Roster::build(roster, &catalog).expect("roster builds");
    assert_eq!(built.active().count(), 3);
}

#[test]
fn armor_grants_resolve_to_catalog_moves() {
    let catalog = standard_catalog().expect("embedded moves parse");
    let armor = catalog
        .lookup("Heavy Dragon Armor")
        .and_then(|id| catalog.definition(id))
        .expect("armor defined");
    let grant = armor.grants().first().expect("one grant");
    assert_eq!(
        catalog.definition(grant.move_id).map(|def| def.name.as_str()),
        Some("Dragon Rage")
    );
}

#[test]
fn factory_reads_data_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("moves.ron"),
        r#"(moves: [
            (name: "Punch", category: Basic, effects: [Damage((percent: Some(0.03)))]),
            (name: "Block", category: Defense, effects: [Defense(Block(()))]),
        ])"#,
    )
    .expect("write moves");
    fs::write(
        dir.path().join("roster.ron"),
        r#"(fighters: [
            (name: "A", base_power: 100, moves: ["Punch", "Block"]),
            (name: "B", base_power: 100, moves: ["Punch"]),
        ])"#,
    )
    .expect("write roster");
    fs::write(dir.path().join("config.toml"), "chance_cap = 0.75\n").expect("write config");

    let factory = ContentFactory::new(dir.path());
    let catalog = factory.load_moves().expect("moves");
    let roster = factory.load_roster(&catalog).expect("roster");
    let config = factory.load_config().expect("config");

    assert_eq!(catalog.len(), 2);
    assert_eq!(roster[0].moves.len(), 2);
    assert_eq!(config.chance_cap, 0.75);
    assert_eq!(config.dodge_base, CombatConfig::DEFAULT_DODGE_BASE);
}
