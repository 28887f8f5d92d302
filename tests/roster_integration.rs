//! Roster reader integration tests
//!
//! These tests read whole documents against the shipped data/ catalogs and
//! check what comes out: the collections units land in, the damage and crew
//! state restored onto them, and the diagnostics left behind.

use std::path::Path;

use muster::catalog::{Catalogs, UnitSource};
use muster::core::types::MountId;
use muster::model::{ArmorValue, Gender, UnitKind};
use muster::{Collection, MusterError, ReaderConfig, Roster, RosterReader};

fn data_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn catalogs() -> Catalogs {
    Catalogs::load_directory(&data_dir()).expect("data catalogs should load")
}

fn read(xml: &str) -> Roster {
    let catalogs = catalogs();
    let config = ReaderConfig::default();
    RosterReader::new(&catalogs, &config)
        .read_str(xml)
        .expect("document should read")
}

/// Wrap entity elements in a versioned record's unit container
fn record(entities: &str) -> String {
    format!("<record version=\"0.49.19\"><unit>{}</unit></record>", entities)
}

// === DOCUMENT LEVEL ===

#[test]
fn test_sample_lance_document() {
    let catalogs = catalogs();
    let config = ReaderConfig::default();
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("samples/lance.xml");
    let roster = RosterReader::new(&catalogs, &config)
        .read_file(&path)
        .expect("sample should read");

    assert!(!roster.diagnostics.has_fatal());
    assert_eq!(roster.collection(Collection::Primary).len(), 3);
    assert_eq!(roster.collection(Collection::Survivors).len(), 1);
    assert_eq!(roster.collection(Collection::Salvage).len(), 1);
    assert_eq!(roster.unit_count(), 5);
    assert_eq!(roster.pilots.len(), 1);
    assert_eq!(roster.kills.len(), 2);

    let locust = &roster.collection(Collection::Primary)[0];
    assert_eq!(locust.short_name(), "Locust LCT-1V");
    assert!(locust.commander);
    assert_eq!(locust.force.as_deref(), Some("Alpha Lance|1"));
    assert!(locust.location(2).unwrap().is_destroyed());

    let pilot = locust.crew.as_ref().unwrap().member(0).unwrap();
    assert_eq!(pilot.name, "Jeremiah Rose");
    assert_eq!(pilot.nickname, "Wolf");
    assert_eq!(pilot.gunnery, 3);
    assert_eq!(pilot.piloting, 4);
    assert_eq!(pilot.hits, 1);

    let loose = &roster.pilots[0];
    assert_eq!(loose.member(0).unwrap().gender, Gender::Female);
}

#[test]
fn test_unrecognized_root_is_an_error() {
    let catalogs = catalogs();
    let config = ReaderConfig::default();
    let result = RosterReader::new(&catalogs, &config).read_str("<roster version=\"1\"/>");
    assert!(matches!(result, Err(MusterError::UnrecognizedRoot(name)) if name == "roster"));
}

#[test]
fn test_malformed_document_is_an_error() {
    let catalogs = catalogs();
    let config = ReaderConfig::default();
    let result = RosterReader::new(&catalogs, &config).read_str("<record><unit></record>");
    assert!(matches!(result, Err(MusterError::Document(_))));
}

#[test]
fn test_missing_version_warns_but_reads() {
    let roster = read("<record><unit><entity chassis=\"Locust\" model=\"LCT-1V\"/></unit></record>");
    assert_eq!(roster.unit_count(), 1);
    assert!(roster
        .warning_text()
        .contains("No version specified, correct parsing not guaranteed!"));
}

#[test]
fn test_unknown_unit_skipped_with_diagnostic() {
    let roster = read(&record(
        "<entity chassis=\"Atlas\" model=\"AS7-D\"/><entity chassis=\"Locust\" model=\"LCT-1V\"/>",
    ));
    assert_eq!(roster.unit_count(), 1);
    let text = roster.warning_text();
    assert!(text.contains("Could not find Entity with chassis: Atlas, and model: AS7-D."));
    assert!(text.contains("Failed to load entity!"));
}

#[test]
fn test_collections_route_by_container() {
    let xml = "<record version=\"1\">\
        <unit><entity chassis=\"Locust\" model=\"LCT-1V\"/></unit>\
        <allies><entity chassis=\"Locust\" model=\"LCT-1V\"/></allies>\
        <retreated><entity chassis=\"Minotaur\" model=\"PM-1\"/></retreated>\
        <devastated><entity chassis=\"Shilone\" model=\"SL-17\"/></devastated>\
        </record>";
    let roster = read(xml);
    assert_eq!(roster.collection(Collection::Primary).len(), 1);
    assert_eq!(roster.collection(Collection::Allies).len(), 1);
    assert_eq!(roster.collection(Collection::Retreated).len(), 1);
    assert_eq!(roster.collection(Collection::Devastated).len(), 1);
    assert_eq!(roster.unit_count(), 4);
}

#[test]
fn test_kills_last_write_wins() {
    let xml = "<record version=\"1\"><kills>\
        <kill killed=\"u1\" killer=\"k1\"/>\
        <kill killed=\"u1\" killer=\"k2\"/>\
        </kills></record>";
    let roster = read(xml);
    assert_eq!(roster.kills.len(), 1);
    assert_eq!(roster.kills.get("u1").map(String::as_str), Some("k2"));
}

// === LOCATIONS AND CRITICALS ===

/// Fresh Locust as the template builds it
fn fresh_locust() -> muster::model::Unit {
    let catalogs = catalogs();
    let template = catalogs.find("Locust LCT-1V").expect("Locust template");
    catalogs.instantiate(template).expect("Locust instantiates")
}

#[test]
fn test_destroyed_location_with_empty_slot() {
    // Right arm slot 4 holds a machine gun; declaring it Empty must not change it
    let roster = read(&record(
        "<entity chassis=\"Locust\" model=\"LCT-1V\">\
            <location index=\"4\" isDestroyed=\"true\">\
                <slot index=\"4\" type=\"Empty\" isHit=\"true\" isRepairable=\"false\"/>\
            </location>\
        </entity>",
    ));

    assert!(!roster.diagnostics.has_fatal());
    let locust = &roster.collection(Collection::Primary)[0];
    let arm = locust.location(4).unwrap();
    assert!(arm.is_destroyed());
    assert_eq!(arm.armor, ArmorValue::Destroyed);

    let mut expected = fresh_locust();
    expected.destroy_location(4);
    assert_eq!(locust.mount_at(4, 3), Some(MountId(1)));
    assert_eq!(locust.critical(4, 3), expected.critical(4, 3));
    let gun = locust.mount(MountId(1)).unwrap();
    assert_eq!(gun.internal_name(), "ISMachine Gun");
    assert!(gun.destroyed);
    assert!(!gun.hit);
    assert!(gun.repairable);
}

#[test]
fn test_empty_declaration_leaves_occupied_slot() {
    let roster = read(&record(
        "<entity chassis=\"Locust\" model=\"LCT-1V\">\
            <location index=\"4\"><slot index=\"4\" type=\"Empty\" isHit=\"true\"/></location>\
        </entity>",
    ));

    assert!(roster.diagnostics.is_empty(), "{}", roster.warning_text());
    let locust = &roster.collection(Collection::Primary)[0];
    let fresh = fresh_locust();
    assert_eq!(locust.critical(4, 3), fresh.critical(4, 3));
    let gun = locust.mount(MountId(1)).unwrap();
    let template_gun = fresh.mount(MountId(1)).unwrap();
    assert_eq!(gun.internal_name(), template_gun.internal_name());
    assert_eq!((gun.hit, gun.destroyed), (false, false));
    assert_eq!(gun.linked, template_gun.linked);
}

#[test]
fn test_destroyed_location_ignores_later_armor() {
    // Destruction holds whichever order the children arrive in
    let roster = read(&record(
        "<entity chassis=\"Locust\" model=\"LCT-1V\">\
            <location index=\"3\" isDestroyed=\"true\"><armor points=\"5\"/></location>\
        </entity>",
    ));
    let locust = &roster.collection(Collection::Primary)[0];
    let torso = locust.location(3).unwrap();
    assert!(torso.is_destroyed());
    assert_eq!(torso.armor, ArmorValue::Destroyed);
    assert_eq!(roster.diagnostics.len(), 1);
}

#[test]
fn test_armor_above_starting_value_rejected() {
    let roster = read(&record(
        "<entity chassis=\"Locust\" model=\"LCT-1V\">\
            <location index=\"0\"><armor points=\"9\"/><armor points=\"2\" type=\"Internal\"/></location>\
        </entity>",
    ));
    let locust = &roster.collection(Collection::Primary)[0];
    let head = locust.location(0).unwrap();
    assert_eq!(head.armor, ArmorValue::Points(8));
    assert_eq!(head.internal, ArmorValue::Points(2));
    assert!(roster
        .warning_text()
        .contains("does not start with 9 points of armor for location: 0"));
}

#[test]
fn test_rear_armor_only_where_present() {
    let roster = read(&record(
        "<entity chassis=\"Locust\" model=\"LCT-1V\">\
            <location index=\"1\"><armor points=\"1\" type=\"Rear\"/></location>\
            <location index=\"4\"><armor points=\"1\" type=\"Rear\"/></location>\
        </entity>",
    ));
    let locust = &roster.collection(Collection::Primary)[0];
    assert_eq!(locust.armor(1, true), Some(ArmorValue::Points(1)));
    assert!(roster.warning_text().contains("has no rear armor for location: 4"));
}

#[test]
fn test_ammo_swap_and_shots() {
    let roster = read(&record(
        "<entity chassis=\"Locust\" model=\"LCT-1V\">\
            <location index=\"1\"><slot index=\"12\" type=\"ISMG Ammo (200)\" shots=\"60\"/></location>\
        </entity>",
    ));
    assert!(roster.diagnostics.is_empty());
    let locust = &roster.collection(Collection::Primary)[0];
    let bin = locust.mount(MountId(3)).unwrap();
    assert_eq!(bin.internal_name(), "ISMG Ammo (200)");
    assert_eq!(bin.shots_left, 60);
}

#[test]
fn test_unknown_ammo_type_leaves_bin_alone() {
    let roster = read(&record(
        "<entity chassis=\"Locust\" model=\"LCT-1V\">\
            <location index=\"1\"><slot index=\"12\" type=\"X\" shots=\"10\"/></location>\
        </entity>",
    ));
    assert_eq!(roster.diagnostics.len(), 1);
    let locust = &roster.collection(Collection::Primary)[0];
    assert_eq!(locust.mount(MountId(3)).unwrap().internal_name(), "ISMG Ammo (100)");
}

#[test]
fn test_slot_damage_flags() {
    let roster = read(&record(
        "<entity chassis=\"Locust\" model=\"LCT-1V\">\
            <location index=\"4\"><slot index=\"4\" type=\"ISMachine Gun\" isHit=\"true\" isRepairable=\"false\"/></location>\
        </entity>",
    ));
    assert!(roster.diagnostics.is_empty());
    let locust = &roster.collection(Collection::Primary)[0];
    let gun = locust.mount(MountId(1)).unwrap();
    assert!(gun.hit);
    assert!(gun.destroyed);
    assert!(!gun.repairable);
    let crit = locust.critical(4, 3).unwrap();
    assert!(crit.hit);
}

#[test]
fn test_slot_type_mismatch_reported() {
    let roster = read(&record(
        "<entity chassis=\"Locust\" model=\"LCT-1V\">\
            <location index=\"1\"><slot index=\"11\" type=\"ISPPC\"/></location>\
        </entity>",
    ));
    assert!(roster
        .warning_text()
        .contains("XML file expects ISPPC equipment at index 10 of location 1, but Entity has ISMediumLaser there."));
}

#[test]
fn test_slotless_ammo_binds_in_order() {
    let roster = read(&record(
        "<entity chassis=\"Minotaur\" model=\"PM-1\">\
            <location index=\"1\">\
                <slot index=\"N/A\" type=\"ProtoMechLRM3 Ammo\" shots=\"7\"/>\
                <slot index=\"N/A\" type=\"ProtoMechSRM4 Ammo\" shots=\"2\"/>\
                <slot index=\"N/A\" type=\"ProtoMechSRM4 Ammo\" shots=\"1\"/>\
            </location>\
        </entity>",
    ));
    let proto = &roster.collection(Collection::Primary)[0];
    assert_eq!(proto.kind, UnitKind::Protomech);
    assert_eq!(proto.mount(MountId(1)).unwrap().shots_left, 7);
    assert_eq!(proto.mount(MountId(3)).unwrap().shots_left, 2);
    assert_eq!(roster.diagnostics.len(), 1);
    assert!(roster.warning_text().contains("has no more ammo in location 1"));
}

// === CREW ===

#[test]
fn test_class_gunnery_averages_down() {
    let roster = read(&record(
        "<entity chassis=\"Minotaur\" model=\"PM-1\">\
            <pilot gunneryL=\"4\" gunneryM=\"4\" gunneryB=\"5\" piloting=\"5\"/>\
        </entity>",
    ));
    let pilot = roster.collection(Collection::Primary)[0]
        .crew
        .as_ref()
        .unwrap()
        .member(0)
        .unwrap()
        .clone();
    assert_eq!(pilot.gunnery, 4);
    assert_eq!((pilot.gunnery_l, pilot.gunnery_m, pilot.gunnery_b), (4, 4, 5));
}

#[test]
fn test_vehicle_crew_and_motive() {
    let roster = read(&record(
        "<entity chassis=\"Manticore Heavy Tank\">\
            <crew crewType=\"Single\" size=\"5\" currentsize=\"4\">\
                <crewMember slot=\"0\" gunnery=\"4\" piloting=\"5\" name=\"Amy Carrow\"/>\
            </crew>\
            <motive damage=\"4\" penalty=\"2\"/>\
        </entity>",
    ));
    assert!(roster.diagnostics.is_empty());
    let tank = &roster.collection(Collection::Primary)[0];
    let crew = tank.crew.as_ref().unwrap();
    assert_eq!(crew.size, 5);
    assert_eq!(crew.current_size, 4);
    assert_eq!(crew.member(0).unwrap().name, "Amy Carrow");

    let vehicle = tank.vehicle.as_ref().unwrap();
    assert_eq!(vehicle.motive_damage, 4);
    assert_eq!(vehicle.motive_penalty, 2);
}

#[test]
fn test_tag_without_system_reported() {
    let roster = read(&record(
        "<entity chassis=\"Locust\" model=\"LCT-1V\"><motive damage=\"1\" penalty=\"1\"/></entity>",
    ));
    assert_eq!(roster.unit_count(), 1);
    assert!(roster
        .warning_text()
        .contains("The entity, Locust LCT-1V has no use for a motive tag."));
}

#[test]
fn test_documents_read_in_parallel() {
    use rayon::prelude::*;

    let catalogs = catalogs();
    let config = ReaderConfig::default();
    let reader = RosterReader::new(&catalogs, &config);
    let docs: Vec<String> = (0..8)
        .map(|i| record(&format!("<entity chassis=\"Locust\" model=\"LCT-1V\" externalId=\"u{}\"/>", i)))
        .collect();

    let rosters: Vec<Roster> = docs
        .par_iter()
        .map(|xml| reader.read_str(xml).unwrap())
        .collect();
    assert_eq!(rosters.len(), 8);
    assert!(rosters.iter().all(|r| r.unit_count() == 1));
    assert_eq!(rosters[5].collection(Collection::Primary)[0].external_id, "u5");
}
