//! Root and container dispatch

use super::attributes::Attributes;
use super::roster::{Collection, Roster};
use super::{crew, entity, links, ReaderEnv};
use crate::document::Element;

/// Route the root element. An unrecognized root yields a roster holding only a fatal diagnostic.
pub fn read_root(root: &Element, env: &ReaderEnv) -> Roster {
    let mut roster = Roster::new();

    let recognized = root.is("record") || root.is("unit") || root.is("entity");
    if !recognized {
        roster
            .diagnostics
            .fatal("Root element isn't a Record, Unit, or Entity tag! Nothing to parse!");
        return roster;
    }

    if root.is_blank("version") {
        roster
            .diagnostics
            .warn("No version specified, correct parsing not guaranteed!");
    }

    if root.is("record") {
        read_record(root, env, &mut roster);
    } else if root.is("unit") {
        read_unit_container(root, Collection::Primary, env, &mut roster);
    } else {
        read_entity_into(root, Collection::Primary, env, &mut roster);
    }
    roster
}

fn read_record(record: &Element, env: &ReaderEnv, roster: &mut Roster) {
    for child in record.children() {
        if let Some(collection) = Collection::from_tag(child.name()) {
            read_unit_container(child, collection, env, roster);
        } else if child.is("kills") {
            links::read_kills(child, &mut roster.kills);
        } else if child.is("entity") {
            read_entity_into(child, Collection::Primary, env, roster);
        } else if child.is("pilot") || child.is("crew") {
            read_loose_crew(child, env, roster);
        }
    }
}

/// A unit container: entities plus any loose pilot or crew records
fn read_unit_container(
    container: &Element,
    collection: Collection,
    env: &ReaderEnv,
    roster: &mut Roster,
) {
    for child in container.children() {
        if child.is("entity") {
            read_entity_into(child, collection, env, roster);
        } else if child.is("pilot") || child.is("crew") {
            read_loose_crew(child, env, roster);
        }
    }
}

fn read_entity_into(
    element: &Element,
    collection: Collection,
    env: &ReaderEnv,
    roster: &mut Roster,
) {
    if let Some(unit) = entity::read_entity(element, env, &mut roster.diagnostics) {
        roster.collection_mut(collection).push(unit);
    }
}

fn read_loose_crew(element: &Element, env: &ReaderEnv, roster: &mut Roster) {
    let crew = if element.is("pilot") {
        crew::read_loose_pilot(element, env, &mut roster.diagnostics)
    } else {
        crew::read_loose_crew(element, env, &mut roster.diagnostics)
    };
    roster.pilots.push(crew);
}
