//! Entity rules, mission structure and wing membership.

use std::collections::BTreeMap;

use gfred_model::{EntityKind, ObjectKind, Validate, entity_key, fingerprint};
use serde::Serialize;

use super::PassContext;
use crate::cache::ValidationCache;
use crate::graph::{DependencyInfo, DependencyType};

pub(super) fn run(ctx: &mut PassContext<'_>) {
    let mission = ctx.mission;

    for object in mission.objects() {
        validate_entity(ctx, &object.key(), object);
    }
    for wing in mission.wings() {
        validate_entity(ctx, &wing.key(), wing);
    }
    for event in mission.events() {
        validate_entity(ctx, &event.key(), event);
    }
    for goal in mission.goals() {
        validate_entity(ctx, &goal.key(), goal);
    }

    check_duplicates(ctx);
    check_wing_members(ctx);
}

/// Run the entity's own rules, reusing a cached result for unchanged content.
fn validate_entity<T>(ctx: &mut PassContext<'_>, key: &str, entity: &T)
where
    T: Validate + Serialize,
{
    let result = match fingerprint(entity) {
        Ok(fingerprint) => {
            let cache_key = ValidationCache::key(key, &fingerprint);
            match ctx.cache.get(&cache_key).cloned() {
                Some(hit) => {
                    tracing::trace!(entity = key, "cache hit");
                    hit
                }
                None => {
                    let result = entity.validate().unwrap_or_default();
                    ctx.cache.put(cache_key, result.clone());
                    result
                }
            }
        }
        Err(error) => {
            tracing::warn!(entity = key, %error, "cannot fingerprint entity, skipping cache");
            entity.validate().unwrap_or_default()
        }
    };
    ctx.entity_result(key).merge(result);
}

fn duplicates<'m>(names: impl Iterator<Item = &'m str>) -> Vec<&'m str> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut order = Vec::new();
    for name in names {
        let count = counts.entry(name).or_default();
        *count += 1;
        if *count == 2 {
            order.push(name);
        }
    }
    order
}

fn check_duplicates(ctx: &mut PassContext<'_>) {
    let mission = ctx.mission;

    for id in duplicates(mission.objects().iter().map(|o| o.id.as_str())) {
        ctx.mission_result
            .add_error(format!("Duplicate object id '{id}'"));
    }
    for name in duplicates(
        mission
            .events()
            .iter()
            .map(|e| e.name.as_str())
            .filter(|n| !n.trim().is_empty()),
    ) {
        ctx.mission_result
            .add_error(format!("Duplicate event name '{name}'"));
    }
    for name in duplicates(
        mission
            .goals()
            .iter()
            .map(|g| g.name.as_str())
            .filter(|n| !n.trim().is_empty()),
    ) {
        ctx.mission_result
            .add_error(format!("Duplicate goal name '{name}'"));
    }
}

/// Wing members must be ships placed in the mission.
fn check_wing_members(ctx: &mut PassContext<'_>) {
    let mission = ctx.mission;

    for wing in mission.wings() {
        let owner = wing.key();
        for member in &wing.members {
            match mission.object(member) {
                Some(object) => {
                    if object.kind != ObjectKind::Ship {
                        ctx.entity_result(&owner).add_error(format!(
                            "Wing {} member '{}' is a {}, not a ship",
                            wing.id,
                            member,
                            object.kind.label().to_lowercase()
                        ));
                    }
                    ctx.depend(
                        &owner,
                        DependencyInfo::new(&owner, DependencyType::ObjectReference, object.key()),
                    );
                }
                None => {
                    let message = format!("Wing {} member '{}' does not exist", wing.id, member);
                    ctx.entity_result(&owner).add_error(message.clone());
                    ctx.depend(
                        &owner,
                        DependencyInfo::new(
                            &owner,
                            DependencyType::ObjectReference,
                            entity_key(EntityKind::Object, member),
                        )
                        .invalid(message),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_reported_once_in_first_seen_order() {
        let names = ["b", "a", "b", "a", "b", "c"];
        assert_eq!(duplicates(names.into_iter()), vec!["b", "a"]);
    }
}
