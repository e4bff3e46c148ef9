//! Scripted condition and action syntax.

use std::collections::HashMap;

use gfred_model::{ExpressionSlot, MissionObject, ValidationResult, Wing, short_hash};

use super::PassContext;
use crate::cache::ValidationCache;
use crate::collaborators::ExpressionValidator;
use crate::graph::{DependencyInfo, DependencyType};

/// Graph path of a scripted expression.
pub(crate) fn expression_path(expr: &str) -> String {
    format!("sexp:{}", short_hash(expr))
}

struct Checked {
    errors: Vec<String>,
    names: Vec<String>,
}

/// One expression attached to an event or goal.
struct Script<'m> {
    owner: String,
    label: String,
    expr: &'m str,
}

pub(super) fn run(ctx: &mut PassContext<'_>) {
    let Some(validator) = ctx.expression_validator else {
        ctx.mission_result
            .add_warning("Expression validation unavailable: no expression validator configured");
        return;
    };
    let mission = ctx.mission;

    let mut scripts = Vec::new();
    for event in mission.events() {
        for (slot, expr) in event.expressions() {
            scripts.push(Script {
                owner: event.key(),
                label: label("Event", &event.name, slot),
                expr,
            });
        }
    }
    for goal in mission.goals() {
        for (slot, expr) in goal.expressions() {
            scripts.push(Script {
                owner: goal.key(),
                label: label("Goal", &goal.name, slot),
                expr,
            });
        }
    }

    let mut checked: HashMap<&str, Checked> = HashMap::new();
    for script in &scripts {
        if !checked.contains_key(script.expr) {
            let result = check(ctx, validator, script.expr);
            checked.insert(script.expr, result);
        }
        let Some(outcome) = checked.get(script.expr) else {
            continue;
        };

        let mut info = DependencyInfo::new(
            &script.owner,
            DependencyType::SexpReference,
            expression_path(script.expr),
        );
        if let Some(first) = outcome.errors.first() {
            info = info.invalid(first.clone());
            let result = ctx.entity_result(&script.owner);
            for error in &outcome.errors {
                result.add_error(format!("{}: {error}", script.label));
            }
        }
        ctx.depend(&script.owner, info);

        for name in &outcome.names {
            for target in referenced_entities(ctx, name) {
                ctx.depend(
                    &script.owner,
                    DependencyInfo::new(&script.owner, DependencyType::ObjectReference, target),
                );
            }
        }
    }

    tracing::debug!(
        expressions = scripts.len(),
        distinct = checked.len(),
        "expressions checked"
    );
}

fn label(kind: &str, name: &str, slot: ExpressionSlot) -> String {
    format!("{kind} '{name}' {}", slot.label())
}

/// Syntax errors come from the cross-pass cache when possible.
fn check(ctx: &mut PassContext<'_>, validator: &dyn ExpressionValidator, expr: &str) -> Checked {
    let cache_key = ValidationCache::key("sexp", &short_hash(expr));
    let cached = ctx.cache.get(&cache_key).map(|hit| hit.errors.clone());
    let errors = match cached {
        Some(errors) => errors,
        None => {
            let errors = if validator.validate_syntax(expr) {
                Vec::new()
            } else {
                let errors = validator.get_errors(expr);
                if errors.is_empty() {
                    vec!["invalid expression".to_string()]
                } else {
                    errors
                }
            };
            let result = ValidationResult {
                errors: errors.clone(),
                warnings: Vec::new(),
            };
            ctx.cache.put(cache_key, result);
            errors
        }
    };

    Checked {
        errors,
        names: validator.referenced_names(expr),
    }
}

/// Keys of objects and wings whose id or name equals `name`.
fn referenced_entities(ctx: &PassContext<'_>, name: &str) -> Vec<String> {
    let mission = ctx.mission;
    let objects = mission
        .objects()
        .iter()
        .filter(|o| o.id == name || o.name == name)
        .map(MissionObject::key);
    let wings = mission
        .wings()
        .iter()
        .filter(|w| w.id == name || w.name == name)
        .map(Wing::key);

    let mut keys: Vec<String> = Vec::new();
    for key in objects.chain(wings) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_path_is_stable() {
        let path = expression_path("(+ 1");
        assert!(path.starts_with("sexp:"));
        assert_eq!(path.len(), "sexp:".len() + 16);
        assert_eq!(path, expression_path("(+ 1"));
        assert_ne!(path, expression_path("(+ 1)"));
    }
}
