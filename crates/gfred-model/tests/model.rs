//! Integration tests for mission loading and entity rules.

use gfred_model::{
    GoalType, Mission, MissionEvent, MissionGoal, MissionObject, MissionProvider, ObjectKind,
    Validate, ValidationResult, Wing, fingerprint, parse_mission,
};

const MISSION_JSON: &str = r#"{
  "name": "Training 1",
  "objects": [
    {"id": "alpha-1", "name": "Alpha 1", "kind": "ship", "ship_class": "GTF Ulysses", "team": "Friendly"},
    {"id": "crate-1", "name": "Crate", "kind": "cargo"},
    {"id": "nav-1", "kind": "waypoint"}
  ],
  "wings": [
    {"id": "alpha", "name": "Alpha", "members": ["alpha-1"]}
  ],
  "events": [
    {"name": "Arrival", "condition": "(has-arrived-delay 0 \"Alpha 1\")", "repeat_count": 0}
  ],
  "goals": [
    {"name": "Survive", "goal_type": "secondary", "condition": "(true)"}
  ]
}"#;

fn validate_all(mission: &Mission) -> Vec<(String, ValidationResult)> {
    let mut results = Vec::new();
    for object in mission.objects() {
        results.push((object.key(), object.validate().unwrap_or_default()));
    }
    for wing in mission.wings() {
        results.push((wing.key(), wing.validate().unwrap_or_default()));
    }
    for event in mission.events() {
        results.push((event.key(), event.validate().unwrap_or_default()));
    }
    for goal in mission.goals() {
        results.push((goal.key(), goal.validate().unwrap_or_default()));
    }
    results
}

#[test]
fn test_exported_mission_rules() {
    let mission = parse_mission(MISSION_JSON).unwrap();
    assert_eq!(mission.entity_count(), 6);
    assert_eq!(mission.goals[0].goal_type, GoalType::Secondary);

    let results = validate_all(&mission);
    let errors: Vec<String> = results
        .iter()
        .flat_map(|(key, result)| result.errors.iter().map(move |e| format!("{key}: {e}")))
        .collect();
    assert_eq!(errors, vec!["object:crate-1: Cargo crate-1 has no ship class"]);

    let warnings: Vec<&str> = results
        .iter()
        .flat_map(|(_, result)| result.warnings.iter().map(String::as_str))
        .collect();
    assert_eq!(
        warnings,
        vec![
            "Event 'Arrival' has a repeat count of 0 and will never fire",
            "Goal 'Survive' has no message",
        ]
    );
}

#[test]
fn test_waypoint_name_defaults_to_empty_without_error() {
    let mission = parse_mission(MISSION_JSON).unwrap();
    let waypoint = mission.object("nav-1").unwrap();
    assert!(waypoint.name.is_empty());
    assert!(waypoint.validate().is_none());
}

#[test]
fn test_json_round_trip_keeps_fingerprints() {
    let mission = Mission::new("Round trip")
        .with_object(MissionObject::new("alpha-1", ObjectKind::Ship).with_ship_class("GTF Ulysses"))
        .with_wing(Wing::new("Alpha").with_member("alpha-1"))
        .with_event(MissionEvent::new("Arrival").with_condition("(true)"))
        .with_goal(MissionGoal::new("Survive", GoalType::Primary).with_condition("(true)"));

    let json = serde_json::to_string(&mission).unwrap();
    let reloaded = parse_mission(&json).unwrap();

    assert_eq!(reloaded, mission);
    for (before, after) in mission.objects.iter().zip(&reloaded.objects) {
        assert_eq!(fingerprint(before).unwrap(), fingerprint(after).unwrap());
    }
}

#[test]
fn test_result_merge_keeps_order() {
    let mut result = ValidationResult::valid().with_warning("first warning");
    result.merge(
        ValidationResult::valid()
            .with_error("an error")
            .with_warning("second warning"),
    );
    assert!(!result.is_valid());
    assert_eq!(result.warnings, vec!["first warning", "second warning"]);
    assert_eq!(result.error_count(), 1);
}
