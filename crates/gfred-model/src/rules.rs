//! Entity-local validation rules.
//!
//! Each entity type checks only what it can see on its own. Rules that need
//! the whole mission (duplicate names, wing members, asset existence) live in
//! the validation engine.

use crate::mission::{MissionEvent, MissionGoal, MissionObject, Wing};
use crate::result::ValidationResult;

/// Largest wing the game engine supports.
pub const MAX_WING_SIZE: usize = 6;

/// Entity validation capability.
///
/// `None` means the entity has no validation logic; callers treat that as an
/// empty, valid result.
pub trait Validate {
    fn validate(&self) -> Option<ValidationResult>;
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

impl Validate for MissionObject {
    fn validate(&self) -> Option<ValidationResult> {
        if !self.kind.requires_ship_class() {
            return None;
        }

        let mut result = ValidationResult::valid();
        if self.name.trim().is_empty() {
            result.add_error(format!("{} {} has no name", self.kind.label(), self.id));
        }
        if is_blank(self.ship_class.as_deref()) {
            result.add_error(format!(
                "{} {} has no ship class",
                self.kind.label(),
                self.id
            ));
        }
        Some(result)
    }
}

impl Validate for Wing {
    fn validate(&self) -> Option<ValidationResult> {
        let mut result = ValidationResult::valid();
        if self.name.trim().is_empty() {
            result.add_error(format!("Wing {} has no name", self.id));
        }
        if self.members.is_empty() {
            result.add_warning(format!("Wing {} has no members", self.id));
        } else if self.members.len() > MAX_WING_SIZE {
            result.add_warning(format!(
                "Wing {} has {} members (maximum {})",
                self.id,
                self.members.len(),
                MAX_WING_SIZE
            ));
        }
        Some(result)
    }
}

impl Validate for MissionEvent {
    fn validate(&self) -> Option<ValidationResult> {
        let mut result = ValidationResult::valid();
        if self.name.trim().is_empty() {
            result.add_error("Event has no name");
        }
        if is_blank(self.condition.as_deref()) {
            result.add_error(format!("Event '{}' has no condition", self.name));
        }
        if self.repeat_count == 0 {
            result.add_warning(format!(
                "Event '{}' has a repeat count of 0 and will never fire",
                self.name
            ));
        }
        if self.interval < 0 {
            result.add_error(format!(
                "Event '{}' has a negative interval ({})",
                self.name, self.interval
            ));
        }
        Some(result)
    }
}

impl Validate for MissionGoal {
    fn validate(&self) -> Option<ValidationResult> {
        let mut result = ValidationResult::valid();
        if self.name.trim().is_empty() {
            result.add_error(format!("{} goal has no name", self.goal_type.label()));
        }
        if is_blank(self.condition.as_deref()) {
            result.add_error(format!("Goal '{}' has no condition", self.name));
        }
        if is_blank(self.message.as_deref()) {
            result.add_warning(format!("Goal '{}' has no message", self.name));
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::{GoalType, ObjectKind};

    #[test]
    fn test_ship_without_class_is_error() {
        let ship = MissionObject::new("alpha-1", ObjectKind::Ship);
        let result = ship.validate().unwrap();
        assert_eq!(result.errors, vec!["Ship alpha-1 has no ship class"]);
    }

    #[test]
    fn test_waypoint_has_no_rules() {
        let waypoint = MissionObject::new("wp-1", ObjectKind::Waypoint);
        assert!(waypoint.validate().is_none());
    }

    #[test]
    fn test_oversized_wing_warns() {
        let mut wing = Wing::new("Alpha");
        for i in 0..=MAX_WING_SIZE {
            wing = wing.with_member(format!("alpha-{i}"));
        }
        let result = wing.validate().unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_event_rules() {
        let mut event = MissionEvent::new("Loop");
        event.repeat_count = 0;
        event.interval = -5;
        let result = event.validate().unwrap();
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_goal_without_message_warns() {
        let goal = MissionGoal::new("Destroy", GoalType::Primary).with_condition("(true)");
        let result = goal.validate().unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warnings, vec!["Goal 'Destroy' has no message"]);
    }
}
