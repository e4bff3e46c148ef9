//! Mission entities as exported by the editor.

use serde::{Deserialize, Serialize};

/// Kind of mission entity, used to build entity keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Mission,
    Object,
    Wing,
    Event,
    Goal,
}

impl EntityKind {
    /// Key prefix for this kind.
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Mission => "mission",
            Self::Object => "object",
            Self::Wing => "wing",
            Self::Event => "event",
            Self::Goal => "goal",
        }
    }

    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mission => "Mission",
            Self::Object => "Object",
            Self::Wing => "Wing",
            Self::Event => "Event",
            Self::Goal => "Goal",
        }
    }
}

/// Build the key identifying an entity in results and the dependency graph.
///
/// Keys look like `object:alpha-1` or `event:Arrival`.
pub fn entity_key(kind: EntityKind, id: &str) -> String {
    format!("{}:{}", kind.prefix(), id)
}

/// Kind of placed mission object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Ship,
    Cargo,
    Waypoint,
    JumpNode,
}

impl ObjectKind {
    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ship => "Ship",
            Self::Cargo => "Cargo",
            Self::Waypoint => "Waypoint",
            Self::JumpNode => "Jump Node",
        }
    }

    /// Whether objects of this kind are instances of a ship class.
    pub const fn requires_ship_class(&self) -> bool {
        matches!(self, Self::Ship | Self::Cargo)
    }
}

/// A placed object: ship, cargo container, waypoint or jump node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionObject {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub kind: ObjectKind,
    /// Ship class asset this object is an instance of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

impl MissionObject {
    /// Create an object whose display name equals its id.
    pub fn new(id: impl Into<String>, kind: ObjectKind) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            ship_class: None,
            team: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_ship_class(mut self, ship_class: impl Into<String>) -> Self {
        self.ship_class = Some(ship_class.into());
        self
    }

    #[must_use]
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn key(&self) -> String {
        entity_key(EntityKind::Object, &self.id)
    }

    /// Asset names this object needs at runtime.
    pub fn asset_references(&self) -> Vec<&str> {
        self.ship_class
            .as_deref()
            .map(str::trim)
            .filter(|class| !class.is_empty())
            .into_iter()
            .collect()
    }
}

/// A wing grouping ships that arrive and depart together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wing {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Object ids of the wing members.
    #[serde(default)]
    pub members: Vec<String>,
}

impl Wing {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_member(mut self, object_id: impl Into<String>) -> Self {
        self.members.push(object_id.into());
        self
    }

    pub fn key(&self) -> String {
        entity_key(EntityKind::Wing, &self.id)
    }
}

/// Which scripted slot of an event or goal an expression lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionSlot {
    Condition,
    Action,
}

impl ExpressionSlot {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Condition => "condition",
            Self::Action => "action",
        }
    }
}

fn default_repeat_count() -> i32 {
    1
}

fn default_interval() -> i32 {
    1
}

/// A scripted mission event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionEvent {
    pub name: String,
    /// SEXP condition that triggers the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// SEXP action run when the event fires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Times the event may fire; -1 repeats forever.
    #[serde(default = "default_repeat_count")]
    pub repeat_count: i32,
    /// Seconds between repeats.
    #[serde(default = "default_interval")]
    pub interval: i32,
}

impl MissionEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: None,
            action: None,
            repeat_count: default_repeat_count(),
            interval: default_interval(),
        }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn key(&self) -> String {
        entity_key(EntityKind::Event, &self.name)
    }

    /// Non-empty scripted expressions attached to this event.
    pub fn expressions(&self) -> Vec<(ExpressionSlot, &str)> {
        scripted(&[
            (ExpressionSlot::Condition, self.condition.as_deref()),
            (ExpressionSlot::Action, self.action.as_deref()),
        ])
    }
}

/// Goal category shown in the debriefing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    #[default]
    Primary,
    Secondary,
    Bonus,
}

impl GoalType {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
            Self::Bonus => "Bonus",
        }
    }
}

/// A mission objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionGoal {
    pub name: String,
    #[serde(default)]
    pub goal_type: GoalType,
    /// SEXP that completes the goal when true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Text shown to the player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MissionGoal {
    pub fn new(name: impl Into<String>, goal_type: GoalType) -> Self {
        Self {
            name: name.into(),
            goal_type,
            condition: None,
            message: None,
        }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn key(&self) -> String {
        entity_key(EntityKind::Goal, &self.name)
    }

    /// Non-empty scripted expressions attached to this goal.
    pub fn expressions(&self) -> Vec<(ExpressionSlot, &str)> {
        scripted(&[(ExpressionSlot::Condition, self.condition.as_deref())])
    }
}

fn scripted<'a>(slots: &[(ExpressionSlot, Option<&'a str>)]) -> Vec<(ExpressionSlot, &'a str)> {
    slots
        .iter()
        .filter_map(|(slot, expr)| {
            expr.map(str::trim)
                .filter(|expr| !expr.is_empty())
                .map(|expr| (*slot, expr))
        })
        .collect()
}

/// A complete mission as exported by the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mission {
    pub name: String,
    pub objects: Vec<MissionObject>,
    pub wings: Vec<Wing>,
    pub events: Vec<MissionEvent>,
    pub goals: Vec<MissionGoal>,
}

impl Mission {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_object(mut self, object: MissionObject) -> Self {
        self.objects.push(object);
        self
    }

    #[must_use]
    pub fn with_wing(mut self, wing: Wing) -> Self {
        self.wings.push(wing);
        self
    }

    #[must_use]
    pub fn with_event(mut self, event: MissionEvent) -> Self {
        self.events.push(event);
        self
    }

    #[must_use]
    pub fn with_goal(mut self, goal: MissionGoal) -> Self {
        self.goals.push(goal);
        self
    }

    /// Total number of entities the validator visits.
    pub fn entity_count(&self) -> usize {
        self.objects.len() + self.wings.len() + self.events.len() + self.goals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key_format() {
        assert_eq!(entity_key(EntityKind::Object, "alpha-1"), "object:alpha-1");
        assert_eq!(entity_key(EntityKind::Event, "Arrival"), "event:Arrival");
    }

    #[test]
    fn test_asset_references_skip_blank_class() {
        let ship = MissionObject::new("a", ObjectKind::Ship).with_ship_class("  ");
        assert!(ship.asset_references().is_empty());

        let ship = MissionObject::new("a", ObjectKind::Ship).with_ship_class(" GTF Ulysses ");
        assert_eq!(ship.asset_references(), vec!["GTF Ulysses"]);
    }

    #[test]
    fn test_event_expressions_skip_empty_slots() {
        let event = MissionEvent::new("Arrival")
            .with_condition("(true)")
            .with_action("   ");
        let exprs = event.expressions();
        assert_eq!(exprs, vec![(ExpressionSlot::Condition, "(true)")]);
    }

    #[test]
    fn test_mission_deserializes_with_defaults() {
        let json = r#"{
            "name": "Training",
            "objects": [{"id": "alpha-1", "kind": "ship", "ship_class": "GTF Ulysses"}],
            "events": [{"name": "Start", "condition": "(true)"}]
        }"#;
        let mission: Mission = serde_json::from_str(json).unwrap();
        assert_eq!(mission.objects[0].name, "");
        assert_eq!(mission.events[0].repeat_count, 1);
        assert!(mission.wings.is_empty());
        assert_eq!(mission.entity_count(), 2);
    }
}
