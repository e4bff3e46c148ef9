//! Mission data provider seam and JSON loading.

use std::fs;
use std::path::Path;

use crate::error::{ModelError, Result};
use crate::mission::{Mission, MissionEvent, MissionGoal, MissionObject, Wing};

/// Read access to a mission's entity collections.
///
/// The validation engine only reads through this trait, so editors can hand
/// over their own mission representation without copying it into [`Mission`].
pub trait MissionProvider {
    fn name(&self) -> &str;
    fn objects(&self) -> &[MissionObject];
    fn wings(&self) -> &[Wing];
    fn events(&self) -> &[MissionEvent];
    fn goals(&self) -> &[MissionGoal];

    /// Look up an object by id.
    fn object(&self, id: &str) -> Option<&MissionObject> {
        self.objects().iter().find(|object| object.id == id)
    }
}

impl MissionProvider for Mission {
    fn name(&self) -> &str {
        &self.name
    }

    fn objects(&self) -> &[MissionObject] {
        &self.objects
    }

    fn wings(&self) -> &[Wing] {
        &self.wings
    }

    fn events(&self) -> &[MissionEvent] {
        &self.events
    }

    fn goals(&self) -> &[MissionGoal] {
        &self.goals
    }
}

/// Parse a mission from its JSON export.
pub fn parse_mission(json: &str) -> Result<Mission> {
    Ok(serde_json::from_str(json)?)
}

/// Load a mission from a JSON export on disk.
pub fn load_mission(path: &Path) -> Result<Mission> {
    let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_mission(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::ObjectKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_object_lookup() {
        let mission = Mission::new("Test")
            .with_object(MissionObject::new("alpha-1", ObjectKind::Ship))
            .with_object(MissionObject::new("wp-1", ObjectKind::Waypoint));
        assert_eq!(
            mission.object("wp-1").map(|o| o.kind),
            Some(ObjectKind::Waypoint)
        );
        assert!(mission.object("beta-1").is_none());
    }

    #[test]
    fn test_load_mission_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"name": "Loaded", "goals": [{"name": "Survive"}]}"#)
            .unwrap();
        file.flush().unwrap();

        let mission = load_mission(file.path()).unwrap();
        assert_eq!(mission.name, "Loaded");
        assert_eq!(mission.goals.len(), 1);
    }

    #[test]
    fn test_load_mission_missing_file() {
        let err = load_mission(Path::new("/nonexistent/mission.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_parse_mission_rejects_bad_kind() {
        let err = parse_mission(r#"{"objects": [{"id": "x", "kind": "starbase"}]}"#).unwrap_err();
        assert!(matches!(err, ModelError::Json(_)));
    }
}
