//! Mission data model for the GFRED validation core.
//!
//! This crate holds the plain data a mission editor hands to the validator:
//!
//! - **Mission entities** (`mission`): objects, wings, events and goals
//! - **Provider** (`provider`): the [`MissionProvider`] seam the engine reads through
//! - **Results** (`result`): the per-entity [`ValidationResult`] triplet
//! - **Rules** (`rules`): entity-local checks behind the [`Validate`] trait
//! - **Fingerprints** (`fingerprint`): SHA-256 content digests for cache keys
//!
//! # Example
//!
//! ```ignore
//! use gfred_model::{Mission, MissionObject, ObjectKind, Validate};
//!
//! let ship = MissionObject::new("alpha-1", ObjectKind::Ship).with_ship_class("GTF Ulysses");
//! let mission = Mission::new("Training 1").with_object(ship);
//!
//! for object in &mission.objects {
//!     let result = object.validate().unwrap_or_default();
//!     assert!(result.is_valid());
//! }
//! ```

pub mod error;
pub mod fingerprint;
pub mod mission;
pub mod provider;
pub mod result;
pub mod rules;

pub use error::{ModelError, Result};
pub use fingerprint::{fingerprint, sha256_hex, short_hash};
pub use mission::{
    EntityKind, ExpressionSlot, GoalType, Mission, MissionEvent, MissionGoal, MissionObject,
    ObjectKind, Wing, entity_key,
};
pub use provider::{MissionProvider, load_mission, parse_mission};
pub use result::ValidationResult;
pub use rules::{MAX_WING_SIZE, Validate};
