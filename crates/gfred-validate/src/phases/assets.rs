//! Asset existence for ship classes.

use std::collections::HashMap;

use super::PassContext;
use crate::graph::{DependencyInfo, DependencyType};

pub(super) fn run(ctx: &mut PassContext<'_>) {
    let Some(checker) = ctx.asset_checker else {
        ctx.mission_result
            .add_warning("Asset validation unavailable: no asset checker configured");
        return;
    };
    let mission = ctx.mission;

    // One lookup per distinct reference in this pass.
    let mut checked: HashMap<&str, bool> = HashMap::new();

    for object in mission.objects() {
        let owner = object.key();
        for asset in object.asset_references() {
            let exists = *checked
                .entry(asset)
                .or_insert_with(|| checker.exists(asset));

            let mut info = DependencyInfo::new(&owner, DependencyType::Asset, asset);
            if !exists {
                let message = format!("Ship class '{asset}' not found");
                ctx.entity_result(&owner).add_error(message.clone());
                info = info.invalid(message);
            }
            ctx.depend(&owner, info);
        }
    }

    tracing::debug!(distinct_assets = checked.len(), "asset references checked");
}
