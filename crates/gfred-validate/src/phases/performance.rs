//! Entity count heuristics.

use super::PassContext;

pub(super) fn run(ctx: &mut PassContext<'_>) {
    let mission = ctx.mission;
    let limits = *ctx.limits;

    let counts = [
        (
            "objects",
            mission.objects().len(),
            limits.object_soft_limit,
            limits.object_hard_limit,
        ),
        (
            "wings",
            mission.wings().len(),
            limits.wing_soft_limit,
            limits.wing_hard_limit,
        ),
        (
            "events",
            mission.events().len(),
            limits.event_soft_limit,
            limits.event_hard_limit,
        ),
    ];

    for (what, count, soft, hard) in counts {
        if count > hard {
            ctx.mission_result.add_error(format!(
                "Mission has {count} {what}, exceeding the limit of {hard}"
            ));
        } else if count > soft {
            ctx.mission_result.add_warning(format!(
                "Mission has {count} {what}, above the recommended {soft}; editor and game performance may suffer"
            ));
        }
    }
}
