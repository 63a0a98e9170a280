//! Target tile calculation for AI-controlled entities.

use tilerunner_core::{config::TargetConfig, TilePoint};
use tilerunner_world::{
    query::{EntitySnapshot, EntityView},
    Grid,
};

/// Computes the target tile for the caller entity from its configuration.
///
/// Every variant is total: a missing target entity, an out-of-bounds offset
/// or a blocked tile degrades to a deterministic fallback rather than an
/// error, so callers can always hand the result to the pathfinder.
#[must_use]
pub fn compute_target(
    grid: Grid,
    view: &EntityView,
    caller: &EntitySnapshot,
    config: &TargetConfig,
) -> TilePoint {
    match config {
        TargetConfig::FixedLocation { at } => *at,
        TargetConfig::TrackEntity { kind } => view
            .first_of_kind(kind)
            .map(EntitySnapshot::tile)
            .unwrap_or(TilePoint::new(0, 0)),
        TargetConfig::TrackEntityWithLeadAhead { kind, lead } => {
            let Some(tracked) = view.first_of_kind(kind) else {
                return TilePoint::new(0, 0);
            };
            lead_tile(grid, view, caller, tracked, *lead)
        }
        TargetConfig::TrackEntityWithTrap {
            kind,
            teammate,
            lead,
        } => {
            let Some(tracked) = view.first_of_kind(kind) else {
                return TilePoint::new(0, 0);
            };
            let ahead = lead_tile(grid, view, caller, tracked, *lead);
            let Some(anchor) = view.first_of_kind(teammate) else {
                return ahead;
            };
            // Reflect the lead tile about the teammate to form the pincer.
            let anchor_tile = anchor.tile();
            let pincer = TilePoint::new(
                2 * ahead.x() - anchor_tile.x(),
                2 * ahead.y() - anchor_tile.y(),
            );
            if usable(grid, view, caller, pincer) {
                pincer
            } else {
                tracked.tile()
            }
        }
    }
}

/// Tracked entity's tile offset `lead` tiles along its facing direction,
/// falling back to the un-offset tile when the offset is unusable.
fn lead_tile(
    grid: Grid,
    view: &EntityView,
    caller: &EntitySnapshot,
    tracked: &EntitySnapshot,
    lead: i32,
) -> TilePoint {
    let tile = tracked.tile();
    // Entities face up until their first step, which doubles as the fallback
    // facing for targets that never move.
    let offset = tracked.facing.offset();
    let ahead = TilePoint::new(tile.x() + offset.dx() * lead, tile.y() + offset.dy() * lead);
    if usable(grid, view, caller, ahead) {
        ahead
    } else {
        tile
    }
}

fn usable(grid: Grid, view: &EntityView, caller: &EntitySnapshot, tile: TilePoint) -> bool {
    if !grid.contains(tile) {
        return false;
    }
    let blocks = caller
        .bundle()
        .map(|bundle| bundle.blocks())
        .unwrap_or(&[]);
    !view.blocks_tile(blocks, tile)
}
