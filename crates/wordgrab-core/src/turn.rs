//! Turn rotation: who flips next.

use crate::player::{Player, PlayerId};
use std::collections::HashMap;

/// Pick the player who holds the turn after `current`.
///
/// Connected players rotate in join order. When the current holder is
/// disconnected the turn goes to the first connected player, and with nobody
/// connected it parks on the first player in join order so it stays defined.
/// Returns `None` only for a game with no players.
pub fn next_turn(
    join_order: &[PlayerId],
    players: &HashMap<PlayerId, Player>,
    current: PlayerId,
) -> Option<PlayerId> {
    let connected: Vec<PlayerId> = join_order
        .iter()
        .copied()
        .filter(|id| players.get(id).map_or(false, |p| p.connected))
        .collect();

    if connected.is_empty() {
        return join_order.first().copied();
    }

    match connected.iter().position(|&id| id == current) {
        Some(i) => Some(connected[(i + 1) % connected.len()]),
        None => connected.first().copied(),
    }
}
