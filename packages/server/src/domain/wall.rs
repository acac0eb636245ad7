//! Wall shuffling and hand dealing.
//!
//! The wall is the full 144-tile sequence in a fixed draw order established
//! once at shuffle time. Dealing and drawing both consume tiles strictly in
//! wall order through a shared cursor; dealt tiles stay in the wall array
//! and the cursor marks the next undrawn slot.

use rand::Rng;
use rand::seq::SliceRandom;

use super::error::GameStateError;
use super::game::DEFAULT_MAX_USERS_IN_GAME;
use super::tile::{DEFAULT_WALL_LENGTH, Tile, build_wall_tiles};

/// Concealed hand size for non-dealer seats
pub const HAND_LENGTH: usize = 13;

/// Concealed hand size for the dealer (extra tile, discards first)
pub const DEALER_HAND_LENGTH: usize = 14;

/// Build and shuffle a fresh wall with the global RNG.
pub fn shuffle_wall() -> Vec<Tile> {
    shuffle_wall_with(&mut rand::rng())
}

/// Build and shuffle a fresh wall with the given RNG.
///
/// Tests pass a seeded `StdRng` to get reproducible walls.
pub fn shuffle_wall_with<R: Rng + ?Sized>(rng: &mut R) -> Vec<Tile> {
    let mut tiles = build_wall_tiles();
    tiles.shuffle(rng);
    tiles
}

/// Result of dealing opening hands from a wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealResult {
    /// One hand per seat, in seat order; the dealer's hand has 14 tiles
    pub hands: Vec<Vec<Tile>>,
    /// Wall cursor after dealing (first undealt slot)
    pub next_index: usize,
}

/// Deal opening hands from the head of the wall.
///
/// Seats are dealt in order, 13 tiles each and 14 for the dealer, consuming
/// wall slots starting at index 0 so dealt tiles are never drawn again.
///
/// # Errors
///
/// Rejects player counts outside 1-4, a dealer seat outside the player
/// count, and walls shorter than the full set.
pub fn deal_hands(
    wall: &[Tile],
    player_count: usize,
    dealer: usize,
) -> Result<DealResult, GameStateError> {
    if player_count == 0 || player_count > DEFAULT_MAX_USERS_IN_GAME {
        return Err(GameStateError::InvalidPlayerCount {
            count: player_count,
        });
    }
    if dealer >= player_count {
        return Err(GameStateError::SeatOutOfRange {
            seat: dealer,
            players: player_count,
        });
    }
    if wall.len() < DEFAULT_WALL_LENGTH {
        return Err(GameStateError::ShortWall {
            expected: DEFAULT_WALL_LENGTH,
            actual: wall.len(),
        });
    }

    let mut hands = Vec::with_capacity(player_count);
    let mut cursor = 0;
    for seat in 0..player_count {
        let count = if seat == dealer {
            DEALER_HAND_LENGTH
        } else {
            HAND_LENGTH
        };
        hands.push(wall[cursor..cursor + count].to_vec());
        cursor += count;
    }
    Ok(DealResult {
        hands,
        next_index: cursor,
    })
}
