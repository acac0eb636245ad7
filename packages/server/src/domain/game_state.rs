//! GameState entity: the live round of one game.
//!
//! The GameState record owns the shuffled wall, every player's concealed
//! hand and public played pile, the shared draw cursor, and the dealer /
//! round-wind / turn counters. It is created when all four clients have
//! loaded the game page, not when the lobby record is created.
//!
//! Every mutating method checks its preconditions first and leaves the
//! record untouched on error, so a repository can expose each method as one
//! atomic conditional update under its lock.

use serde::{Deserialize, Serialize};

use super::{
    error::GameStateError,
    game::DEFAULT_MAX_USERS_IN_GAME,
    tile::{DEFAULT_WALL_LENGTH, Tile},
    value_object::{ConnectionId, GameId},
    wall::deal_hands,
};

/// Round lifecycle of a game state record.
///
/// WAITING_FOR_PLAYERS and LOADING live on the lobby record (seat list and
/// loaded count); the state record only exists from the first deal onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
    RoundInProgress,
    RoundEnded,
}

/// What a claim on a discarded tile wants to form.
///
/// Priority for resolving competing claims is ascending in declaration
/// order: a win beats a kong beats a pung beats a chow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeldType {
    Chow,
    Pung,
    Kong,
    Win,
}

impl MeldType {
    /// Resolution priority, higher wins.
    pub fn priority(&self) -> u8 {
        match self {
            MeldType::Chow => 0,
            MeldType::Pung => 1,
            MeldType::Kong => 2,
            MeldType::Win => 3,
        }
    }
}

/// One player's tiles within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHand {
    /// Which connection sits at this seat
    pub connection_id: ConnectionId,
    /// Concealed hand, visible only to the owner
    pub hand: Vec<Tile>,
    /// Publicly visible played pile (discards and exposed bonus tiles)
    pub played_tiles: Vec<Tile>,
}

impl PlayerHand {
    pub fn new(connection_id: ConnectionId, hand: Vec<Tile>) -> Self {
        Self {
            connection_id,
            hand,
            played_tiles: Vec::new(),
        }
    }
}

/// One player's reaction to the currently discarded tile: a claim with the
/// tiles it would use, or an explicit skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileInteraction {
    /// Who reacted
    pub connection_id: ConnectionId,
    /// The claimant's tiles that would complete the meld (empty on skip)
    pub played_tiles: Vec<Tile>,
    /// What the claim would form
    pub meld_type: MeldType,
    /// True when the player passes on the discard
    pub skip_interaction: bool,
}

/// Result of one draw attempt from the wall.
///
/// Exhaustion is a signal, not an error: the 145th draw simply reports that
/// the wall is out and the round must restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallDraw {
    Drawn(Tile),
    Exhausted,
}

/// The authoritative state of one running round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Which game this round belongs to
    pub game_id: GameId,
    /// Fixed draw order for the whole round; dealt tiles stay in place
    pub wall: Vec<Tile>,
    /// One entry per seat, parallel to the lobby seat order
    pub hands: Vec<PlayerHand>,
    /// Next undrawn wall slot (dealing already consumed the head)
    pub current_index: usize,
    /// Dealer seat (0-3)
    pub dealer: usize,
    /// Round wind (0-3 for east, south, west, north rounds)
    pub current_wind: usize,
    /// Whose turn it is to discard (0-3)
    pub current_turn: usize,
    /// Reactions collected for the current discard
    pub interaction_count: usize,
    /// The reactions themselves, in arrival order
    pub interactions: Vec<TileInteraction>,
    /// Round lifecycle gate
    pub phase: RoundPhase,
}

impl GameState {
    /// Deal the opening round: seat 0 is the dealer, east round, dealer's
    /// turn.
    ///
    /// # Errors
    ///
    /// Propagates dealing errors (player count, wall length).
    pub fn new(
        game_id: GameId,
        connection_ids: &[ConnectionId],
        wall: Vec<Tile>,
    ) -> Result<Self, GameStateError> {
        let deal = deal_hands(&wall, connection_ids.len(), 0)?;
        let hands = connection_ids
            .iter()
            .cloned()
            .zip(deal.hands)
            .map(|(connection_id, hand)| PlayerHand::new(connection_id, hand))
            .collect();
        Ok(Self {
            game_id,
            wall,
            hands,
            current_index: deal.next_index,
            dealer: 0,
            current_wind: 0,
            current_turn: 0,
            interaction_count: 0,
            interactions: Vec::new(),
            phase: RoundPhase::RoundInProgress,
        })
    }

    /// Seat index of the given connection.
    pub fn seat_of(&self, connection_id: &ConnectionId) -> Result<usize, GameStateError> {
        self.hands
            .iter()
            .position(|hand| &hand.connection_id == connection_id)
            .ok_or_else(|| GameStateError::UnknownPlayer {
                connection_id: connection_id.as_str().to_string(),
            })
    }

    /// The hand record of the given connection, if seated.
    pub fn hand_of(&self, connection_id: &ConnectionId) -> Option<&PlayerHand> {
        self.hands
            .iter()
            .find(|hand| &hand.connection_id == connection_id)
    }

    /// Connection ids of all seated players, in seat order.
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.hands
            .iter()
            .map(|hand| hand.connection_id.clone())
            .collect()
    }

    /// The seat after the given one in turn order.
    pub fn next_seat_after(&self, seat: usize) -> usize {
        (seat + 1) % self.hands.len()
    }

    /// Draw the next tile from the wall into the drawer's hand.
    ///
    /// Advances the cursor by exactly one per served tile. Once the cursor
    /// reaches the wall length the draw reports `WallDraw::Exhausted` and
    /// applies no change at all, however often it is retried.
    ///
    /// # Errors
    ///
    /// Rejects draws outside a running round and from unseated connections.
    pub fn draw_tile(
        &mut self,
        connection_id: &ConnectionId,
    ) -> Result<WallDraw, GameStateError> {
        if self.phase != RoundPhase::RoundInProgress {
            return Err(GameStateError::RoundNotInProgress);
        }
        let seat = self.seat_of(connection_id)?;
        if self.current_index >= DEFAULT_WALL_LENGTH {
            return Ok(WallDraw::Exhausted);
        }
        let tile = self.wall[self.current_index];
        self.current_index += 1;
        self.hands[seat].hand.push(tile);
        Ok(WallDraw::Drawn(tile))
    }

    /// Discard a tile: move it from the concealed hand to the public pile.
    ///
    /// # Errors
    ///
    /// Rejects discards outside a running round, out of turn, and of tiles
    /// the player does not hold.
    pub fn discard_tile(
        &mut self,
        connection_id: &ConnectionId,
        tile: Tile,
    ) -> Result<(), GameStateError> {
        if self.phase != RoundPhase::RoundInProgress {
            return Err(GameStateError::RoundNotInProgress);
        }
        let seat = self.seat_of(connection_id)?;
        if seat != self.current_turn {
            return Err(GameStateError::NotYourTurn {
                current_turn: self.current_turn,
            });
        }
        let position = self.hands[seat]
            .hand
            .iter()
            .position(|held| held == &tile)
            .ok_or(GameStateError::TileNotInHand)?;
        self.hands[seat].hand.remove(position);
        self.hands[seat].played_tiles.push(tile);
        Ok(())
    }

    /// Expose a bonus tile (flower or season) into the public pile.
    ///
    /// Bonus tiles are revealed whenever drawn, out of turn, and the player
    /// then draws a replacement.
    ///
    /// # Errors
    ///
    /// Rejects non-bonus tiles and tiles the player does not hold.
    pub fn expose_tile(
        &mut self,
        connection_id: &ConnectionId,
        tile: Tile,
    ) -> Result<(), GameStateError> {
        if self.phase != RoundPhase::RoundInProgress {
            return Err(GameStateError::RoundNotInProgress);
        }
        if !tile.is_bonus() {
            return Err(GameStateError::NotABonusTile);
        }
        let seat = self.seat_of(connection_id)?;
        let position = self.hands[seat]
            .hand
            .iter()
            .position(|held| held == &tile)
            .ok_or(GameStateError::TileNotInHand)?;
        self.hands[seat].hand.remove(position);
        self.hands[seat].played_tiles.push(tile);
        Ok(())
    }

    /// Record one reaction to the current discard.
    ///
    /// Strictly additive: list append plus counter increment, never
    /// last-write-wins. Returns the new interaction count.
    ///
    /// # Errors
    ///
    /// Rejects reactions outside a running round, beyond the four-seat
    /// bound, from unseated connections, and second reactions from the same
    /// connection within one window.
    pub fn append_interaction(
        &mut self,
        interaction: TileInteraction,
    ) -> Result<usize, GameStateError> {
        if self.phase != RoundPhase::RoundInProgress {
            return Err(GameStateError::RoundNotInProgress);
        }
        if self.interaction_count >= DEFAULT_MAX_USERS_IN_GAME {
            return Err(GameStateError::InteractionLimitReached {
                limit: DEFAULT_MAX_USERS_IN_GAME,
            });
        }
        self.seat_of(&interaction.connection_id)?;
        if self
            .interactions
            .iter()
            .any(|existing| existing.connection_id == interaction.connection_id)
        {
            return Err(GameStateError::DuplicateInteraction {
                connection_id: interaction.connection_id.as_str().to_string(),
            });
        }
        self.interactions.push(interaction);
        self.interaction_count += 1;
        Ok(self.interaction_count)
    }

    /// Clear the interaction window: count back to 0, list emptied.
    ///
    /// Called once per resolved discard. Unconditional.
    pub fn reset_interactions(&mut self) {
        self.interactions.clear();
        self.interaction_count = 0;
    }

    /// Pick the winning claim among the collected reactions, if any.
    ///
    /// The discarder is the seat holding the turn (the turn only moves when
    /// the window resolves). Skips are ignored; among real claims the
    /// highest meld priority wins and ties go to the claimant closest after
    /// the discarder in turn order.
    pub fn winning_claim(&self) -> Option<(TileInteraction, usize)> {
        let players = self.hands.len();
        let discarder = self.current_turn;
        self.interactions
            .iter()
            .filter(|interaction| !interaction.skip_interaction)
            .filter_map(|interaction| {
                let seat = self.seat_of(&interaction.connection_id).ok()?;
                if seat == discarder {
                    return None;
                }
                let distance = (seat + players - discarder) % players;
                Some((interaction, seat, distance))
            })
            .max_by_key(|(interaction, _, distance)| {
                (
                    interaction.meld_type.priority(),
                    std::cmp::Reverse(*distance),
                )
            })
            .map(|(interaction, seat, _)| (interaction.clone(), seat))
    }

    /// Hand the turn to the given seat.
    ///
    /// # Errors
    ///
    /// Rejects seats outside the seated players.
    pub fn set_current_turn(&mut self, seat: usize) -> Result<(), GameStateError> {
        if seat >= self.hands.len() {
            return Err(GameStateError::SeatOutOfRange {
                seat,
                players: self.hands.len(),
            });
        }
        self.current_turn = seat;
        Ok(())
    }

    /// Close the round: ROUND_IN_PROGRESS -> ROUND_ENDED.
    ///
    /// The first caller wins; concurrent callers racing on wall exhaustion
    /// or a win declaration get `RoundNotInProgress` and must stand down.
    pub fn mark_round_ended(&mut self) -> Result<(), GameStateError> {
        if self.phase != RoundPhase::RoundInProgress {
            return Err(GameStateError::RoundNotInProgress);
        }
        self.phase = RoundPhase::RoundEnded;
        Ok(())
    }

    /// Advance the dealer seat by one, without wrapping.
    ///
    /// # Errors
    ///
    /// The `next < 4` bound can never trip for a correctly-counted
    /// four-player game; it exists so a miscount fails loudly instead of
    /// wrapping silently.
    pub fn advance_dealer(&mut self) -> Result<(), GameStateError> {
        let next = self.dealer + 1;
        if next >= DEFAULT_MAX_USERS_IN_GAME {
            return Err(GameStateError::DealerOutOfRange {
                next,
                max: DEFAULT_MAX_USERS_IN_GAME,
            });
        }
        self.dealer = next;
        Ok(())
    }

    /// Advance the round wind by one, without wrapping.
    ///
    /// # Errors
    ///
    /// Same defensive bound as `advance_dealer`.
    pub fn advance_wind(&mut self) -> Result<(), GameStateError> {
        let next = self.current_wind + 1;
        if next >= DEFAULT_MAX_USERS_IN_GAME {
            return Err(GameStateError::WindOutOfRange {
                next,
                max: DEFAULT_MAX_USERS_IN_GAME,
            });
        }
        self.current_wind = next;
        Ok(())
    }

    /// Rotate the dealer for a new round: dealer = (dealer + 1) mod 4, and
    /// when the dealer seat wraps back to 0 the round wind advances first
    /// (wrapping north back to east).
    pub fn rotate_dealer(&mut self) -> Result<(), GameStateError> {
        if self.dealer + 1 == DEFAULT_MAX_USERS_IN_GAME {
            if self.current_wind + 1 == DEFAULT_MAX_USERS_IN_GAME {
                self.current_wind = 0;
            } else {
                self.advance_wind()?;
            }
            self.dealer = 0;
        } else {
            self.advance_dealer()?;
        }
        Ok(())
    }

    /// Start the next round on a fresh wall.
    ///
    /// Rotates the dealer when `is_dealer_changed` (the dealer keeps the
    /// seat on a self-won hand), re-deals every hand, resets the cursor,
    /// clears the piles and the interaction window, and hands the turn to
    /// the dealer.
    ///
    /// # Errors
    ///
    /// The previous round must have ended; a running round is never
    /// replaced.
    pub fn start_new_round(
        &mut self,
        wall: Vec<Tile>,
        is_dealer_changed: bool,
    ) -> Result<(), GameStateError> {
        if self.phase != RoundPhase::RoundEnded {
            return Err(GameStateError::RoundNotEnded);
        }
        // Validate the deal inputs before touching the counters so the
        // record stays untouched on any reject.
        if self.hands.len() != DEFAULT_MAX_USERS_IN_GAME {
            return Err(GameStateError::InvalidPlayerCount {
                count: self.hands.len(),
            });
        }
        if wall.len() < DEFAULT_WALL_LENGTH {
            return Err(GameStateError::ShortWall {
                expected: DEFAULT_WALL_LENGTH,
                actual: wall.len(),
            });
        }
        if is_dealer_changed {
            self.rotate_dealer()?;
        }
        let deal = deal_hands(&wall, self.hands.len(), self.dealer)?;

        for (seat_hand, dealt) in self.hands.iter_mut().zip(deal.hands) {
            seat_hand.hand = dealt;
            seat_hand.played_tiles.clear();
        }
        self.wall = wall;
        self.current_index = deal.next_index;
        self.current_turn = self.dealer;
        self.reset_interactions();
        self.phase = RoundPhase::RoundInProgress;
        Ok(())
    }
}
