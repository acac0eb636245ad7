//! Tile values and the composition of the full mahjong set.
//!
//! Tiles are values, not entities: the set contains four identical copies of
//! every suited and honor tile, so equality is by value and the `copy` index
//! only distinguishes physical duplicates inside the wall.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Number of tiles in the full wall: 108 suited + 16 winds + 12 dragons
/// + 8 bonus tiles (4 flowers, 4 seasons)
pub const DEFAULT_WALL_LENGTH: usize = 144;

/// Copies of each suited and honor tile in the set
pub const COPIES_PER_TILE: u8 = 4;

/// The three suited categories
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Suit {
    /// 萬子 (characters), displayed as `m`
    Characters,
    /// 筒子 (dots), displayed as `p`
    Dots,
    /// 索子 (bamboo), displayed as `s`
    Bamboo,
}

/// The four wind honor tiles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Wind {
    East,
    South,
    West,
    North,
}

/// The three dragon honor tiles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Dragon {
    Red,
    Green,
    White,
}

/// The four flower bonus tiles (singletons)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Flower {
    Plum,
    Orchid,
    Chrysanthemum,
    Bamboo,
}

/// The four season bonus tiles (singletons)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// What a tile depicts, without the duplicate index.
///
/// Serialized internally tagged so wire payloads stay self-describing, e.g.
/// `{"kind":"suited","suit":"characters","rank":5}`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TileKind {
    Suited { suit: Suit, rank: u8 },
    Wind { wind: Wind },
    Dragon { dragon: Dragon },
    Flower { flower: Flower },
    Season { season: Season },
}

impl TileKind {
    /// Number of physical copies of this kind in the set
    pub fn copies(&self) -> u8 {
        match self {
            TileKind::Flower { .. } | TileKind::Season { .. } => 1,
            _ => COPIES_PER_TILE,
        }
    }
}

/// One physical tile: its kind plus which of the identical copies it is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Tile {
    #[serde(flatten)]
    kind: TileKind,
    copy: u8,
}

impl Tile {
    /// Create a new Tile.
    ///
    /// # Errors
    ///
    /// Returns an error if a suited rank is outside 1-9 or the copy index
    /// is outside the duplicate count of the kind.
    pub fn new(kind: TileKind, copy: u8) -> Result<Self, ValueObjectError> {
        if let TileKind::Suited { rank, .. } = kind {
            if !(1..=9).contains(&rank) {
                return Err(ValueObjectError::TileRankOutOfRange(rank));
            }
        }
        let copies = kind.copies();
        if copy >= copies {
            return Err(ValueObjectError::TileCopyOutOfRange {
                max: copies,
                actual: copy,
            });
        }
        Ok(Self { kind, copy })
    }

    /// What the tile depicts.
    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// Which of the identical copies this tile is (0-based).
    pub fn copy(&self) -> u8 {
        self.copy
    }

    /// Whether this is a flower or season tile.
    ///
    /// Bonus tiles are exposed in place instead of being discarded.
    pub fn is_bonus(&self) -> bool {
        matches!(
            self.kind,
            TileKind::Flower { .. } | TileKind::Season { .. }
        )
    }

    /// Whether this is a wind or dragon tile.
    pub fn is_honor(&self) -> bool {
        matches!(self.kind, TileKind::Wind { .. } | TileKind::Dragon { .. })
    }

    /// Whether this is a suited (numbered) tile.
    pub fn is_suited(&self) -> bool {
        matches!(self.kind, TileKind::Suited { .. })
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TileKind::Suited { suit, rank } => {
                let code = match suit {
                    Suit::Characters => 'm',
                    Suit::Dots => 'p',
                    Suit::Bamboo => 's',
                };
                write!(f, "{rank}{code}")
            }
            TileKind::Wind { wind } => {
                let code = match wind {
                    Wind::East => "E",
                    Wind::South => "S",
                    Wind::West => "W",
                    Wind::North => "N",
                };
                write!(f, "{code}")
            }
            TileKind::Dragon { dragon } => {
                let code = match dragon {
                    Dragon::Red => "Rd",
                    Dragon::Green => "Gr",
                    Dragon::White => "Wh",
                };
                write!(f, "{code}")
            }
            TileKind::Flower { flower } => {
                let n = match flower {
                    Flower::Plum => 1,
                    Flower::Orchid => 2,
                    Flower::Chrysanthemum => 3,
                    Flower::Bamboo => 4,
                };
                write!(f, "F{n}")
            }
            TileKind::Season { season } => {
                let n = match season {
                    Season::Spring => 1,
                    Season::Summer => 2,
                    Season::Autumn => 3,
                    Season::Winter => 4,
                };
                write!(f, "S{n}")
            }
        }
    }
}

/// Build the full 144-tile set in canonical (unshuffled) order.
///
/// The order is suits (characters, dots, bamboo, ranks 1-9), winds, dragons,
/// flowers, seasons, with the copies of each kind adjacent.
pub fn build_wall_tiles() -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(DEFAULT_WALL_LENGTH);
    for suit in [Suit::Characters, Suit::Dots, Suit::Bamboo] {
        for rank in 1..=9u8 {
            for copy in 0..COPIES_PER_TILE {
                tiles.push(Tile {
                    kind: TileKind::Suited { suit, rank },
                    copy,
                });
            }
        }
    }
    for wind in [Wind::East, Wind::South, Wind::West, Wind::North] {
        for copy in 0..COPIES_PER_TILE {
            tiles.push(Tile {
                kind: TileKind::Wind { wind },
                copy,
            });
        }
    }
    for dragon in [Dragon::Red, Dragon::Green, Dragon::White] {
        for copy in 0..COPIES_PER_TILE {
            tiles.push(Tile {
                kind: TileKind::Dragon { dragon },
                copy,
            });
        }
    }
    for flower in [
        Flower::Plum,
        Flower::Orchid,
        Flower::Chrysanthemum,
        Flower::Bamboo,
    ] {
        tiles.push(Tile {
            kind: TileKind::Flower { flower },
            copy: 0,
        });
    }
    for season in [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ] {
        tiles.push(Tile {
            kind: TileKind::Season { season },
            copy: 0,
        });
    }
    tiles
}
