//! Board and card records exchanged with callers.
//!
//! A [`Board`] is an uploaded board image plus the [`Sizing`] describing how
//! it decomposes into cards. A [`Card`] is one cell's encoded image and an
//! optional [`CardType`] tag. Neither type knows anything about pixels: both
//! hold encoded bytes exactly as they came in or as an engine produced them.
//!
//! ## Identity
//!
//! Boards compare by identity only. A board gets its [`BoardId`] from
//! whatever persists it; until then the id is absent and the board is equal
//! to nothing, itself included. Two unsaved boards with identical content are
//! still two different boards.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid grid dimension {columns}x{rows}: columns and rows must be positive")]
    InvalidDimension { columns: i64, rows: i64 },
    #[error("unknown card type: {0}")]
    UnknownCardType(String),
}

/// Grid shape of a board: how many card columns and rows it holds.
///
/// Always valid once constructed. `Copy`, so every accessor that returns a
/// `Sizing` hands out an independent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sizing {
    columns: u32,
    rows: u32,
}

impl Sizing {
    pub fn new(columns: i64, rows: i64) -> Result<Self, BoardError> {
        let invalid = || BoardError::InvalidDimension { columns, rows };
        let c = u32::try_from(columns).map_err(|_| invalid())?;
        let r = u32::try_from(rows).map_err(|_| invalid())?;
        if c == 0 || r == 0 {
            return Err(invalid());
        }
        Ok(Self {
            columns: c,
            rows: r,
        })
    }

    pub fn columns(self) -> u32 {
        self.columns
    }

    pub fn rows(self) -> u32 {
        self.rows
    }

    /// Number of cards the grid decomposes into.
    pub fn cell_count(self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

impl fmt::Display for Sizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

/// Identifier assigned to a board once it has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardId(pub u64);

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification tag for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    Door,
    Treasure,
}

impl CardType {
    /// Every card type, in declaration order.
    pub const ALL: [CardType; 2] = [CardType::Door, CardType::Treasure];

    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Door => "door",
            CardType::Treasure => "treasure",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BoardError::UnknownCardType(s.to_string()))
    }
}

/// One card cut out of a board: its encoded image and optional type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    image: Vec<u8>,
    card_type: Option<CardType>,
}

impl Card {
    /// An unclassified card, as produced by cropping.
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            card_type: None,
        }
    }

    /// The same card tagged with `card_type`.
    pub fn classified(self, card_type: CardType) -> Self {
        Self {
            card_type: Some(card_type),
            ..self
        }
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn card_type(&self) -> Option<CardType> {
        self.card_type
    }

    pub fn into_image(self) -> Vec<u8> {
        self.image
    }
}

/// An uploaded board: grid shape, encoded image, and the cards cut from it.
#[derive(Debug, Clone)]
pub struct Board {
    id: Option<BoardId>,
    sizing: Sizing,
    image: Vec<u8>,
    cards: Vec<Card>,
}

impl Board {
    /// A board that has not been persisted yet (no id, no cards).
    pub fn new(sizing: Sizing, image: Vec<u8>) -> Self {
        Self {
            id: None,
            sizing,
            image,
            cards: Vec::new(),
        }
    }

    /// Rebuild a persisted board from its stored parts.
    pub fn restore(id: BoardId, sizing: Sizing, image: Vec<u8>, cards: Vec<Card>) -> Self {
        Self {
            id: Some(id),
            sizing,
            image,
            cards,
        }
    }

    pub fn id(&self) -> Option<BoardId> {
        self.id
    }

    pub fn sizing(&self) -> Sizing {
        self.sizing
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Append cards after the existing ones, preserving their order.
    pub fn extend_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    /// A new board with the same id, sizing and cards but a different image.
    pub fn with_image(&self, image: Vec<u8>) -> Self {
        Self {
            id: self.id,
            sizing: self.sizing,
            image,
            cards: self.cards.clone(),
        }
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}
