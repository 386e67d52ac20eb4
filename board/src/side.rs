//! Open-ended side (team) model.
//!
//! The two primary sides are white and black, distinguished in the
//! position notation by symbol case. Further sides can be registered at
//! runtime the same way dynamic piece prototypes are; they carry display
//! records only, since the notation has no way to mark their pieces.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An interned side identifier. Cheap to clone, compared by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Side(Arc<str>);

impl Side {
    pub fn white() -> Self {
        Self(Arc::from("white"))
    }

    pub fn black() -> Self {
        Self(Arc::from("black"))
    }

    pub fn new(name: &str) -> Self {
        Self(Arc::from(name.to_ascii_lowercase().as_str()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_white(&self) -> bool {
        &*self.0 == "white"
    }

    pub fn is_black(&self) -> bool {
        &*self.0 == "black"
    }

    /// The side that answers this one. White and black oppose each
    /// other; any third-party side is treated as opposing white.
    pub fn opponent(&self) -> Side {
        if self.is_white() {
            Side::black()
        } else {
            Side::white()
        }
    }

    /// Resolve a side-to-move token from the position notation.
    pub fn from_notation_token(token: &str) -> Option<Side> {
        match token {
            "w" => Some(Side::white()),
            "b" => Some(Side::black()),
            _ => None,
        }
    }

    /// The token this side writes into the side-to-move field.
    pub fn notation_token(&self) -> char {
        if self.is_black() {
            'b'
        } else if self.is_white() {
            'w'
        } else {
            self.0.chars().next().unwrap_or('w')
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display record for a registered side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideRecord {
    pub side: Side,
    pub letter: char,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SideRegistryError {
    #[error("side '{0}' is already registered")]
    AlreadyRegistered(String),
}

/// Registry of known sides. White and black are pre-seeded; additional
/// teams are write-once, mirroring the piece registry.
#[derive(Debug, Clone)]
pub struct SideRegistry {
    records: HashMap<Side, SideRecord>,
}

impl SideRegistry {
    pub fn new() -> Self {
        let mut records = HashMap::new();
        for (side, letter, name) in [
            (Side::white(), 'w', "White"),
            (Side::black(), 'b', "Black"),
        ] {
            records.insert(
                side.clone(),
                SideRecord {
                    side,
                    letter,
                    display_name: name.to_string(),
                },
            );
        }
        Self { records }
    }

    pub fn register(&mut self, record: SideRecord) -> Result<(), SideRegistryError> {
        if self.records.contains_key(&record.side) {
            return Err(SideRegistryError::AlreadyRegistered(
                record.side.name().to_string(),
            ));
        }
        self.records.insert(record.side.clone(), record);
        Ok(())
    }

    pub fn get(&self, side: &Side) -> Option<&SideRecord> {
        self.records.get(side)
    }

    pub fn sides(&self) -> impl Iterator<Item = &Side> {
        self.records.keys()
    }
}

impl Default for SideRegistry {
    fn default() -> Self {
        Self::new()
    }
}
