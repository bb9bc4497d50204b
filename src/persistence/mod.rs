//! Save/load persistence
//!
//! Features:
//! - One named slot holding a camelCase JSON record
//! - Full validation on load; persisted data is untrusted
//! - A failed load never yields a partial session
//! - Pluggable backends (memory, file, LocalStorage)

mod storage;

use serde::{Deserialize, Serialize};

use crate::consts::SUPPORTED_GRID_SIZES;
use crate::sim::{Board, BoardError, GamePhase, Session, Tile};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::MemoryStorage;

/// Backend failure
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage rejected the request: {0}")]
    Rejected(String),
}

/// Why a save couldn't be restored
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no saved game")]
    NoSave,
    #[error("could not read save: {0}")]
    Storage(#[from] StorageError),
    #[error("malformed save: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported grid size {0}")]
    UnsupportedGridSize(usize),
    #[error("level {0} is below 1")]
    InvalidLevel(u32),
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
}

/// Why a save couldn't be written
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("could not encode save: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("could not write save: {0}")]
    Storage(#[from] StorageError),
}

/// A single named persistence slot
pub trait SlotStorage {
    /// Raw slot contents, `None` if nothing was ever written
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the slot contents
    fn write(&mut self, data: &str) -> Result<(), StorageError>;
}

fn default_sounds_enabled() -> bool {
    true
}

/// On-disk form of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub grid_size: usize,
    pub level: u32,
    pub moves: u32,
    pub seconds: u64,
    pub board: Vec<Tile>,
    #[serde(default = "default_sounds_enabled")]
    pub sounds_enabled: bool,
}

impl SaveRecord {
    pub fn from_session(session: &Session) -> Self {
        Self {
            grid_size: session.grid_size(),
            level: session.level,
            moves: session.moves,
            seconds: session.seconds,
            board: session.board.tiles().to_vec(),
            sounds_enabled: session.sounds_enabled,
        }
    }

    /// Validate into a restored (Idle) session
    pub fn into_session(self) -> Result<Session, LoadError> {
        if !SUPPORTED_GRID_SIZES.contains(&self.grid_size) {
            return Err(LoadError::UnsupportedGridSize(self.grid_size));
        }
        if self.level < 1 {
            return Err(LoadError::InvalidLevel(self.level));
        }
        let board = Board::from_tiles(self.grid_size, self.board)?;

        Ok(Session {
            level: self.level,
            moves: self.moves,
            seconds: self.seconds,
            board,
            sounds_enabled: self.sounds_enabled,
            has_save: true,
            phase: GamePhase::Idle,
        })
    }
}

/// Serialize a session for the save slot
pub fn encode(session: &Session) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&SaveRecord::from_session(session))?)
}

/// Parse and validate raw slot contents
pub fn decode(raw: &str) -> Result<Session, LoadError> {
    let record: SaveRecord = serde_json::from_str(raw)?;
    record.into_session()
}

/// Read and decode the slot
pub fn load_from<S: SlotStorage + ?Sized>(storage: &S) -> Result<Session, LoadError> {
    let raw = storage.read()?.ok_or(LoadError::NoSave)?;
    decode(&raw)
}

/// Encode and write the session to the slot
pub fn save_to<S: SlotStorage + ?Sized>(
    storage: &mut S,
    session: &Session,
) -> Result<(), SaveError> {
    let json = encode(session)?;
    storage.write(&json)?;
    Ok(())
}
