//! Lineup import: recognise text in a lineup image and turn it into
//! player records for the board.

mod extract;
mod ocr;
mod processor;
mod reference;

pub use extract::{clean_player_name, Extraction, ExtractionSource, LineupExtractor};
pub use ocr::{TesseractCli, TextRecognizer};
pub use processor::LineupProcessor;
pub use reference::reference_lineup;

use crate::drawing::{Point, TeamSide};

/// Fewest records an extraction pass needs before its result is used.
pub const MIN_USABLE_RECORDS: usize = 6;

/// One detected player. `position` is relative to the playable area.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub side: TeamSide,
    pub name: Option<String>,
    pub number: Option<String>,
    pub position: Point,
}
