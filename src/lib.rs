// A two-board audio deck: an 8-track style transport with cue-confirmed buttons, and a
// lie-detector sonification board that maps subject states to ambient loop parameters.

pub mod audio;
pub mod audio_api;
pub mod channel;
pub mod config;
pub mod error;
pub mod loader;
pub mod middle;
pub mod shared;
pub mod sonification;
pub mod transport;
pub mod tui;

pub use error::{DeckError, Result};
pub use middle::{Deck, Middle};
