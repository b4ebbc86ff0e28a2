//! reelscore notation - the score document model and its MusicXML codec.
//!
//! This crate provides:
//!
//! - **Model** - [`Score`], [`Part`], [`Measure`] and the [`Element`] sum type
//!   (directions, attributes, barlines, print hints, opaque notes)
//! - **Edits** - structural operations on measures used while assembling a
//!   composition (tempo/time/system-text placement, barline replacement,
//!   page and line breaks)
//! - **Text extraction** - all user-visible strings of a score, for matching
//! - **Codec** - partwise MusicXML text <-> model, and `.mxl` container unpacking
//!
//! # Example
//!
//! ```
//! use reelscore_notation::{codec, Measure, Score};
//!
//! let score = Score::new()
//!     .with_title("Misterioso")
//!     .with_composer("Langey")
//!     .with_part("P1", vec![Measure::new().with_rehearsal_mark("A").with_rest()]);
//!
//! let text = codec::encode(&score).unwrap();
//! let decoded = codec::decode(&text).unwrap();
//! assert_eq!(decoded.composer(), "Langey");
//! ```

pub mod codec;
pub mod error;
pub mod measure;
pub mod model;
pub mod node;
pub mod score;

pub use error::{Error, Result};
pub use model::*;
pub use node::{XmlContent, XmlNode};
pub use score::measure_text;
