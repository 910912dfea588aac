//! Data models shared by the parser, resolver and drivers.

mod category;
mod identifier;
mod ids;
mod identity;
mod outcome;

pub use category::{Category, ParseMode};
pub use identifier::{Field, MocapTask, RawIdentifier, TaskKind};
pub use ids::{normalize_id, zero_pad};
pub use identity::{Demographics, ResolvedIdentity, SexCode};
pub use outcome::ConversionOutcome;
