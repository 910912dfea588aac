//! BIDS layout helpers.
//!
//! Naming, the dataset-level files every BIDS root carries, and the fixes
//! applied after recordings are written:
//!
//! | Item | File |
//! |------|------|
//! | [`BidsPath`] | `sub-*/ses-*/<datatype>/sub-*_ses-*_..._<suffix><ext>` |
//! | [`DatasetDescription`] | `dataset_description.json` |
//! | [`ParticipantsTable`] | `participants.tsv` |
//! | [`patch_coordsystem_sidecars`] | `*_coordsystem.json` |

mod description;
mod index;
mod participants;
mod path;
mod sidecar;
mod tsv;

pub use description::{BIDS_VERSION, DESCRIPTION_FILE, DatasetDescription};
pub use index::{DyadPair, dyad_pairs, recordings_for, sessions_for};
pub use participants::{PARTICIPANTS_FILE, ParticipantsTable, back_fill_participant_ages};
pub use path::BidsPath;
pub use sidecar::{PROCESSING_DESCRIPTION_KEY, patch_coordsystem_sidecars};
pub use tsv::{NA, TsvTable};
