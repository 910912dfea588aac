//! External collaborators.
//!
//! The conversion engine only talks to the outside world through this
//! module: copying bytes, writing JSON sidecars, and reading/writing
//! recordings via [`RecordingBackend`].
//!
//! | Collaborator | Entry point | Used by |
//! |--------------|-------------|---------|
//! | Byte copier | [`copy_with_sidecar`] | artworks, coordinates, motion capture |
//! | JSON sidecars | [`read_json`], [`write_json`] | recordings, finalisation |
//! | Recording reader/writer | [`RecordingBackend`] | recordings |

mod copy;
mod json;
mod recording;

pub use copy::copy_with_sidecar;
pub use json::{read_json, write_json};
pub use recording::{Recording, RecordingBackend, SnirfBackend, HDF5_SIGNATURE};
