//! Joins parsed identifiers with the lookup tables.
//!
//! Absent lookups are normal and leave the corresponding field empty. The
//! only failure is a missing *required* field, checked per driver with
//! [`require`] against one of the field sets below.

use crate::lookup::LookupTables;
use crate::models::{Field, RawIdentifier, ResolvedIdentity};
use crate::{Error, Result};

/// Recordings need a subject and a session to build a BIDS path.
pub const RECORDING_FIELDS: &[Field] = &[Field::Subject, Field::Session];

/// Artworks drawn together.
pub const TOGETHER_FIELDS: &[Field] = &[Field::Dyad, Field::Session, Field::TaskNum];

/// Artworks drawn alone.
pub const SOLO_FIELDS: &[Field] = &[Field::Dyad, Field::Session, Field::Subject];

/// Coordinate folders.
pub const COORDINATES_FIELDS: &[Field] = &[Field::Subject, Field::Session, Field::Dyad];

/// Motion-capture tables.
pub const MOCAP_FIELDS: &[Field] = &[Field::Dyad, Field::Session, Field::TaskNum];

/// Resolves identifiers against read-only lookup tables.
#[derive(Debug, Clone, Copy)]
pub struct MetadataResolver<'a> {
    tables: &'a LookupTables,
}

impl<'a> MetadataResolver<'a> {
    /// Creates a resolver over `tables`.
    #[must_use]
    pub const fn new(tables: &'a LookupTables) -> Self {
        Self { tables }
    }

    /// Produces the output identity for a parsed identifier.
    ///
    /// A dyad already present in the identifier (artwork and motion-capture
    /// names carry it) wins over the subject's dyad table entry.
    #[must_use]
    pub fn resolve(&self, raw: &RawIdentifier) -> ResolvedIdentity {
        let subject = raw.subject.as_deref();

        let dyad = raw.dyad.clone().or_else(|| {
            subject
                .and_then(|s| self.tables.dyads.get(s))
                .map(String::from)
        });

        let demographics = subject
            .zip(raw.session.as_deref())
            .and_then(|(sub, ses)| self.tables.demographics.get(sub, ses))
            .cloned();

        ResolvedIdentity {
            subject: raw.subject.clone(),
            session: raw.session.clone(),
            run: raw.run.clone(),
            acquisition_label: dyad.as_ref().map(|d| format!("dyad{d}")),
            dyad,
            task_num: raw.task_num.clone(),
            task_kind: raw.task_kind,
            demographics,
        }
    }
}

/// Checks that every required field is present.
///
/// The error names exactly the missing keys.
pub fn require(identity: &ResolvedIdentity, required: &[Field], context: &str) -> Result<()> {
    let missing = identity.missing(required);
    if missing.is_empty() {
        return Ok(());
    }
    Err(Error::MissingFields {
        context: context.to_string(),
        missing: missing.iter().map(|f| f.as_str().to_string()).collect(),
    })
}
