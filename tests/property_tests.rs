//! Property-based tests for identifier parsing.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Padding and normalisation agree on the same integer
//! - Input padding never leaks into parsed identifiers
//! - Session letters map to runs
//! - Tag case does not matter
//! - Canonical names are stable under re-resolution

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use nirs_bids::converters::artwork_destination;
use nirs_bids::lookup::{DyadTable, LookupTables};
use nirs_bids::models::{MocapTask, ParseMode, TaskKind, normalize_id, zero_pad};
use nirs_bids::parser::{DEFAULT_RUN, FilenameParser, parse_run};
use nirs_bids::resolver::MetadataResolver;
use proptest::prelude::*;

// ============================================================================
// Identifier canonicalisation
// ============================================================================

proptest! {
    /// Property: `zero_pad` always yields at least two digits.
    #[test]
    fn prop_zero_pad_min_width(n in 0u64..100_000) {
        let padded = zero_pad(&n.to_string()).unwrap();
        prop_assert!(padded.len() >= 2);
        prop_assert_eq!(padded.parse::<u64>().unwrap(), n);
    }

    /// Property: leading zeros in the input do not change the result.
    #[test]
    fn prop_leading_zeros_ignored(n in 0u64..100_000, zeros in 0usize..5) {
        let raw = format!("{}{n}", "0".repeat(zeros));
        prop_assert_eq!(zero_pad(&raw), zero_pad(&n.to_string()));
        prop_assert_eq!(normalize_id(&raw), Some(n.to_string()));
    }

    /// Property: normalising a padded id gives back the plain integer.
    #[test]
    fn prop_normalize_inverts_pad(n in 0u64..100_000) {
        let padded = zero_pad(&n.to_string()).unwrap();
        prop_assert_eq!(normalize_id(&padded), Some(n.to_string()));
        prop_assert_eq!(zero_pad(&padded), Some(padded.clone()));
    }

    /// Property: non-numeric input is rejected by both.
    #[test]
    fn prop_non_numeric_rejected(s in "[a-zA-Z_-][a-zA-Z0-9_-]{0,8}") {
        prop_assert_eq!(zero_pad(&s), None);
        prop_assert_eq!(normalize_id(&s), None);
    }
}

// ============================================================================
// Filename parsing
// ============================================================================

proptest! {
    /// Property: `sub-<n>_session-<m>` always parses, padded, with the default run.
    #[test]
    fn prop_standard_subject_session(sub in 0u64..1000, ses in 0u64..100, zeros in 0usize..3) {
        let table = DyadTable::default();
        let parser = FilenameParser::new(&table);
        let name = format!("sub-{}{sub}_session-{ses}.snirf", "0".repeat(zeros));

        let id = parser.parse_standard(&name).unwrap();
        prop_assert_eq!(id.subject, Some(format!("{sub:02}")));
        prop_assert_eq!(id.session, Some(format!("{ses:02}")));
        prop_assert_eq!(id.run.as_deref(), Some(DEFAULT_RUN));
        prop_assert_eq!(id.dyad, None);
    }

    /// Property: the session letter is the run, counted from `a`.
    #[test]
    fn prop_session_letter_is_run(letter in prop::char::range('a', 'z'), upper in any::<bool>(), ses in 1u64..10) {
        let letter = if upper { letter.to_ascii_uppercase() } else { letter };
        let name = format!("sub-3_session-{letter}_{ses}.snirf");
        let expected = u32::from(letter.to_ascii_lowercase()) - u32::from('a') + 1;

        prop_assert_eq!(parse_run(&name), format!("{expected:02}"));

        let table = DyadTable::default();
        let id = FilenameParser::new(&table).parse_standard(&name).unwrap();
        prop_assert_eq!(id.session, Some(format!("{ses:02}")));
    }

    /// Property: tag words match regardless of case.
    #[test]
    fn prop_tags_case_insensitive(sub in 1u64..500, ses in 1u64..10, upper in any::<bool>()) {
        let lower = format!("sub-{sub}_ses-{ses}.snirf");
        let name = if upper { lower.to_uppercase() } else { lower.clone() };

        let table = DyadTable::default();
        let parser = FilenameParser::new(&table);
        prop_assert_eq!(parser.parse_standard(&name), parser.parse_standard(&lower));
    }

    /// Property: names without a subject tag never parse in standard mode.
    #[test]
    fn prop_standard_requires_subject(stem in "[a-r0-9_]{0,20}", ses in 1u64..10) {
        let name = format!("{stem}_session-{ses}.snirf");
        prop_assume!(!name.to_lowercase().contains("sub"));

        let table = DyadTable::default();
        prop_assert!(FilenameParser::new(&table).parse_standard(&name).is_none());
    }

    /// Property: motion-capture names accept either separator.
    #[test]
    fn prop_mocap_separators(
        dyad in 1000u64..2000,
        ses in 1u64..10,
        task in 1u64..5,
        sep in prop::sample::select(vec!["_", "-", "__"]),
    ) {
        let name = format!("dyad-{dyad}{sep}session-{ses}{sep}task-{task}.csv");
        let table = DyadTable::default();
        let id = FilenameParser::new(&table).parse(ParseMode::MoCap, &name).unwrap();

        prop_assert_eq!(id.dyad, Some(dyad.to_string()));
        prop_assert_eq!(id.session, Some(format!("{ses:02}")));
        let task_num = id.task_num.unwrap();
        prop_assert!(MocapTask::from_number(&task_num).is_some());
    }
}

// ============================================================================
// Resolution
// ============================================================================

proptest! {
    /// Property: a solo artwork resolves to the dyad listed for its subject,
    /// however the subject id is padded in the table or the name.
    #[test]
    fn prop_solo_artwork_uses_table_dyad(sub in 1u64..500, dyad in 1000u64..2000, zeros in 0usize..3) {
        let tables = LookupTables {
            dyads: [(format!("{}{sub}", "0".repeat(zeros)), dyad.to_string())]
                .into_iter()
                .collect(),
            ..LookupTables::empty()
        };
        let parser = FilenameParser::new(&tables.dyads);
        let raw = parser
            .parse_artwork(&format!("sub-{sub}-solo_session-1.jpg"))
            .unwrap();
        prop_assert_eq!(raw.task_kind, TaskKind::Solo);

        let identity = MetadataResolver::new(&tables).resolve(&raw);
        let label = format!("dyad{dyad}");
        prop_assert_eq!(identity.acquisition_label.as_deref(), Some(label.as_str()));

        let (folder, name) = artwork_destination(&identity, ".JPG").unwrap();
        prop_assert_eq!(folder, "alone");
        prop_assert_eq!(
            name,
            format!("sub-{sub:02}_ses-01_acq-dyad{dyad}_task-drawingalone_artwork.jpg")
        );
    }

    /// Property: resolving is a pure function of its input.
    #[test]
    fn prop_resolve_is_deterministic(sub in 1u64..500, ses in 1u64..10) {
        let tables = LookupTables::empty();
        let parser = FilenameParser::new(&tables.dyads);
        let raw = parser.parse_standard(&format!("sub-{sub}_ses-{ses}.snirf")).unwrap();
        let resolver = MetadataResolver::new(&tables);
        prop_assert_eq!(resolver.resolve(&raw), resolver.resolve(&raw));
    }
}
