// SPDX-License-Identifier: MIT

//! Intersection merge: copy translations from a complete catalog into the
//! matching entries of a subset catalog.
//!
//! The merge refuses to run unless both catalogs declare the same plural
//! grammar — under mismatched plural arithmetic a plural-index-3 translation
//! could land in a catalog with two slots. Per entry, a slot-count guard
//! tolerates catalogs whose generators emitted inconsistent plural arity:
//! mismatched entries are left untouched and counted, never merged.

use crate::catalog::Catalog;
use crate::plural::{parse_plural_forms, FormatError, PluralFormSpec};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("{side} catalog: {source}")]
    Format {
        side: &'static str,
        source: FormatError,
    },
    #[error(
        "catalogs are not plural-compatible: `{complete}` vs `{subset}`"
    )]
    IncompatibleCatalogs { complete: String, subset: String },
}

/// Per-entry outcome counts of a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Entries whose translations were taken from the complete catalog,
    /// plus one for the header block (reporting symmetry with the total).
    pub translated: usize,
    /// Entries the complete catalog could not fill: missing counterpart or
    /// mismatched slot arity.
    pub untranslated: usize,
}

/// Parse and compare both plural grammars, then merge entry by entry.
///
/// Mutates `subset` in place; its (context, msgid) set and iteration order
/// are unchanged — only msgstr content moves.
pub fn merge(complete: &Catalog, subset: &mut Catalog) -> Result<MergeStats, MergeError> {
    let complete_spec = plural_spec(complete, "complete")?;
    let subset_spec = plural_spec(subset, "subset")?;
    if complete_spec != subset_spec {
        return Err(MergeError::IncompatibleCatalogs {
            complete: complete.plural_forms().unwrap_or_default().trim().to_string(),
            subset: subset.plural_forms().unwrap_or_default().trim().to_string(),
        });
    }

    let mut stats = MergeStats::default();
    if subset.has_header() {
        // The reserved header entry is skipped but still counted.
        stats.translated += 1;
    }

    for entry in subset.iter_mut() {
        match complete.get(&entry.context, &entry.msgid) {
            Some(donor) if donor.slots().len() == entry.slots().len() => {
                for (slot, value) in entry.slots_mut().iter_mut().zip(donor.slots()) {
                    slot.clone_from(value);
                }
                stats.translated += 1;
            }
            _ => stats.untranslated += 1,
        }
    }

    Ok(stats)
}

fn plural_spec(catalog: &Catalog, side: &'static str) -> Result<PluralFormSpec, MergeError> {
    let header = catalog
        .plural_forms()
        .ok_or(MergeError::Format {
            side,
            source: FormatError::Missing,
        })?;
    parse_plural_forms(header).map_err(|source| MergeError::Format { side, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse;

    const GERMANIC: &str = "\"Plural-Forms: nplurals=2; plural=(n != 1);\\n\"\n";

    fn catalog(body: &str) -> Catalog {
        let source = format!("msgid \"\"\nmsgstr \"\"\n{GERMANIC}\n{body}");
        parse(&source).expect("test catalog parses")
    }

    #[test]
    fn fills_untranslated_entries() {
        let complete = catalog(concat!(
            "msgid \"cat\"\n",
            "msgid_plural \"cats\"\n",
            "msgstr[0] \"Katze\"\n",
            "msgstr[1] \"Katzen\"\n",
        ));
        let mut subset = catalog(concat!(
            "msgid \"cat\"\n",
            "msgid_plural \"cats\"\n",
            "msgstr[0] \"\"\n",
            "msgstr[1] \"\"\n",
        ));

        let stats = merge(&complete, &mut subset).unwrap();
        assert_eq!(stats.translated, 2); // header + entry
        assert_eq!(stats.untranslated, 0);
        assert_eq!(
            subset.get("", "cat").unwrap().slots(),
            ["Katze", "Katzen"]
        );
    }

    #[test]
    fn self_merge_is_identity() {
        let reference = catalog("msgid \"a\"\nmsgstr \"1\"\n\nmsgid \"b\"\nmsgstr \"\"\n");
        let mut target = reference.clone();

        let stats = merge(&reference, &mut target).unwrap();
        assert_eq!(target, reference);
        assert_eq!(stats.untranslated, 0);
        assert_eq!(stats.translated, 3); // header + two entries
    }

    #[test]
    fn missing_counterpart_is_counted_not_merged() {
        let complete = catalog("msgid \"a\"\nmsgstr \"1\"\n");
        let mut subset = catalog("msgid \"other\"\nmsgstr \"\"\n");

        let stats = merge(&complete, &mut subset).unwrap();
        assert_eq!(stats.untranslated, 1);
        assert_eq!(subset.get("", "other").unwrap().slots(), [""]);
    }

    #[test]
    fn arity_mismatch_is_left_untouched() {
        // Same key, but the donor claims three plural slots.
        let complete = catalog(concat!(
            "msgid \"cat\"\n",
            "msgid_plural \"cats\"\n",
            "msgstr[0] \"a\"\n",
            "msgstr[1] \"b\"\n",
            "msgstr[2] \"c\"\n",
        ));
        let mut subset = catalog(concat!(
            "msgid \"cat\"\n",
            "msgid_plural \"cats\"\n",
            "msgstr[0] \"\"\n",
            "msgstr[1] \"\"\n",
        ));

        let stats = merge(&complete, &mut subset).unwrap();
        assert_eq!(stats.untranslated, 1);
        assert_eq!(subset.get("", "cat").unwrap().slots(), ["", ""]);
    }

    #[test]
    fn context_is_part_of_the_key() {
        let complete = catalog("msgctxt \"menu\"\nmsgid \"Open\"\nmsgstr \"Öffnen\"\n");
        let mut subset = catalog("msgid \"Open\"\nmsgstr \"\"\n");

        let stats = merge(&complete, &mut subset).unwrap();
        assert_eq!(stats.untranslated, 1);
        assert_eq!(subset.get("", "Open").unwrap().slots(), [""]);
    }

    #[test]
    fn incompatible_plural_grammars_abort() {
        let complete = catalog("msgid \"a\"\nmsgstr \"1\"\n");
        let source = concat!(
            "msgid \"\"\n",
            "msgstr \"\"\n",
            "\"Plural-Forms: nplurals=3; plural=(n==0?0:n==1?1:2);\\n\"\n",
            "\n",
            "msgid \"a\"\n",
            "msgstr \"\"\n",
        );
        let mut subset = parse(source).unwrap();
        let before = subset.clone();

        let err = merge(&complete, &mut subset).unwrap_err();
        assert!(matches!(err, MergeError::IncompatibleCatalogs { .. }));
        assert_eq!(subset, before, "no partial merge on failure");
    }

    #[test]
    fn equivalent_headers_with_different_spelling_merge() {
        let complete = catalog("msgid \"a\"\nmsgstr \"1\"\n");
        let source = concat!(
            "msgid \"\"\n",
            "msgstr \"\"\n",
            "\"Plural-Forms: nplurals=2;plural=n!=1\\n\"\n",
            "\n",
            "msgid \"a\"\n",
            "msgstr \"\"\n",
        );
        let mut subset = parse(source).unwrap();

        let stats = merge(&complete, &mut subset).unwrap();
        assert_eq!(stats.translated, 2);
        assert_eq!(subset.get("", "a").unwrap().slots(), ["1"]);
    }

    #[test]
    fn missing_plural_forms_header_fails() {
        let complete = parse("msgid \"a\"\nmsgstr \"1\"\n").unwrap();
        let mut subset = catalog("msgid \"a\"\nmsgstr \"\"\n");
        let err = merge(&complete, &mut subset).unwrap_err();
        assert!(matches!(
            err,
            MergeError::Format {
                side: "complete",
                source: FormatError::Missing
            }
        ));
    }
}
