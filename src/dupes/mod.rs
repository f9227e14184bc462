// SPDX-License-Identifier: MIT

//! Detection and repair of duplicated plural translations.
//!
//! Some translation pipelines copy one plural slot into every slot of an
//! entry, which reads fine for one quantity and wrong for all others. An
//! entry is defective when two distinct plural indices hold the same
//! non-empty value; empty slots mean "not yet translated" and never match.
//!
//! Real-world plural grammars rarely exceed six forms, so the per-entry scan
//! is a pairwise O(k²) pass over the slots.

use crate::catalog::{Catalog, Entry};
use serde::Serialize;

/// What a [`Defect`] reports in its `failed` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefectKind {
    Duplicate,
}

/// One defective plural entry, shaped for one-JSON-object-per-line output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Defect {
    /// Catalog the defect was found in.
    pub file: String,
    /// Source line of the entry's msgid keyword.
    pub line: usize,
    pub failed: DefectKind,
    /// `[msgid, msgid_plural]`.
    pub pair: (String, String),
    /// Context key, needed to find the entry again during repair.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub context: String,
}

/// Outcome of attempting to repair one defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair {
    pub defect: Defect,
    /// True iff at least one slot was overwritten from the reference.
    pub resolved: bool,
}

fn is_defective(entry: &Entry) -> bool {
    if entry.msgid_plural().is_none() {
        return false;
    }
    let slots = entry.slots();
    for (i, a) in slots.iter().enumerate() {
        if a.is_empty() {
            continue;
        }
        if slots[i + 1..].iter().any(|b| a == b) {
            return true;
        }
    }
    false
}

/// Scan every plural entry (the header block has none) for duplicated
/// non-empty slots.
pub fn detect(catalog: &Catalog, file: &str) -> Vec<Defect> {
    catalog
        .iter()
        .filter(|entry| is_defective(entry))
        .map(|entry| Defect {
            file: file.to_string(),
            line: entry.line,
            failed: DefectKind::Duplicate,
            pair: (
                entry.msgid.clone(),
                entry.msgid_plural().unwrap_or_default().to_string(),
            ),
            context: entry.context.clone(),
        })
        .collect()
}

/// Repair defects in `catalog` from `reference`, in place.
///
/// Each defective slot is overwritten with the reference entry's value at
/// the same index, but only where the reference value is non-empty — a
/// repair never regresses a translated slot back to empty. Defects without
/// a usable reference entry stay flagged unresolved.
pub fn repair(catalog: &mut Catalog, reference: &Catalog, file: &str) -> Vec<Repair> {
    detect(catalog, file)
        .into_iter()
        .map(|defect| {
            let resolved = apply(catalog, reference, &defect);
            Repair { defect, resolved }
        })
        .collect()
}

fn apply(catalog: &mut Catalog, reference: &Catalog, defect: &Defect) -> bool {
    let Some(donor) = reference.get(&defect.context, &defect.pair.0) else {
        return false;
    };
    let Some(entry) = catalog.get_mut(&defect.context, &defect.pair.0) else {
        return false;
    };
    let mut touched = false;
    for (slot, value) in entry.slots_mut().iter_mut().zip(donor.slots()) {
        if !value.is_empty() && slot != value {
            slot.clone_from(value);
            touched = true;
        }
    }
    touched
}
