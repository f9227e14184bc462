// SPDX-License-Identifier: MIT

//! In-memory model of a gettext PO catalog.
//!
//! A [`Catalog`] holds the header block (the reserved entry with an empty
//! msgid) as an ordered name → value map, plus every translation entry keyed
//! by (context, msgid). Both levels use insertion-ordered maps so that merge
//! reports and serialization are reproducible run-to-run and a parse →
//! serialize round trip reproduces the input file.
//!
//! Entries are singular or plural at the type level ([`Message`]); a plural
//! entry carries its `msgid_plural` together with the msgstr slots, so there
//! is no "optional field present but empty vector" state to mis-handle.

pub mod parser;
pub mod writer;

pub use parser::{parse, ParseError};
pub use writer::serialize;

use indexmap::IndexMap;

/// Name of the header field carrying the plural grammar declaration.
pub const PLURAL_FORMS_HEADER: &str = "Plural-Forms";

/// Singular or plural translation payload of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Entry without `msgid_plural`: exactly one msgstr slot.
    Singular { msgstr: String },
    /// Entry with `msgid_plural`: one msgstr slot per declared plural form.
    Plural {
        msgid_plural: String,
        msgstr: Vec<String>,
    },
}

/// One translatable message from a PO file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// msgctxt; empty string means the default context.
    pub context: String,
    pub msgid: String,
    pub message: Message,
    /// Raw comment lines (`#`, `#.`, `#:`, `#,`, `#|`, `#~`) preceding the
    /// entry, preserved verbatim for round-trip fidelity. An empty string
    /// records a blank line inside or after the comment block.
    pub comments: Vec<String>,
    /// 1-based source line of the `msgid` keyword, recorded by the parser.
    pub line: usize,
}

impl Entry {
    /// The msgstr slots, uniformly as a slice (length 1 for singular).
    pub fn slots(&self) -> &[String] {
        match &self.message {
            Message::Singular { msgstr } => std::slice::from_ref(msgstr),
            Message::Plural { msgstr, .. } => msgstr,
        }
    }

    /// Mutable view of the msgstr slots.
    pub fn slots_mut(&mut self) -> &mut [String] {
        match &mut self.message {
            Message::Singular { msgstr } => std::slice::from_mut(msgstr),
            Message::Plural { msgstr, .. } => msgstr,
        }
    }

    /// The plural source key, if this is a plural entry.
    pub fn msgid_plural(&self) -> Option<&str> {
        match &self.message {
            Message::Singular { .. } => None,
            Message::Plural { msgid_plural, .. } => Some(msgid_plural),
        }
    }

    /// Whether this entry is marked fuzzy via a `#,` flag comment.
    pub fn is_fuzzy(&self) -> bool {
        self.comments.iter().any(|c| {
            c.strip_prefix("#,")
                .map(|flags| flags.split(',').any(|f| f.trim() == "fuzzy"))
                .unwrap_or(false)
        })
    }
}

/// A parsed PO catalog: header block plus ordered translation entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Header fields from the reserved entry, in file order. Values keep
    /// their original spacing after the colon, and a continuation line
    /// without a colon stays attached to the previous field's value, so the
    /// block serializes back to its original bytes.
    pub headers: IndexMap<String, String>,
    /// Comment lines attached to the header entry, verbatim.
    pub header_comments: Vec<String>,
    /// context → msgid → entry, both insertion-ordered.
    pub entries: IndexMap<String, IndexMap<String, Entry>>,
    /// Comment/obsolete lines after the final entry, verbatim.
    pub trailing: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry by (context, msgid).
    pub fn get(&self, context: &str, msgid: &str) -> Option<&Entry> {
        self.entries.get(context).and_then(|m| m.get(msgid))
    }

    /// Mutable lookup by (context, msgid).
    pub fn get_mut(&mut self, context: &str, msgid: &str) -> Option<&mut Entry> {
        self.entries.get_mut(context).and_then(|m| m.get_mut(msgid))
    }

    /// Insert an entry under its (context, msgid) key.
    ///
    /// Returns the previous entry if the key was already present; the parser
    /// treats that as a hard error, so post-parse catalogs never collide.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        self.entries
            .entry(entry.context.clone())
            .or_default()
            .insert(entry.msgid.clone(), entry)
    }

    /// Total number of translation entries (the header block not included).
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(IndexMap::len).sum()
    }

    /// Whether the file carried a header entry at all.
    pub fn has_header(&self) -> bool {
        !self.headers.is_empty()
    }

    /// The raw `Plural-Forms` header value, if declared.
    pub fn plural_forms(&self) -> Option<&str> {
        self.headers.get(PLURAL_FORMS_HEADER).map(String::as_str)
    }

    /// Iterate all entries in stored order: contexts in file order, msgids in
    /// file order within each context.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values().flat_map(IndexMap::values)
    }

    /// Mutable iteration in the same deterministic order as [`Self::iter`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.entries.values_mut().flat_map(IndexMap::values_mut)
    }
}
