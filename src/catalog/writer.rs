// SPDX-License-Identifier: MIT

//! Serializer for the textual PO grammar.
//!
//! Total over any well-formed [`Catalog`]: emits the header entry first,
//! then every translation entry in stored order, one blank line between
//! entries, comments verbatim. Strings containing newlines are written in
//! the standard msgfmt shape (`msgid ""` followed by one quoted segment per
//! line) so that `parse(serialize(c)) == c`.

use super::{Catalog, Entry, Message};

/// Render a catalog back to PO text.
pub fn serialize(catalog: &Catalog) -> String {
    let mut out = String::new();
    let mut first = true;

    if catalog.has_header() || !catalog.header_comments.is_empty() {
        for comment in &catalog.header_comments {
            out.push_str(comment);
            out.push('\n');
        }
        write_field(&mut out, "msgid", "");
        write_field(&mut out, "msgstr", &header_block(catalog));
        first = false;
    }

    for entry in catalog.iter() {
        if !first {
            out.push('\n');
        }
        first = false;
        write_entry(&mut out, entry);
    }

    if !catalog.trailing.is_empty() {
        if !first {
            out.push('\n');
        }
        for line in &catalog.trailing {
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

/// Reassemble the header entry's msgstr block from the ordered field map.
fn header_block(catalog: &Catalog) -> String {
    let mut block = String::new();
    for (name, value) in &catalog.headers {
        block.push_str(name);
        block.push(':');
        block.push_str(value);
        block.push('\n');
    }
    block
}

fn write_entry(out: &mut String, entry: &Entry) {
    for comment in &entry.comments {
        out.push_str(comment);
        out.push('\n');
    }
    if !entry.context.is_empty() {
        write_field(out, "msgctxt", &entry.context);
    }
    write_field(out, "msgid", &entry.msgid);
    match &entry.message {
        Message::Singular { msgstr } => {
            write_field(out, "msgstr", msgstr);
        }
        Message::Plural {
            msgid_plural,
            msgstr,
        } => {
            write_field(out, "msgid_plural", msgid_plural);
            for (idx, slot) in msgstr.iter().enumerate() {
                write_field(out, &format!("msgstr[{idx}]"), slot);
            }
        }
    }
}

fn write_field(out: &mut String, keyword: &str, value: &str) {
    out.push_str(keyword);
    if value.contains('\n') {
        // Multi-line: empty first string, then one quoted segment per line.
        out.push_str(" \"\"\n");
        for segment in value.split_inclusive('\n') {
            out.push('"');
            escape_into(segment, out);
            out.push_str("\"\n");
        }
    } else {
        out.push_str(" \"");
        escape_into(value, out);
        out.push_str("\"\n");
    }
}

/// Escape a string for a quoted PO chunk.
fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
}
