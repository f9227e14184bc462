// SPDX-License-Identifier: MIT

//! Round-trip fidelity over a realistic catalog: comments, flags, contexts,
//! multi-line strings, plural blocks, and a trailing obsolete section all
//! survive parse → serialize unchanged.

use po_mend::catalog::{parse, serialize};

const REALISTIC: &str = concat!(
    "# German translations for demo.\n",
    "# Copyright (C) 2024 THE PACKAGE'S COPYRIGHT HOLDER\n",
    "msgid \"\"\n",
    "msgstr \"\"\n",
    "\"Project-Id-Version: demo 1.4\\n\"\n",
    "\"Language: de\\n\"\n",
    "\"MIME-Version: 1.0\\n\"\n",
    "\"Content-Type: text/plain; charset=UTF-8\\n\"\n",
    "\"Plural-Forms: nplurals=2; plural=(n != 1);\\n\"\n",
    "\n",
    "#: src/main.c:52\n",
    "#, c-format\n",
    "msgid \"Hello, %s!\"\n",
    "msgstr \"Hallo, %s!\"\n",
    "\n",
    "#. A button label.\n",
    "msgctxt \"toolbar\"\n",
    "msgid \"Open\"\n",
    "msgstr \"Öffnen\"\n",
    "\n",
    "#: src/files.c:101\n",
    "msgid \"%d file removed\"\n",
    "msgid_plural \"%d files removed\"\n",
    "msgstr[0] \"%d Datei entfernt\"\n",
    "msgstr[1] \"%d Dateien entfernt\"\n",
    "\n",
    "msgid \"usage\"\n",
    "msgstr \"\"\n",
    "\"Erste Zeile\\n\"\n",
    "\"Zweite Zeile\\n\"\n",
    "\n",
    "#~ msgid \"legacy\"\n",
    "#~ msgstr \"veraltet\"\n",
);

#[test]
fn byte_for_byte_round_trip() {
    let catalog = parse(REALISTIC).expect("realistic catalog parses");
    assert_eq!(serialize(&catalog), REALISTIC);
}

#[test]
fn structural_round_trip() {
    let catalog = parse(REALISTIC).unwrap();
    let reparsed = parse(&serialize(&catalog)).unwrap();
    assert_eq!(reparsed, catalog);
}

#[test]
fn structure_is_fully_recovered() {
    let catalog = parse(REALISTIC).unwrap();

    assert_eq!(catalog.headers.len(), 5);
    assert_eq!(catalog.header_comments.len(), 2);
    assert_eq!(catalog.entry_count(), 4);
    assert_eq!(catalog.trailing.len(), 2);

    let greeting = catalog.get("", "Hello, %s!").unwrap();
    assert_eq!(greeting.comments, ["#: src/main.c:52", "#, c-format"]);

    let open = catalog.get("toolbar", "Open").unwrap();
    assert_eq!(open.slots(), ["Öffnen"]);

    let files = catalog.get("", "%d file removed").unwrap();
    assert_eq!(files.msgid_plural(), Some("%d files removed"));

    let usage = catalog.get("", "usage").unwrap();
    assert_eq!(usage.slots(), ["Erste Zeile\nZweite Zeile\n"]);
}

#[test]
fn serialization_is_deterministic() {
    let catalog = parse(REALISTIC).unwrap();
    assert_eq!(serialize(&catalog), serialize(&catalog.clone()));
}
