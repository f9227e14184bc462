// SPDX-License-Identifier: MIT

//! Line-based parser for the textual PO grammar.
//!
//! Keywords (`msgctxt`, `msgid`, `msgid_plural`, `msgstr`, `msgstr[N]`) start
//! a field; bare quoted lines continue the previous field. Comment lines are
//! kept verbatim so serialization can reproduce them, and the source line of
//! each `msgid` keyword is recorded for defect reporting.

use super::{Catalog, Entry, Message};
use thiserror::Error;

/// Failure to interpret a byte stream as a PO catalog.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected quoted string after `{keyword}`")]
    ExpectedString { line: usize, keyword: String },
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },
    #[error("line {line}: entry has no msgid")]
    MissingMsgid { line: usize },
    #[error("line {line}: entry `{msgid}` has no msgstr")]
    MissingMsgstr { line: usize, msgid: String },
    #[error("line {line}: msgstr[N] used without msgid_plural")]
    PluralWithoutMsgidPlural { line: usize },
    #[error("line {line}: plain msgstr used together with msgid_plural")]
    SingularWithMsgidPlural { line: usize },
    #[error("line {line}: invalid msgstr index")]
    InvalidIndex { line: usize },
    #[error("line {line}: repeated {keyword} in entry")]
    RepeatedField { line: usize, keyword: &'static str },
    #[error("line {line}: duplicate msgstr[{index}]")]
    DuplicateIndex { line: usize, index: usize },
    #[error("line {line}: unexpected content: {content}")]
    UnexpectedContent { line: usize, content: String },
    #[error("line {line}: duplicate entry for msgid `{msgid}` (context `{context}`)")]
    DuplicateEntry {
        line: usize,
        context: String,
        msgid: String,
    },
    #[error("line {line}: malformed header line in the reserved entry")]
    MalformedHeader { line: usize },
    #[error("duplicate header entry (second `msgid \"\"` at line {line})")]
    DuplicateHeader { line: usize },
}

/// Which field a bare continuation string extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrIdx(usize),
}

/// Accumulates one entry's fields before it is sealed into an [`Entry`].
#[derive(Default)]
struct Draft {
    comments: Vec<String>,
    msgctxt: Option<String>,
    msgid: Option<String>,
    msgid_line: usize,
    msgid_plural: Option<String>,
    msgstr: Option<String>,
    msgstr_plural: Vec<(usize, String)>,
    current: Option<Field>,
}

impl Draft {
    fn has_fields(&self) -> bool {
        self.msgctxt.is_some() || self.msgid.is_some() || self.has_msgstr()
    }

    fn has_msgstr(&self) -> bool {
        self.msgstr.is_some() || !self.msgstr_plural.is_empty()
    }

    fn append_current(&mut self, text: &str, line: usize) -> Result<(), ParseError> {
        let target = match self.current {
            Some(Field::Msgctxt) => self.msgctxt.as_mut(),
            Some(Field::Msgid) => self.msgid.as_mut(),
            Some(Field::MsgidPlural) => self.msgid_plural.as_mut(),
            Some(Field::Msgstr) => self.msgstr.as_mut(),
            Some(Field::MsgstrIdx(idx)) => self
                .msgstr_plural
                .iter_mut()
                .find(|(i, _)| *i == idx)
                .map(|(_, s)| s),
            None => None,
        };
        match target {
            Some(s) => {
                s.push_str(text);
                Ok(())
            }
            None => Err(ParseError::UnexpectedContent {
                line,
                content: "continuation string without a preceding field".to_string(),
            }),
        }
    }
}

/// Parse PO catalog text into a [`Catalog`].
pub fn parse(source: &str) -> Result<Catalog, ParseError> {
    Parser::new(source).run()
}

struct Parser<'a> {
    source: &'a str,
    catalog: Catalog,
    draft: Draft,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Parser {
            source,
            catalog: Catalog::new(),
            draft: Draft::default(),
        }
    }

    fn run(mut self) -> Result<Catalog, ParseError> {
        let mut last_line = 0;
        for (idx, raw) in self.source.lines().enumerate() {
            let line = idx + 1;
            last_line = line;
            let trimmed = raw.trim_end();

            if trimmed.is_empty() {
                if self.draft.has_fields() {
                    self.seal(line)?;
                } else {
                    // Blank line around a detached comment block; an empty
                    // comment line records it for serialization.
                    self.draft.comments.push(String::new());
                }
                continue;
            }

            if trimmed.starts_with('#') {
                // A comment after a completed entry opens the next one.
                if self.draft.has_msgstr() {
                    self.seal(line)?;
                }
                self.draft.comments.push(trimmed.to_string());
                continue;
            }

            self.field_line(trimmed, line)?;
        }

        if self.draft.has_fields() {
            self.seal(last_line + 1)?;
        } else if !self.draft.comments.is_empty() {
            // Comments after the last entry, e.g. a trailing obsolete block.
            self.catalog.trailing = std::mem::take(&mut self.draft.comments);
        }

        Ok(self.catalog)
    }

    fn field_line(&mut self, line_text: &str, line: usize) -> Result<(), ParseError> {
        if line_text.starts_with('"') {
            let value = parse_quoted(line_text, line)?;
            return self.draft.append_current(&value, line);
        }

        // A fresh msgctxt/msgid after msgstr content starts the next entry.
        if (line_text.starts_with("msgctxt") || starts_keyword(line_text, "msgid"))
            && self.draft.has_msgstr()
        {
            self.seal(line)?;
        }

        if let Some(rest) = line_text.strip_prefix("msgctxt") {
            if self.draft.msgctxt.is_some() {
                return Err(ParseError::RepeatedField {
                    line,
                    keyword: "msgctxt",
                });
            }
            self.draft.msgctxt = Some(keyword_value(rest, "msgctxt", line)?);
            self.draft.current = Some(Field::Msgctxt);
        } else if let Some(rest) = line_text.strip_prefix("msgid_plural") {
            if self.draft.msgid_plural.is_some() {
                return Err(ParseError::RepeatedField {
                    line,
                    keyword: "msgid_plural",
                });
            }
            self.draft.msgid_plural = Some(keyword_value(rest, "msgid_plural", line)?);
            self.draft.current = Some(Field::MsgidPlural);
        } else if let Some(rest) = line_text.strip_prefix("msgid") {
            if self.draft.msgid.is_some() {
                return Err(ParseError::RepeatedField {
                    line,
                    keyword: "msgid",
                });
            }
            self.draft.msgid = Some(keyword_value(rest, "msgid", line)?);
            self.draft.msgid_line = line;
            self.draft.current = Some(Field::Msgid);
        } else if let Some(rest) = line_text.strip_prefix("msgstr[") {
            let close = rest
                .find(']')
                .ok_or(ParseError::InvalidIndex { line })?;
            let idx: usize = rest[..close]
                .parse()
                .map_err(|_| ParseError::InvalidIndex { line })?;
            if self.draft.msgstr_plural.iter().any(|(i, _)| *i == idx) {
                return Err(ParseError::DuplicateIndex { line, index: idx });
            }
            let value = keyword_value(&rest[close + 1..], "msgstr[N]", line)?;
            self.draft.msgstr_plural.push((idx, value));
            self.draft.current = Some(Field::MsgstrIdx(idx));
        } else if let Some(rest) = line_text.strip_prefix("msgstr") {
            if self.draft.msgstr.is_some() {
                return Err(ParseError::RepeatedField {
                    line,
                    keyword: "msgstr",
                });
            }
            self.draft.msgstr = Some(keyword_value(rest, "msgstr", line)?);
            self.draft.current = Some(Field::Msgstr);
        } else {
            return Err(ParseError::UnexpectedContent {
                line,
                content: line_text.to_string(),
            });
        }
        Ok(())
    }

    /// Validate the accumulated draft and commit it to the catalog.
    fn seal(&mut self, line: usize) -> Result<(), ParseError> {
        let mut draft = std::mem::take(&mut self.draft);

        let msgid = draft.msgid.take().ok_or(ParseError::MissingMsgid { line })?;
        let context = draft.msgctxt.take().unwrap_or_default();

        if !draft.has_msgstr() {
            return Err(ParseError::MissingMsgstr {
                line,
                msgid: msgid.clone(),
            });
        }

        if msgid.is_empty() && context.is_empty() {
            return self.seal_header(draft, line);
        }

        let message = match draft.msgid_plural {
            Some(msgid_plural) => {
                if draft.msgstr.is_some() {
                    return Err(ParseError::SingularWithMsgidPlural { line });
                }
                let mut slots: Vec<String> = Vec::new();
                for (idx, value) in draft.msgstr_plural {
                    if slots.len() <= idx {
                        slots.resize(idx + 1, String::new());
                    }
                    slots[idx] = value;
                }
                Message::Plural {
                    msgid_plural,
                    msgstr: slots,
                }
            }
            None => {
                if !draft.msgstr_plural.is_empty() {
                    return Err(ParseError::PluralWithoutMsgidPlural { line });
                }
                Message::Singular {
                    msgstr: draft.msgstr.unwrap_or_default(),
                }
            }
        };

        let entry = Entry {
            context,
            msgid,
            message,
            comments: draft.comments,
            line: draft.msgid_line,
        };
        if let Some(previous) = self.catalog.insert(entry) {
            return Err(ParseError::DuplicateEntry {
                line,
                context: previous.context,
                msgid: previous.msgid,
            });
        }
        Ok(())
    }

    /// The reserved entry: its msgstr is a block of `Name: value\n` lines.
    fn seal_header(&mut self, draft: Draft, line: usize) -> Result<(), ParseError> {
        if self.catalog.has_header() || !self.catalog.header_comments.is_empty() {
            return Err(ParseError::DuplicateHeader { line });
        }
        let block = draft.msgstr.unwrap_or_default();
        for field_line in block.split('\n') {
            if field_line.is_empty() {
                continue;
            }
            match field_line.split_once(':') {
                Some((name, value)) => {
                    self.catalog
                        .headers
                        .insert(name.to_string(), value.to_string());
                }
                None => {
                    // Continuation of the previous field's value.
                    let (_, prev) = self
                        .catalog
                        .headers
                        .last_mut()
                        .ok_or(ParseError::MalformedHeader { line })?;
                    prev.push('\n');
                    prev.push_str(field_line);
                }
            }
        }
        self.catalog.header_comments = draft.comments;
        Ok(())
    }
}

/// `msgid` must not also match the `msgid_plural` keyword.
fn starts_keyword(line: &str, keyword: &str) -> bool {
    line.strip_prefix(keyword)
        .map(|rest| !rest.starts_with("_plural"))
        .unwrap_or(false)
}

/// The quoted value following a keyword, e.g. `msgid "cat"`.
fn keyword_value(rest: &str, keyword: &str, line: usize) -> Result<String, ParseError> {
    let rest = rest.trim_start();
    if !rest.starts_with('"') {
        return Err(ParseError::ExpectedString {
            line,
            keyword: keyword.to_string(),
        });
    }
    parse_quoted(rest, line)
}

/// Decode one `"..."` chunk, handling escape sequences.
fn parse_quoted(text: &str, line: usize) -> Result<String, ParseError> {
    let mut chars = text.trim_end().chars();
    if chars.next() != Some('"') {
        return Err(ParseError::ExpectedString {
            line,
            keyword: "\"".to_string(),
        });
    }
    let mut out = String::new();
    loop {
        match chars.next() {
            None => return Err(ParseError::UnterminatedString { line }),
            Some('"') => break,
            Some('\\') => match chars.next() {
                None => return Err(ParseError::UnterminatedString { line }),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    // Unknown escape: keep it as written.
                    out.push('\\');
                    out.push(other);
                }
            },
            Some(c) => out.push(c),
        }
    }
    if chars.next().is_some() {
        return Err(ParseError::UnexpectedContent {
            line,
            content: "content after closing quote".to_string(),
        });
    }
    Ok(out)
}
