//! Parsing of code-section lines.
//!
//! Every non-blank line is one declaration:
//!
//! | Line | Declares |
//! |------|----------|
//! | `> name value...` | injection `name` → `value...` |
//! | `< m id k:v\|k:v` | [`MetaMap`] |
//! | `< l id v\|v\|v` | [`MetaList`] |
//!
//! Values are kept verbatim: `12` stays the string `"12"` until read through
//! one of the coercing accessors.

use std::collections::BTreeMap;

use crate::error::{MetaTag, Result, SyntaxErrorKind, WordplayError};
use crate::output::{MetaList, MetaMap, MetaObject};
use crate::section::Sections;

/// A single parsed code line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Injection { name: String, value: String },
    Meta(MetaObject),
}

/// Parses one code line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> std::result::Result<Option<Declaration>, SyntaxErrorKind> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut chars = line.chars();
    let token = chars.next();
    let rest = chars.as_str().trim();
    match token {
        Some('>') => parse_injection(rest).map(Some),
        Some('<') => parse_meta(rest).map(|meta| Some(Declaration::Meta(meta))),
        Some(other) => Err(SyntaxErrorKind::UnknownToken(other)),
        None => Ok(None),
    }
}

fn parse_injection(rest: &str) -> std::result::Result<Declaration, SyntaxErrorKind> {
    match rest.split_once(' ') {
        Some((name, value)) => Ok(Declaration::Injection {
            name: name.to_string(),
            value: value.to_string(),
        }),
        None => Err(SyntaxErrorKind::MissingValue(rest.to_string())),
    }
}

fn parse_meta(rest: &str) -> std::result::Result<MetaObject, SyntaxErrorKind> {
    let mut chars = rest.chars();
    let tag = chars.next();
    let body = chars.as_str().trim();

    let (id, data) = match tag {
        Some('m') | Some('l') => split_id(body)?,
        other => return Err(SyntaxErrorKind::UnknownMetaType(MetaTag(other))),
    };

    if tag == Some('m') {
        let mut entries = BTreeMap::new();
        for token in tokens(data) {
            let (key, value) = parse_entry(token)?;
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(MetaMap::new(id, entries).into())
    } else {
        let values = tokens(data).into_iter().map(str::to_string).collect();
        Ok(MetaList::new(id, values).into())
    }
}

/// Splits a body at `|`. Trailing empty tokens are dropped, so `a|b|` is
/// two tokens.
fn tokens(data: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = data.split('|').collect();
    while tokens.last().is_some_and(|token| token.is_empty()) {
        tokens.pop();
    }
    tokens
}

fn split_id(body: &str) -> std::result::Result<(&str, &str), SyntaxErrorKind> {
    body.split_once(' ')
        .filter(|(id, data)| !id.is_empty() && !data.is_empty())
        .ok_or(SyntaxErrorKind::MissingBody)
}

fn parse_entry(token: &str) -> std::result::Result<(&str, &str), SyntaxErrorKind> {
    let malformed = || SyntaxErrorKind::MalformedEntry(token.to_string());
    if token.matches(':').count() != 1 {
        return Err(malformed());
    }
    token
        .split_once(':')
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .ok_or_else(malformed)
}

/// Everything the code section declared, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSection {
    pub injections: Vec<(String, String)>,
    pub meta_objects: Vec<MetaObject>,
}

impl CodeSection {
    /// Parses every code line of `sections`. The first bad line aborts.
    pub fn parse(sections: &Sections<'_>) -> Result<Self> {
        let mut code = CodeSection::default();
        for (number, line) in sections.code_lines() {
            match parse_line(line).map_err(|kind| WordplayError::syntax(number, kind))? {
                Some(Declaration::Injection { name, value }) => {
                    code.injections.push((name, value));
                }
                Some(Declaration::Meta(meta)) => code.meta_objects.push(meta),
                None => {}
            }
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(line: &str) -> MetaObject {
        match parse_line(line) {
            Ok(Some(Declaration::Meta(meta))) => meta,
            other => panic!("expected meta declaration, got {:?}", other),
        }
    }

    #[test]
    fn blank_line_is_nothing() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn injection_declaration() {
        assert_eq!(
            parse_line("> hero Sir Robin of Camelot"),
            Ok(Some(Declaration::Injection {
                name: "hero".into(),
                value: "Sir Robin of Camelot".into(),
            }))
        );
    }

    #[test]
    fn injection_value_is_unprocessed() {
        assert_eq!(
            parse_line(">greeting {> hero } says hi"),
            Ok(Some(Declaration::Injection {
                name: "greeting".into(),
                value: "{> hero } says hi".into(),
            }))
        );
    }

    #[test]
    fn injection_without_value() {
        assert_eq!(
            parse_line("> lonely"),
            Err(SyntaxErrorKind::MissingValue("lonely".into()))
        );
    }

    #[test]
    fn unknown_token() {
        assert_eq!(
            parse_line("? what"),
            Err(SyntaxErrorKind::UnknownToken('?'))
        );
        assert_eq!(
            parse_line(" > indented"),
            Err(SyntaxErrorKind::UnknownToken(' '))
        );
    }

    #[test]
    fn meta_map() {
        let meta = meta("< m id1 x:1|y:2");
        let map = meta.as_map().unwrap();
        assert_eq!(map.id(), "id1");
        assert_eq!(map.get("x"), Some("1"));
        assert_eq!(map.get("y"), Some("2"));
        assert_eq!(map.data().len(), 2);
    }

    #[test]
    fn meta_map_tag_may_follow_whitespace() {
        let meta = meta("<   m stats hp:3");
        assert_eq!(meta.id(), "stats");
    }

    #[test]
    fn meta_map_entry_without_colon() {
        assert_eq!(
            parse_line("< m id1 x1"),
            Err(SyntaxErrorKind::MalformedEntry("x1".into()))
        );
    }

    #[test]
    fn meta_map_entry_with_two_colons() {
        assert_eq!(
            parse_line("< m id1 a:b:c"),
            Err(SyntaxErrorKind::MalformedEntry("a:b:c".into()))
        );
    }

    #[test]
    fn meta_map_entry_with_empty_side() {
        assert!(parse_line("< m id1 a:").is_err());
        assert!(parse_line("< m id1 :b").is_err());
        assert!(parse_line("< m id1 a:1||b:2").is_err());
    }

    #[test]
    fn trailing_separators_are_dropped() {
        let list = meta("< l xs a|b|");
        assert_eq!(list.as_list().unwrap().data(), ["a", "b"]);

        let list = meta("< l xs a||");
        assert_eq!(list.as_list().unwrap().data(), ["a"]);

        let map = meta("< m id1 a:1|");
        assert_eq!(map.as_map().unwrap().get("a"), Some("1"));
        assert_eq!(map.as_map().unwrap().data().len(), 1);
    }

    #[test]
    fn inner_empty_list_values_are_kept() {
        let list = meta("< l xs a||b");
        assert_eq!(list.as_list().unwrap().data(), ["a", "", "b"]);
    }

    #[test]
    fn meta_list_keeps_values_verbatim() {
        let meta = meta("< l 0 hiho|hehe| 12 |true");
        let list = meta.as_list().unwrap();
        assert_eq!(list.id(), "0");
        assert_eq!(list.data(), ["hiho", "hehe", " 12 ", "true"]);
    }

    #[test]
    fn meta_without_body() {
        assert_eq!(parse_line("< l"), Err(SyntaxErrorKind::MissingBody));
        assert_eq!(parse_line("< l onlyid"), Err(SyntaxErrorKind::MissingBody));
    }

    #[test]
    fn unknown_meta_type() {
        assert_eq!(
            parse_line("< x id a"),
            Err(SyntaxErrorKind::UnknownMetaType(MetaTag(Some('x'))))
        );
        assert_eq!(
            parse_line("<"),
            Err(SyntaxErrorKind::UnknownMetaType(MetaTag(None)))
        );
    }

    #[test]
    fn section_collects_in_order_and_reports_line() {
        let sections = Sections::split("text\n$\n> a 1\n< l one x\n\n< m two k:v", "$");
        let code = CodeSection::parse(&sections).unwrap();
        assert_eq!(code.injections, vec![("a".to_string(), "1".to_string())]);
        let ids: Vec<_> = code.meta_objects.iter().map(MetaObject::id).collect();
        assert_eq!(ids, ["one", "two"]);

        let sections = Sections::split("text\n$\n> a 1\n\n< m bad nocolon", "$");
        let err = CodeSection::parse(&sections).unwrap_err();
        assert_eq!(
            err,
            WordplayError::Syntax {
                line: 3,
                kind: SyntaxErrorKind::MalformedEntry("nocolon".into()),
            }
        );
    }
}
