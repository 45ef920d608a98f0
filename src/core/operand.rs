// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Operand kinds, enumerant group identifiers, and operand tokens.
//!
//! This module intentionally avoids hardcoding specific enumerant groups.
//! Grammar data modules define their own group identifiers and expose them
//! through the registry at runtime.

use std::fmt;

/// Atomic unit of the binary instruction stream.
pub type Word = u32;

/// Identifier for an enumerant group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OperandGroup(&'static str);

impl OperandGroup {
    /// Create a new enumerant group identifier.
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    /// Return the identifier string.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for OperandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Kind of operand expected at one position of an instruction.
///
/// The kind of a later position may depend on the value encoded at an
/// earlier one; the resolver handles that by consulting the registry's
/// grammar extensions after every encoded enum operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    /// Signed or unsigned numeric literal occupying one word.
    LiteralInteger,
    /// Reference to another entity by `%`-prefixed name.
    IdRef,
    /// Single enumerant looked up in the named value group.
    EnumValue(OperandGroup),
    /// One or more single-bit enumerants from the named bitmask group,
    /// OR-combined, or a raw non-negative literal.
    BitmaskValue(OperandGroup),
    /// NUL-terminated UTF-8 string packed four bytes per word.
    LiteralString,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandKind::LiteralInteger => f.write_str("literal integer"),
            OperandKind::IdRef => f.write_str("id reference"),
            OperandKind::EnumValue(group) => write!(f, "{group} enumerant"),
            OperandKind::BitmaskValue(group) => write!(f, "{group} mask"),
            OperandKind::LiteralString => f.write_str("literal string"),
        }
    }
}

/// A single textual operand as delivered by the tokenizer.
///
/// String literals arrive de-quoted and id references arrive with the `%`
/// prefix already stripped; the encoders never re-tokenize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Bare word: identifier, numeric literal, or `|`-joined mask names.
    Word(String),
    /// Id reference name (without the `%` prefix).
    IdRef(String),
    /// De-quoted string literal bytes.
    Str(String),
}

impl Token {
    pub fn word(text: impl Into<String>) -> Self {
        Token::Word(text.into())
    }

    pub fn id_ref(name: impl Into<String>) -> Self {
        Token::IdRef(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Token::Str(text.into())
    }

    /// The token's payload text, without lexical markers.
    pub fn text(&self) -> &str {
        match self {
            Token::Word(text) | Token::IdRef(text) | Token::Str(text) => text,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(text) => f.write_str(text),
            Token::IdRef(name) => write!(f, "%{name}"),
            Token::Str(text) => write!(f, "\"{text}\""),
        }
    }
}
