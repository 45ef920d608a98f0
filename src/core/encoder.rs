// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Per-kind operand encoders.
//!
//! Each encoder converts one token into one or more binary words, or a
//! typed failure. Encoders never re-tokenize and never look ahead; the
//! builder owns sequencing.

use crate::core::error::EncodeError;
use crate::core::operand::{OperandGroup, Token, Word};
use crate::core::registry::GrammarRegistry;
use crate::symbol_table::IdAllocator;

/// Parse a decimal or `0x`-prefixed hex literal into one word.
///
/// Negative decimal literals are accepted down to `i32::MIN` and encoded
/// as two's complement.
pub fn parse_word_literal(text: &str) -> Result<Word, EncodeError> {
    let invalid = || EncodeError::InvalidLiteral {
        token: text.to_string(),
    };
    let out_of_range = || EncodeError::LiteralOutOfRange {
        token: text.to_string(),
    };

    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        return Word::from_str_radix(hex, 16).map_err(|_| out_of_range());
    }

    if let Some(digits) = text.strip_prefix('-') {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: i64 = text.parse().map_err(|_| out_of_range())?;
        if value < i64::from(i32::MIN) {
            return Err(out_of_range());
        }
        return Ok(value as i32 as Word);
    }

    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let value: u64 = text.parse().map_err(|_| out_of_range())?;
    if value > u64::from(Word::MAX) {
        return Err(out_of_range());
    }
    Ok(value as Word)
}

/// Encode a `LiteralInteger` operand into one word.
pub fn encode_literal_integer(token: &Token) -> Result<Word, EncodeError> {
    match token {
        Token::Word(text) => parse_word_literal(text),
        _ => Err(EncodeError::InvalidLiteral {
            token: token.to_string(),
        }),
    }
}

/// Encode an `IdRef` operand into one word.
///
/// The encoder does not allocate ids itself; it defers to the session's
/// id-allocation collaborator and embeds whatever id it returns.
pub fn encode_id_ref(token: &Token, ids: &mut dyn IdAllocator) -> Result<Word, EncodeError> {
    match token {
        Token::IdRef(name) if !name.is_empty() => Ok(ids.resolve_or_allocate(name)),
        _ => Err(EncodeError::MalformedIdRef {
            token: token.to_string(),
        }),
    }
}

/// Encode an `EnumValue` operand by exact-match table lookup.
pub fn encode_enum_value(
    registry: &GrammarRegistry,
    group: OperandGroup,
    token: &Token,
) -> Result<Word, EncodeError> {
    let Token::Word(name) = token else {
        return Err(EncodeError::UnknownEnumerant {
            group,
            token: token.to_string(),
        });
    };
    registry
        .lookup_enumerant(group, name)
        .ok_or_else(|| EncodeError::UnknownEnumerant {
            group,
            token: name.clone(),
        })
}

/// Encode a `BitmaskValue` operand.
///
/// A `|`-joined token ORs the named single-bit values together. A token
/// that is a raw non-negative integer literal is accepted verbatim without
/// table lookup, covering bit combinations with no symbolic name.
pub fn encode_bitmask_value(
    registry: &GrammarRegistry,
    group: OperandGroup,
    token: &Token,
) -> Result<Word, EncodeError> {
    let Token::Word(text) = token else {
        return Err(EncodeError::UnknownEnumerant {
            group,
            token: token.to_string(),
        });
    };

    if !text.contains('|') && text.starts_with(|c: char| c.is_ascii_digit()) {
        return parse_word_literal(text);
    }

    let mut mask: Word = 0;
    for component in text.split('|') {
        let name = component.trim();
        if name.is_empty() {
            return Err(EncodeError::MalformedBitmask {
                token: text.clone(),
            });
        }
        let Some(value) = registry.lookup_enumerant(group, name) else {
            return Err(EncodeError::UnknownEnumerant {
                group,
                token: name.to_string(),
            });
        };
        mask |= value;
    }
    Ok(mask)
}

/// Encode a `LiteralString` operand into its packed word sequence.
pub fn encode_literal_string(token: &Token) -> Result<Vec<Word>, EncodeError> {
    let Token::Str(text) = token else {
        return Err(EncodeError::MalformedString {
            token: token.to_string(),
        });
    };
    if text.bytes().any(|b| b == 0) {
        // An interior NUL would terminate the packed form early and break
        // the round-trip contract.
        return Err(EncodeError::MalformedString {
            token: text.clone(),
        });
    }
    Ok(pack_string_words(text))
}

/// Pack UTF-8 bytes plus a terminating NUL four-per-word, little-endian
/// within each word, zero-padding the final partial word.
///
/// A byte length that is an exact multiple of four therefore produces one
/// trailing all-zero word carrying the terminator.
pub fn pack_string_words(text: &str) -> Vec<Word> {
    let bytes = text.as_bytes();
    let word_count = bytes.len() / 4 + 1;
    let mut words: Vec<Word> = vec![0; word_count];
    for (index, &byte) in bytes.iter().enumerate() {
        words[index / 4] |= Word::from(byte) << (8 * (index % 4));
    }
    words
}
