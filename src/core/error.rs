// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types for instruction encoding and grammar registration.

use std::fmt;

use crate::core::operand::{OperandGroup, OperandKind, Word};

/// Error raised while encoding a single instruction.
///
/// Every variant is fatal to the instruction being encoded and never to the
/// process; the orchestrator decides whether one failing instruction aborts
/// the whole source unit or is collected for batch reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// No grammar registered for the requested opcode or mnemonic.
    UnknownOpcode { name: String },
    /// Token does not name any enumerant in the group's table.
    UnknownEnumerant { group: OperandGroup, token: String },
    /// Token is not a numeric literal at all.
    InvalidLiteral { token: String },
    /// Numeric literal does not fit the 32-bit word width.
    LiteralOutOfRange { token: String },
    /// Token stream exhausted before the grammar was satisfied.
    MissingOperand { opcode: u16, expected: OperandKind },
    /// Tokens remained after the grammar was satisfied.
    ExtraOperands { opcode: u16, leftover: Vec<String> },
    /// Empty component in an OR-separated bitmask expression.
    MalformedBitmask { token: String },
    /// Token is not a string literal, or its bytes cannot be packed.
    MalformedString { token: String },
    /// Token does not have the `%name` id-reference form.
    MalformedIdRef { token: String },
    /// Total word count does not fit the header word's 16-bit length field.
    InstructionTooLong { opcode: u16, word_count: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::UnknownOpcode { name } => {
                write!(f, "unknown opcode {name}")
            }
            EncodeError::UnknownEnumerant { group, token } => {
                write!(f, "'{token}' is not a known {group} enumerant")
            }
            EncodeError::InvalidLiteral { token } => {
                write!(f, "'{token}' is not a numeric literal")
            }
            EncodeError::LiteralOutOfRange { token } => {
                write!(f, "literal '{token}' does not fit in 32 bits")
            }
            EncodeError::MissingOperand { opcode, expected } => {
                write!(f, "opcode {opcode}: expected {expected}, found end of operands")
            }
            EncodeError::ExtraOperands { opcode, leftover } => {
                write!(
                    f,
                    "opcode {opcode}: {} operand(s) past the end of the grammar, starting at '{}'",
                    leftover.len(),
                    leftover.first().map(String::as_str).unwrap_or("")
                )
            }
            EncodeError::MalformedBitmask { token } => {
                write!(f, "empty component in mask expression '{token}'")
            }
            EncodeError::MalformedString { token } => {
                write!(f, "'{token}' is not a valid string literal")
            }
            EncodeError::MalformedIdRef { token } => {
                write!(f, "'{token}' is not a %-prefixed id reference")
            }
            EncodeError::InstructionTooLong { opcode, word_count } => {
                write!(f, "opcode {opcode}: {word_count} words exceed the 16-bit length field")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Error returned when grammar registration is inconsistent.
///
/// These are configuration failures raised while the registry is being
/// populated at startup, before any instruction is encoded; they are never
/// reported as per-instruction errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateGroup(OperandGroup),
    DuplicateEnumerant { group: OperandGroup, name: String },
    DuplicateOpcode { opcode: u16 },
    /// Bitmask table value that is neither zero nor a single set bit.
    NotABitmaskBit {
        group: OperandGroup,
        name: String,
        value: Word,
    },
    /// Extension registered for a group the registry has never seen.
    UnknownGroup(OperandGroup),
    /// Extensions are keyed by single enumerant values; bitmask groups
    /// cannot carry them.
    ExtensionOnBitmaskGroup(OperandGroup),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateGroup(group) => {
                write!(f, "enumerant group '{group}' registered twice")
            }
            RegistryError::DuplicateEnumerant { group, name } => {
                write!(f, "enumerant '{name}' registered twice in group '{group}'")
            }
            RegistryError::DuplicateOpcode { opcode } => {
                write!(f, "opcode {opcode} registered twice")
            }
            RegistryError::NotABitmaskBit { group, name, value } => {
                write!(
                    f,
                    "bitmask enumerant '{name}' in group '{group}' has value {value:#x}, \
                     which is not zero or a single bit"
                )
            }
            RegistryError::UnknownGroup(group) => {
                write!(f, "no enumerant group '{group}' registered")
            }
            RegistryError::ExtensionOnBitmaskGroup(group) => {
                write!(f, "grammar extension registered on bitmask group '{group}'")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_error_display_names_group_and_token() {
        let err = EncodeError::UnknownEnumerant {
            group: OperandGroup::new("decoration"),
            token: "SpecI".to_string(),
        };
        assert_eq!(err.to_string(), "'SpecI' is not a known decoration enumerant");
    }

    #[test]
    fn extra_operands_display_reports_first_leftover() {
        let err = EncodeError::ExtraOperands {
            opcode: 71,
            leftover: vec!["100".to_string(), "200".to_string()],
        };
        let rendered = err.to_string();
        assert!(rendered.contains("opcode 71"));
        assert!(rendered.contains("2 operand(s)"));
        assert!(rendered.contains("'100'"));
    }

    #[test]
    fn registry_error_display_includes_offending_value() {
        let err = RegistryError::NotABitmaskBit {
            group: OperandGroup::new("fp-fast-math-mode"),
            name: "Bad".to_string(),
            value: 0x6,
        };
        assert!(err.to_string().contains("0x6"));
        assert!(err.to_string().contains("fp-fast-math-mode"));
    }
}
