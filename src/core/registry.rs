// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Grammar registry for enumerant tables, grammar extensions, and opcodes.
//!
//! The registry is intentionally generic and has no knowledge of concrete
//! groups or opcodes. Grammar data modules populate it once at startup;
//! after that it is read-only and may be shared freely across concurrent
//! encodings.

use std::collections::HashMap;

use crate::core::error::RegistryError;
use crate::core::operand::{OperandGroup, OperandKind, Word};

/// Symbolic name to numeric value table for one enumerant group.
#[derive(Debug, Clone)]
struct EnumTable {
    values: HashMap<String, Word>,
    is_bitmask: bool,
}

/// Static operand grammar for one opcode.
#[derive(Debug, Clone)]
pub struct OpcodeGrammar {
    mnemonic: String,
    opcode: u16,
    kinds: Vec<OperandKind>,
    /// Kind sequence consumed cyclically after `kinds` is exhausted.
    /// Empty for opcodes with a fixed operand count.
    rest: Vec<OperandKind>,
}

impl OpcodeGrammar {
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    pub fn kinds(&self) -> &[OperandKind] {
        &self.kinds
    }

    pub fn rest(&self) -> &[OperandKind] {
        &self.rest
    }
}

/// Central registry mapping enumerant groups, grammar extensions, and
/// opcode grammars.
#[derive(Debug, Default)]
pub struct GrammarRegistry {
    groups: HashMap<OperandGroup, EnumTable>,
    extensions: HashMap<(OperandGroup, Word), Vec<OperandKind>>,
    opcodes: HashMap<u16, OpcodeGrammar>,
    mnemonics: HashMap<String, u16>,
}

impl GrammarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the name-to-value table for one enumerant group.
    ///
    /// For bitmask groups every value must be zero or a single set bit;
    /// anything else would make OR-combination ill-defined and is rejected
    /// here rather than at encode time.
    pub fn register_enum_table(
        &mut self,
        group: OperandGroup,
        entries: &[(&str, Word)],
        is_bitmask: bool,
    ) -> Result<(), RegistryError> {
        if self.groups.contains_key(&group) {
            return Err(RegistryError::DuplicateGroup(group));
        }
        let mut values = HashMap::with_capacity(entries.len());
        for &(name, value) in entries {
            if is_bitmask && value != 0 && !value.is_power_of_two() {
                return Err(RegistryError::NotABitmaskBit {
                    group,
                    name: name.to_string(),
                    value,
                });
            }
            if values.insert(name.to_string(), value).is_some() {
                return Err(RegistryError::DuplicateEnumerant {
                    group,
                    name: name.to_string(),
                });
            }
        }
        self.groups.insert(group, EnumTable { values, is_bitmask });
        Ok(())
    }

    /// Register the additional operand kinds required immediately after a
    /// specific enumerant value of `group`.
    pub fn register_grammar_extension(
        &mut self,
        group: OperandGroup,
        value: Word,
        kinds: &[OperandKind],
    ) -> Result<(), RegistryError> {
        let Some(table) = self.groups.get(&group) else {
            return Err(RegistryError::UnknownGroup(group));
        };
        if table.is_bitmask {
            return Err(RegistryError::ExtensionOnBitmaskGroup(group));
        }
        self.extensions.insert((group, value), kinds.to_vec());
        Ok(())
    }

    /// Register the static operand grammar for one opcode.
    ///
    /// `rest` is the repeating kind sequence for opcodes taking a variable
    /// operand tail; pass an empty slice for a fixed operand count.
    pub fn register_opcode(
        &mut self,
        mnemonic: &str,
        opcode: u16,
        kinds: &[OperandKind],
        rest: &[OperandKind],
    ) -> Result<(), RegistryError> {
        if self.opcodes.contains_key(&opcode) || self.mnemonics.contains_key(mnemonic) {
            return Err(RegistryError::DuplicateOpcode { opcode });
        }
        self.opcodes.insert(
            opcode,
            OpcodeGrammar {
                mnemonic: mnemonic.to_string(),
                opcode,
                kinds: kinds.to_vec(),
                rest: rest.to_vec(),
            },
        );
        self.mnemonics.insert(mnemonic.to_string(), opcode);
        Ok(())
    }

    /// Exact-match, case-sensitive enumerant lookup.
    pub fn lookup_enumerant(&self, group: OperandGroup, name: &str) -> Option<Word> {
        self.groups.get(&group)?.values.get(name).copied()
    }

    pub fn is_bitmask_group(&self, group: OperandGroup) -> bool {
        self.groups
            .get(&group)
            .map(|table| table.is_bitmask)
            .unwrap_or(false)
    }

    /// The operand kinds a specific enumerant value appends to the grammar,
    /// if any.
    pub fn extension(&self, group: OperandGroup, value: Word) -> Option<&[OperandKind]> {
        self.extensions.get(&(group, value)).map(Vec::as_slice)
    }

    pub fn opcode_grammar(&self, opcode: u16) -> Option<&OpcodeGrammar> {
        self.opcodes.get(&opcode)
    }

    pub fn resolve_mnemonic(&self, mnemonic: &str) -> Option<u16> {
        self.mnemonics.get(mnemonic).copied()
    }

    /// All registered mnemonics, sorted, for capability reporting.
    pub fn mnemonic_list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.mnemonics.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
