// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Context-sensitive resolution of the next expected operand kind.

use std::collections::VecDeque;

use crate::core::operand::{OperandGroup, OperandKind, Word};
use crate::core::registry::{GrammarRegistry, OpcodeGrammar};

/// Tracks the operand kinds still expected while one instruction is being
/// encoded.
///
/// Seeded from the opcode's static grammar; after every encoded enum
/// operand the `(group, value)` extension list, if any, is spliced in at
/// the front so extension operands are consumed immediately after the
/// enumerant that introduced them. Extensions may themselves introduce
/// further-extending enumerants; resolution is purely data-driven and
/// opcode-agnostic past construction.
pub struct GrammarResolver<'a> {
    registry: &'a GrammarRegistry,
    pending: VecDeque<OperandKind>,
    rest: &'a [OperandKind],
    rest_cursor: usize,
}

impl<'a> GrammarResolver<'a> {
    pub fn new(registry: &'a GrammarRegistry, grammar: &'a OpcodeGrammar) -> Self {
        Self {
            registry,
            pending: grammar.kinds().iter().copied().collect(),
            rest: grammar.rest(),
            rest_cursor: 0,
        }
    }

    /// The kind expected for the next operand, or `None` when the grammar
    /// accepts no further operands.
    pub fn next_kind(&mut self) -> Option<OperandKind> {
        if let Some(kind) = self.pending.pop_front() {
            return Some(kind);
        }
        if self.rest.is_empty() {
            return None;
        }
        let kind = self.rest[self.rest_cursor];
        self.rest_cursor = (self.rest_cursor + 1) % self.rest.len();
        Some(kind)
    }

    /// Splice in the kinds a just-encoded enumerant requires, ahead of the
    /// opcode's own remaining operands.
    pub fn apply_enumerant(&mut self, group: OperandGroup, value: Word) {
        if let Some(extension) = self.registry.extension(group, value) {
            for &kind in extension.iter().rev() {
                self.pending.push_front(kind);
            }
        }
    }

    /// The kind still owed when the token stream ran out, if any.
    ///
    /// A repeating tail is satisfiable at any cycle boundary, so only a
    /// partially consumed cycle counts as unfinished.
    pub fn unsatisfied_kind(&self) -> Option<OperandKind> {
        if let Some(&kind) = self.pending.front() {
            return Some(kind);
        }
        if self.rest_cursor != 0 {
            return Some(self.rest[self.rest_cursor]);
        }
        None
    }
}
