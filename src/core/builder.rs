// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction builder driving the resolver and operand encoders.

use crate::core::encoder::{
    encode_bitmask_value, encode_enum_value, encode_id_ref, encode_literal_integer,
    encode_literal_string,
};
use crate::core::error::EncodeError;
use crate::core::grammar::GrammarResolver;
use crate::core::operand::{OperandKind, Token, Word};
use crate::core::registry::{GrammarRegistry, OpcodeGrammar};
use crate::symbol_table::IdAllocator;

/// Encoding state of one builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    Start,
    ConsumingOperands,
    Finalized,
    Failed,
}

/// Encodes exactly one instruction.
///
/// The builder walks the token stream, asks the resolver for the kind
/// expected at each position, dispatches to the matching operand encoder,
/// and feeds encoded enum values back into the resolver so dependent
/// operands resolve correctly. On success it prepends the
/// `(word_count << 16) | opcode` header word. A builder that has failed
/// or finalized is spent; encoding is a one-shot operation.
pub struct InstructionBuilder<'a> {
    registry: &'a GrammarRegistry,
    opcode: u16,
    resolver: GrammarResolver<'a>,
    words: Vec<Word>,
    state: BuilderState,
}

impl<'a> InstructionBuilder<'a> {
    pub fn new(registry: &'a GrammarRegistry, grammar: &'a OpcodeGrammar) -> Self {
        Self {
            registry,
            opcode: grammar.opcode(),
            resolver: GrammarResolver::new(registry, grammar),
            words: Vec::new(),
            state: BuilderState::Start,
        }
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Encode the full operand token sequence and finalize.
    ///
    /// The first failure is returned as-is and leaves the builder in the
    /// terminal `Failed` state; no partial instruction is ever produced.
    pub fn encode(
        &mut self,
        tokens: &[Token],
        ids: &mut dyn IdAllocator,
    ) -> Result<Vec<Word>, EncodeError> {
        debug_assert_eq!(self.state, BuilderState::Start, "builders are one-shot");
        self.state = BuilderState::ConsumingOperands;

        for (index, token) in tokens.iter().enumerate() {
            let Some(kind) = self.resolver.next_kind() else {
                return self.fail(EncodeError::ExtraOperands {
                    opcode: self.opcode,
                    leftover: tokens[index..].iter().map(Token::to_string).collect(),
                });
            };
            if let Err(err) = self.encode_operand(kind, token, ids) {
                return self.fail(err);
            }
        }

        if let Some(expected) = self.resolver.unsatisfied_kind() {
            return self.fail(EncodeError::MissingOperand {
                opcode: self.opcode,
                expected,
            });
        }

        let word_count = self.words.len() + 1;
        if word_count > usize::from(u16::MAX) {
            return self.fail(EncodeError::InstructionTooLong {
                opcode: self.opcode,
                word_count,
            });
        }

        self.state = BuilderState::Finalized;
        let mut out = Vec::with_capacity(word_count);
        out.push(((word_count as Word) << 16) | Word::from(self.opcode));
        out.append(&mut self.words);
        Ok(out)
    }

    fn encode_operand(
        &mut self,
        kind: OperandKind,
        token: &Token,
        ids: &mut dyn IdAllocator,
    ) -> Result<(), EncodeError> {
        match kind {
            OperandKind::LiteralInteger => {
                self.words.push(encode_literal_integer(token)?);
            }
            OperandKind::IdRef => {
                self.words.push(encode_id_ref(token, ids)?);
            }
            OperandKind::EnumValue(group) => {
                let value = encode_enum_value(self.registry, group, token)?;
                self.words.push(value);
                self.resolver.apply_enumerant(group, value);
            }
            OperandKind::BitmaskValue(group) => {
                // Combined masks could trigger conflicting extensions, so
                // bitmask values never extend the grammar.
                self.words
                    .push(encode_bitmask_value(self.registry, group, token)?);
            }
            OperandKind::LiteralString => {
                self.words.extend(encode_literal_string(token)?);
            }
        }
        Ok(())
    }

    fn fail(&mut self, err: EncodeError) -> Result<Vec<Word>, EncodeError> {
        self.state = BuilderState::Failed;
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operand::OperandGroup;
    use crate::core::operand::OperandKind::{BitmaskValue, EnumValue, IdRef, LiteralInteger};
    use crate::symbol_table::NameIdMap;

    const TAG: OperandGroup = OperandGroup::new("tag");
    const BITS: OperandGroup = OperandGroup::new("bits");

    fn test_registry() -> GrammarRegistry {
        let mut reg = GrammarRegistry::new();
        reg.register_enum_table(TAG, &[("Bare", 0), ("WithArg", 1), ("WithMask", 2)], false)
            .expect("tag table registers");
        reg.register_enum_table(BITS, &[("X", 0x1), ("Y", 0x2)], true)
            .expect("bits table registers");
        reg.register_grammar_extension(TAG, 1, &[LiteralInteger])
            .expect("literal extension registers");
        reg.register_grammar_extension(TAG, 2, &[BitmaskValue(BITS)])
            .expect("mask extension registers");
        reg.register_opcode("OpTag", 40, &[IdRef, EnumValue(TAG)], &[])
            .expect("opcode registers");
        reg
    }

    fn encode(reg: &GrammarRegistry, tokens: &[Token]) -> Result<Vec<Word>, EncodeError> {
        let grammar = reg.opcode_grammar(40).expect("grammar present");
        let mut ids = NameIdMap::new();
        InstructionBuilder::new(reg, grammar).encode(tokens, &mut ids)
    }

    #[test]
    fn header_word_carries_length_and_opcode() {
        let reg = test_registry();
        let words = encode(&reg, &[Token::id_ref("1"), Token::word("Bare")])
            .expect("instruction encodes");
        assert_eq!(words, vec![(3 << 16) | 40, 1, 0]);
    }

    #[test]
    fn extension_operand_is_consumed_after_the_enumerant() {
        let reg = test_registry();
        let words = encode(
            &reg,
            &[Token::id_ref("1"), Token::word("WithArg"), Token::word("9")],
        )
        .expect("instruction encodes");
        assert_eq!(words, vec![(4 << 16) | 40, 1, 1, 9]);
    }

    #[test]
    fn mask_extension_is_encoded_but_never_extends_further() {
        let reg = test_registry();
        let words = encode(
            &reg,
            &[Token::id_ref("1"), Token::word("WithMask"), Token::word("X|Y")],
        )
        .expect("instruction encodes");
        assert_eq!(words, vec![(4 << 16) | 40, 1, 2, 0x3]);
    }

    #[test]
    fn truncated_stream_is_missing_operand() {
        let reg = test_registry();
        let err = encode(&reg, &[Token::id_ref("1"), Token::word("WithArg")])
            .expect_err("literal operand is owed");
        assert_eq!(
            err,
            EncodeError::MissingOperand {
                opcode: 40,
                expected: LiteralInteger,
            }
        );
    }

    #[test]
    fn surplus_tokens_are_extra_operands() {
        let reg = test_registry();
        let err = encode(
            &reg,
            &[
                Token::id_ref("1"),
                Token::word("Bare"),
                Token::word("5"),
                Token::word("6"),
            ],
        )
        .expect_err("grammar is already satisfied");
        assert_eq!(
            err,
            EncodeError::ExtraOperands {
                opcode: 40,
                leftover: vec!["5".to_string(), "6".to_string()],
            }
        );
    }

    #[test]
    fn failure_is_terminal() {
        let reg = test_registry();
        let grammar = reg.opcode_grammar(40).expect("grammar present");
        let mut ids = NameIdMap::new();
        let mut builder = InstructionBuilder::new(&reg, grammar);
        assert_eq!(builder.state(), BuilderState::Start);
        builder
            .encode(&[Token::word("oops")], &mut ids)
            .expect_err("bare word is not an id");
        assert_eq!(builder.state(), BuilderState::Failed);
    }

    #[test]
    fn success_finalizes_the_builder() {
        let reg = test_registry();
        let grammar = reg.opcode_grammar(40).expect("grammar present");
        let mut ids = NameIdMap::new();
        let mut builder = InstructionBuilder::new(&reg, grammar);
        builder
            .encode(&[Token::id_ref("1"), Token::word("Bare")], &mut ids)
            .expect("instruction encodes");
        assert_eq!(builder.state(), BuilderState::Finalized);
    }
}
