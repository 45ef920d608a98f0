// Assembler pipeline sequencing instruction encodings across a source unit.

use std::fmt;

use log::debug;

use crate::core::builder::InstructionBuilder;
use crate::core::error::EncodeError;
use crate::core::operand::{Token, Word};
use crate::core::registry::GrammarRegistry;
use crate::scanner::{scan_line, ScanError};
use crate::symbol_table::NameIdMap;

/// Failure on one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    Scan(ScanError),
    Encode(EncodeError),
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::Scan(err) => write!(f, "{err}"),
            LineError::Encode(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LineError {}

impl From<ScanError> for LineError {
    fn from(err: ScanError) -> Self {
        LineError::Scan(err)
    }
}

impl From<EncodeError> for LineError {
    fn from(err: EncodeError) -> Self {
        LineError::Encode(err)
    }
}

/// A line-anchored diagnostic collected during a source-unit run.
#[derive(Debug, Clone)]
pub struct LineDiagnostic {
    pub line: u32,
    pub source: String,
    pub error: LineError,
}

impl LineDiagnostic {
    pub fn format(&self) -> String {
        format!("{}: ERROR - {}", self.line, self.error)
    }
}

/// Error from a failed source-unit run, carrying every line diagnostic.
#[derive(Debug)]
pub struct AssembleError {
    diagnostics: Vec<LineDiagnostic>,
}

impl AssembleError {
    pub fn diagnostics(&self) -> &[LineDiagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line(s) failed to assemble", self.diagnostics.len())
    }
}

impl std::error::Error for AssembleError {}

/// Drives instruction encoding across a source unit.
///
/// The registry is immutable and shared; the assembler owns the only
/// mutable session state, the name-to-id map. Independent source units
/// can therefore be assembled in parallel, one assembler each, over the
/// same registry.
pub struct Assembler<'a> {
    registry: &'a GrammarRegistry,
    ids: NameIdMap,
}

impl<'a> Assembler<'a> {
    pub fn new(registry: &'a GrammarRegistry) -> Self {
        Self {
            registry,
            ids: NameIdMap::new(),
        }
    }

    /// Encode one instruction from pre-tokenized operands.
    pub fn encode_instruction(
        &mut self,
        opcode: u16,
        tokens: &[Token],
    ) -> Result<Vec<Word>, EncodeError> {
        let Some(grammar) = self.registry.opcode_grammar(opcode) else {
            return Err(EncodeError::UnknownOpcode {
                name: opcode.to_string(),
            });
        };
        InstructionBuilder::new(self.registry, grammar).encode(tokens, &mut self.ids)
    }

    /// Encode one instruction by mnemonic.
    pub fn encode_named_instruction(
        &mut self,
        mnemonic: &str,
        tokens: &[Token],
    ) -> Result<Vec<Word>, EncodeError> {
        let Some(opcode) = self.registry.resolve_mnemonic(mnemonic) else {
            return Err(EncodeError::UnknownOpcode {
                name: mnemonic.to_string(),
            });
        };
        self.encode_instruction(opcode, tokens)
    }

    /// Tokenize and encode one source line.
    ///
    /// Blank and comment-only lines yield `Ok(None)`.
    pub fn assemble_line(&mut self, line: &str) -> Result<Option<Vec<Word>>, LineError> {
        let Some(scanned) = scan_line(line)? else {
            return Ok(None);
        };
        let words = self.encode_named_instruction(&scanned.mnemonic, &scanned.operands)?;
        debug!(
            "encoded {} into {} word(s)",
            scanned.mnemonic,
            words.len()
        );
        Ok(Some(words))
    }

    /// Assemble a whole source unit into one contiguous word sequence.
    ///
    /// Every failing line is collected and reported together; a unit with
    /// any error produces no output words.
    pub fn assemble_source(&mut self, source: &str) -> Result<Vec<Word>, AssembleError> {
        let mut words = Vec::new();
        let mut diagnostics = Vec::new();
        for (index, line) in source.lines().enumerate() {
            match self.assemble_line(line) {
                Ok(Some(instruction)) => words.extend(instruction),
                Ok(None) => {}
                Err(error) => diagnostics.push(LineDiagnostic {
                    line: index as u32 + 1,
                    source: line.to_string(),
                    error,
                }),
            }
        }
        if diagnostics.is_empty() {
            Ok(words)
        } else {
            Err(AssembleError { diagnostics })
        }
    }

    /// One past the highest id allocated so far.
    pub fn id_bound(&self) -> Word {
        self.ids.bound()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar_defaults::{build_default_registry, OP_DECORATE};

    #[test]
    fn encode_instruction_rejects_unknown_opcodes() {
        let registry = build_default_registry().expect("default grammar is consistent");
        let mut asm = Assembler::new(&registry);
        let err = asm
            .encode_instruction(9999, &[])
            .expect_err("opcode 9999 is not registered");
        assert_eq!(
            err,
            EncodeError::UnknownOpcode {
                name: "9999".to_string(),
            }
        );
    }

    #[test]
    fn named_and_numeric_entry_points_agree() {
        let registry = build_default_registry().expect("default grammar is consistent");
        let tokens = [Token::id_ref("1"), Token::word("Block")];

        let mut by_name = Assembler::new(&registry);
        let mut by_code = Assembler::new(&registry);
        assert_eq!(
            by_name
                .encode_named_instruction("OpDecorate", &tokens)
                .expect("encodes"),
            by_code
                .encode_instruction(OP_DECORATE, &tokens)
                .expect("encodes")
        );
    }

    #[test]
    fn source_unit_concatenates_instruction_words() {
        let registry = build_default_registry().expect("default grammar is consistent");
        let mut asm = Assembler::new(&registry);
        let words = asm
            .assemble_source(
                "; decorations for the position output\n\
                 OpDecorate %1 Location 0\n\
                 \n\
                 OpDecorate %2 Location 1\n",
            )
            .expect("unit assembles");
        assert_eq!(
            words,
            vec![(4 << 16) | 71, 1, 30, 0, (4 << 16) | 71, 2, 30, 1]
        );
        assert_eq!(asm.id_bound(), 3);
    }

    #[test]
    fn every_failing_line_is_reported() {
        let registry = build_default_registry().expect("default grammar is consistent");
        let mut asm = Assembler::new(&registry);
        let err = asm
            .assemble_source(
                "OpDecorate %1 NotADecoration\n\
                 OpDecorate %2 Block\n\
                 OpBogus %3\n",
            )
            .expect_err("two lines are bad");
        let lines: Vec<u32> = err.diagnostics().iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![1, 3]);
        assert!(err.diagnostics()[0].format().contains("NotADecoration"));
    }

    #[test]
    fn ids_are_stable_across_a_session() {
        let registry = build_default_registry().expect("default grammar is consistent");
        let mut asm = Assembler::new(&registry);
        let first = asm
            .assemble_line("OpDecorate %main Block")
            .expect("line assembles")
            .expect("line is not blank");
        let second = asm
            .assemble_line("OpDecorate %main Invariant")
            .expect("line assembles")
            .expect("line is not blank");
        assert_eq!(first[1], second[1]);
    }
}
