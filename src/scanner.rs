// Scanner/tokenizer for assembly source.

use std::fmt;

use crate::core::operand::Token;

/// Tokenization failure for one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub message: String,
    /// 1-based byte column of the offending character.
    pub column: usize,
}

impl ScanError {
    fn new(message: impl Into<String>, column: usize) -> Self {
        Self {
            message: message.into(),
            column,
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (column {})", self.message, self.column)
    }
}

impl std::error::Error for ScanError {}

/// One tokenized instruction line: mnemonic plus ordered operand tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    pub mnemonic: String,
    pub operands: Vec<Token>,
}

/// Split one source line into a mnemonic and operand tokens.
///
/// Returns `Ok(None)` for blank and comment-only lines. `;` starts a
/// comment. `%name` becomes an id-reference token with the prefix
/// stripped; a double-quoted run becomes a string token with the quotes
/// stripped and the bytes in between passed through literally; everything
/// else is a bare word.
pub fn scan_line(line: &str) -> Result<Option<ScannedLine>, ScanError> {
    let bytes = line.as_bytes();
    let mut cursor = 0;
    let mut tokens: Vec<Token> = Vec::new();

    while cursor < bytes.len() {
        let byte = bytes[cursor];
        if byte.is_ascii_whitespace() {
            cursor += 1;
            continue;
        }
        if byte == b';' {
            break;
        }
        if byte == b'"' {
            let start = cursor + 1;
            let Some(length) = bytes[start..].iter().position(|&b| b == b'"') else {
                return Err(ScanError::new("unterminated string literal", cursor + 1));
            };
            tokens.push(Token::string(&line[start..start + length]));
            cursor = start + length + 1;
            continue;
        }
        if byte == b'%' {
            let start = cursor + 1;
            let end = word_end(bytes, start);
            if end == start {
                return Err(ScanError::new("expected a name after '%'", cursor + 1));
            }
            tokens.push(Token::id_ref(&line[start..end]));
            cursor = end;
            continue;
        }
        let end = word_end(bytes, cursor);
        tokens.push(Token::word(&line[cursor..end]));
        cursor = end;
    }

    if tokens.is_empty() {
        return Ok(None);
    }
    let Token::Word(mnemonic) = tokens.remove(0) else {
        return Err(ScanError::new("expected an opcode mnemonic", 1));
    };
    Ok(Some(ScannedLine {
        mnemonic,
        operands: tokens,
    }))
}

fn word_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() {
        let byte = bytes[end];
        if byte.is_ascii_whitespace() || byte == b';' || byte == b'"' {
            break;
        }
        end += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(line: &str) -> ScannedLine {
        scan_line(line)
            .expect("line scans")
            .expect("line is not blank")
    }

    #[test]
    fn blank_and_comment_lines_scan_to_nothing() {
        assert_eq!(scan_line("").expect("scans"), None);
        assert_eq!(scan_line("   \t ").expect("scans"), None);
        assert_eq!(scan_line("; a comment").expect("scans"), None);
    }

    #[test]
    fn decorate_line_splits_into_expected_tokens() {
        let scanned = scan("OpDecorate %1 SpecId 100");
        assert_eq!(scanned.mnemonic, "OpDecorate");
        assert_eq!(
            scanned.operands,
            vec![Token::id_ref("1"), Token::word("SpecId"), Token::word("100")]
        );
    }

    #[test]
    fn quoted_strings_keep_interior_spaces() {
        let scanned = scan("OpDecorate %1 LinkageAttributes \"a b  c\" Export");
        assert_eq!(
            scanned.operands,
            vec![
                Token::id_ref("1"),
                Token::word("LinkageAttributes"),
                Token::string("a b  c"),
                Token::word("Export"),
            ]
        );
    }

    #[test]
    fn empty_string_literal_is_a_token() {
        let scanned = scan("OpDecorate %x LinkageAttributes \"\" Import");
        assert_eq!(scanned.operands[1], Token::string(""));
    }

    #[test]
    fn trailing_comment_is_dropped() {
        let scanned = scan("OpDecorate %1 Block ; the interface block");
        assert_eq!(scanned.operands, vec![Token::id_ref("1"), Token::word("Block")]);
    }

    #[test]
    fn unterminated_string_reports_its_column() {
        let err = scan_line("OpDecorate %1 LinkageAttributes \"foo").expect_err("must fail");
        assert_eq!(err.column, 33);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn bare_percent_is_an_error() {
        let err = scan_line("OpDecorate % Block").expect_err("must fail");
        assert!(err.message.contains("after '%'"));
    }

    #[test]
    fn leading_id_ref_is_not_a_mnemonic() {
        let err = scan_line("%1 OpDecorate").expect_err("must fail");
        assert!(err.message.contains("mnemonic"));
    }
}
