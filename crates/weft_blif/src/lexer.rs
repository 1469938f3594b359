//! Lexical analyzer for BLIF text.
//!
//! BLIF is handled as a stream of whitespace-separated words. Line breaks
//! carry no meaning, `#` starts a comment that runs to the end of the line,
//! and a backslash directly before a line break joins the two lines.

use crate::token::{Token, TokenKind};
use weft_source::{FileId, Span};

/// Splits `source` into tokens. The result always ends with [`TokenKind::Eof`].
pub fn lex(source: &str, file: FileId) -> Vec<Token> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    span: self.span_from(self.pos),
                });
                break;
            }
            tokens.push(self.next_token());
        }
        tokens
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    /// Length of a line continuation at the cursor, or 0.
    fn continuation_len(&self) -> usize {
        if self.peek_at(0) != b'\\' {
            return 0;
        }
        match (self.peek_at(1), self.peek_at(2)) {
            (b'\n', _) => 2,
            (b'\r', b'\n') => 3,
            _ => 0,
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.peek_at(0) == b'#' {
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            let cont = self.continuation_len();
            if cont > 0 {
                self.pos += cont;
                continue;
            }
            return;
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        while self.pos < self.source.len() {
            let b = self.source[self.pos];
            if b.is_ascii_whitespace() || b == b'#' || self.continuation_len() > 0 {
                break;
            }
            self.pos += 1;
        }
        let kind = if self.source[start] == b'.' {
            TokenKind::Directive
        } else {
            TokenKind::Word
        };
        Token {
            kind,
            span: self.span_from(start),
        }
    }
}
