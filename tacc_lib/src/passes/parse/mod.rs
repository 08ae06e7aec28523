//! Single-pass recursive-descent parser and lowerer.
//!
//! Declarations install symbols, statements splice basic blocks together,
//! and expressions append three-address operations to the current block.
//! One token of lookahead; the first error aborts the compile.

mod decl;
mod expr;
mod stmt;
pub mod symbol_table;


use crate::diagnostic::{Diagnostic, DiagnosticBuilder, Span};
use crate::ir::cfg::{BlockId, Cfg};
use crate::token::{Token, TokenKind};

use symbol_table::SymbolTable;

/// Break and continue targets of the innermost enclosing loop.
#[derive(Debug, Clone, Copy)]
struct LoopContext {
    break_target: BlockId,
    continue_target: BlockId,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    symbols: SymbolTable,
    /// Arena for the blocks of the function currently being lowered, plus
    /// any throwaway blocks for constant expressions outside one. Taken
    /// whole when a definition completes.
    cfg: Cfg,
    loops: Vec<LoopContext>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        // the cursor relies on a trailing end-of-input token to latch on
        if !tokens.last().is_some_and(Token::is_eof) {
            tokens.push(Token::new(TokenKind::Eof, Span::default()));
        }
        let mut symbols = SymbolTable::new();
        symbols.push_scope(); // file scope
        Self {
            tokens,
            pos: 0,
            symbols,
            cfg: Cfg::new(),
            loops: Vec::new(),
        }
    }

    /// The translation unit's symbols. File-scope entries persist across
    /// function definitions.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn at_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    // === Token cursor ===

    pub(super) fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    pub(super) fn peek_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    /// Consume and return the next token. The cursor never moves past the
    /// end-of-input token, so reading at the end keeps returning it.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    /// Consume one token, failing unless it has exactly the expected kind.
    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<Token, Diagnostic> {
        let token = self.advance();
        if &token.kind == kind {
            Ok(token)
        } else {
            Err(DiagnosticBuilder::new(token.span)
                .build_unexpected_token(token.kind.describe(), kind.describe()))
        }
    }
}
