//! Tokenization of a translation unit.
//!
//! Lexemes are interned: two occurrences of the same spelling share one
//! allocation, so later comparisons are cheap and symbol names can be
//! cloned freely into types, symbols, and block labels.

use std::rc::Rc;

use logos::Logos;
use rustc_hash::FxHashSet;

use crate::diagnostic::{Diagnostic, DiagnosticBuilder, Span};
use crate::token::{Token, TokenKind};

#[derive(Debug, Default)]
pub struct Interner {
    strings: FxHashSet<Rc<str>>,
}

impl Interner {
    pub fn intern(&mut self, s: &str) -> Rc<str> {
        if let Some(interned) = self.strings.get(s) {
            return Rc::clone(interned);
        }
        let interned: Rc<str> = Rc::from(s);
        self.strings.insert(Rc::clone(&interned));
        interned
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    // Keywords
    #[token("auto")]
    Auto,
    #[token("register")]
    Register,
    #[token("static")]
    Static,
    #[token("extern")]
    Extern,
    #[token("typedef")]
    Typedef,
    #[token("char")]
    Char,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("signed")]
    Signed,
    #[token("unsigned")]
    Unsigned,
    #[token("float")]
    Float,
    #[token("double")]
    Double,
    #[token("void")]
    Void,
    #[token("const")]
    Const,
    #[token("volatile")]
    Volatile,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("for")]
    For,
    #[token("goto")]
    Goto,
    #[token("continue")]
    Continue,
    #[token("break")]
    Break,
    #[token("return")]
    Return,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token("=")]
    Assign,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,

    // Token classes
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"[0-9]+")]
    Integer,
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // Comments (skip)
    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    // Whitespace (skip)
    #[regex(r"[ \t\n\r]+", logos::skip)]
    Whitespace,
}

fn simple_kind(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Auto => TokenKind::Auto,
        RawToken::Register => TokenKind::Register,
        RawToken::Static => TokenKind::Static,
        RawToken::Extern => TokenKind::Extern,
        RawToken::Typedef => TokenKind::Typedef,
        RawToken::Char => TokenKind::Char,
        RawToken::Short => TokenKind::Short,
        RawToken::Int => TokenKind::Int,
        RawToken::Long => TokenKind::Long,
        RawToken::Signed => TokenKind::Signed,
        RawToken::Unsigned => TokenKind::Unsigned,
        RawToken::Float => TokenKind::Float,
        RawToken::Double => TokenKind::Double,
        RawToken::Void => TokenKind::Void,
        RawToken::Const => TokenKind::Const,
        RawToken::Volatile => TokenKind::Volatile,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::Switch => TokenKind::Switch,
        RawToken::Case => TokenKind::Case,
        RawToken::Default => TokenKind::Default,
        RawToken::While => TokenKind::While,
        RawToken::Do => TokenKind::Do,
        RawToken::For => TokenKind::For,
        RawToken::Goto => TokenKind::Goto,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Break => TokenKind::Break,
        RawToken::Return => TokenKind::Return,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Question => TokenKind::Question,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Assign => TokenKind::Assign,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Identifier | RawToken::Integer | RawToken::String | RawToken::Whitespace => {
            unreachable!("lexeme-carrying or skipped token in simple_kind")
        }
    }
}

/// Tokenize a whole translation unit. The returned stream always ends with
/// a single end-of-input token.
pub fn lex(source: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut interner = Interner::default();
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);
    while let Some(raw) = lexer.next() {
        let span = Span::from(lexer.span());
        let raw = match raw {
            Ok(raw) => raw,
            Err(()) => {
                return Err(DiagnosticBuilder::new(span).build_unrecognized_input(lexer.slice()))
            }
        };
        let kind = match raw {
            RawToken::Identifier => TokenKind::Identifier(interner.intern(lexer.slice())),
            RawToken::Integer => TokenKind::Integer(interner.intern(lexer.slice())),
            RawToken::String => TokenKind::String(interner.intern(lexer.slice())),
            simple => simple_kind(simple),
        };
        tokens.push(Token::new(kind, span));
    }
    tokens.push(Token::new(
        TokenKind::Eof,
        Span::from(source.len()..source.len()),
    ));
    Ok(tokens)
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .expect("lex error")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn tokenizes_a_declaration() {
        assert_eq!(
            kinds("int *x;"),
            vec![
                TokenKind::Int,
                TokenKind::Star,
                TokenKind::Identifier("x".into()),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn longest_match_wins() {
        assert_eq!(
            kinds("... . && & || |"),
            vec![
                TokenKind::Ellipsis,
                TokenKind::Dot,
                TokenKind::AmpAmp,
                TokenKind::Amp,
                TokenKind::PipePipe,
                TokenKind::Pipe,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_whitespace_and_comments() {
        assert_eq!(
            kinds("return /* the\n answer */ 42 ;"),
            vec![
                TokenKind::Return,
                TokenKind::Integer("42".into()),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn interns_repeated_lexemes() {
        let tokens = lex("abc abc").expect("lex error");
        let TokenKind::Identifier(first) = &tokens[0].kind else {
            panic!("expected an identifier");
        };
        let TokenKind::Identifier(second) = &tokens[1].kind else {
            panic!("expected an identifier");
        };
        assert!(Rc::ptr_eq(first, second));
    }

    #[test]
    fn rejects_unknown_input() {
        let err = lex("int x @ 3;").expect_err("lexing should fail");
        assert_eq!(err.main_span().start(), 6);
    }

    #[test]
    fn keeps_decimal_text() {
        let tokens = lex("0123").expect("lex error");
        assert_eq!(tokens[0].kind, TokenKind::Integer("0123".into()));
    }
}
