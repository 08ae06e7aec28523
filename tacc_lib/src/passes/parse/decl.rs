use std::rc::Rc;

use crate::diagnostic::{Diagnostic, DiagnosticBuilder};
use crate::ir::cfg::Function;
use crate::ir::ctype::{Arithmetic, CType, Parameter, Qualifiers, TypeKind};
use crate::ir::symbols::SymbolId;
use crate::token::TokenKind;

use super::Parser;

impl Parser {
    /// Parse one declaration. Returns the finished function for a function
    /// definition; plain declarations, prototypes, and initialized
    /// declarations only register symbols and return `None`.
    pub fn declaration(&mut self) -> Result<Option<Function>, Diagnostic> {
        let base = self.declaration_specifiers()?;
        loop {
            let start = self.peek_span();
            let (ty, name) = self.declarator(base.clone())?;
            let Some(name) = name else {
                return Err(DiagnosticBuilder::new(start).build_missing_declarator_name());
            };
            let symbol = self.symbols.add(Rc::clone(&name), ty);
            match self.peek() {
                TokenKind::Semicolon => {
                    self.advance();
                    return Ok(None);
                }
                TokenKind::Assign => {
                    self.advance();
                    // The initializer of a file-scope declaration must be
                    // computable at compile time. It is evaluated into a
                    // throwaway block and not yet stored on the symbol.
                    let throwaway = self.cfg.add_block(None);
                    self.assignment_expression(throwaway)?;
                    if !matches!(self.peek(), TokenKind::Comma) {
                        self.expect(&TokenKind::Semicolon)?;
                        return Ok(None);
                    }
                }
                TokenKind::LBrace => return self.function_definition(name, symbol).map(Some),
                _ => {}
            }
            self.expect(&TokenKind::Comma)?;
        }
    }

    /// A `{` after a declarator starts a function body. Only valid for a
    /// FUNCTION-typed symbol at file scope; parameters are bound in a fresh
    /// scope and must all be named here.
    fn function_definition(
        &mut self,
        name: Rc<str>,
        symbol: SymbolId,
    ) -> Result<Function, Diagnostic> {
        let span = self.peek_span();
        let record = self.symbols.get(symbol);
        let TypeKind::Function(fn_ty) = &record.ty.kind else {
            return Err(DiagnosticBuilder::new(span).build_invalid_function_definition());
        };
        if record.depth > 0 {
            return Err(DiagnosticBuilder::new(span).build_invalid_function_definition());
        }
        let params: Vec<Parameter> = fn_ty.params.clone();

        let entry = self.cfg.add_block(Some(Rc::clone(&name)));
        self.symbols.push_scope();
        for (i, param) in params.iter().enumerate() {
            let Some(param_name) = &param.name else {
                return Err(DiagnosticBuilder::new(span).build_missing_parameter_name(i + 1));
            };
            self.symbols.add(Rc::clone(param_name), param.ty.clone());
        }
        self.compound(entry)?;
        self.symbols.pop_scope();

        let cfg = std::mem::take(&mut self.cfg);
        Ok(Function { name, entry, cfg })
    }

    /// A run of type-specifier, qualifier, and storage-class keywords.
    /// Storage classes are accepted and discarded; qualifiers accumulate
    /// onto the resulting base type. A missing type specifier is fatal.
    pub(super) fn declaration_specifiers(&mut self) -> Result<CType, Diagnostic> {
        let mut base: Option<CType> = None;
        let mut qualifiers = Qualifiers::default();
        loop {
            match self.peek() {
                TokenKind::Auto
                | TokenKind::Register
                | TokenKind::Static
                | TokenKind::Extern
                | TokenKind::Typedef => {}
                TokenKind::Char => base = Some(CType::arithmetic(Arithmetic::Char)),
                TokenKind::Short
                | TokenKind::Int
                | TokenKind::Long
                | TokenKind::Signed
                | TokenKind::Unsigned => base = Some(CType::arithmetic(Arithmetic::Int64)),
                TokenKind::Float | TokenKind::Double => {
                    base = Some(CType::arithmetic(Arithmetic::Double))
                }
                TokenKind::Void => base = Some(CType::void()),
                TokenKind::Const => qualifiers.is_const = true,
                TokenKind::Volatile => qualifiers.is_volatile = true,
                _ => break,
            }
            self.advance();
        }
        let Some(base) = base else {
            return Err(DiagnosticBuilder::new(self.peek_span()).build_missing_type_specifier());
        };
        Ok(base.with_qualifiers(qualifiers))
    }

    /// Peel `*` levels left to right, then hand off to the direct
    /// declarator. Returns the built type and the declared name, if any.
    pub(super) fn declarator(
        &mut self,
        mut base: CType,
    ) -> Result<(CType, Option<Rc<str>>), Diagnostic> {
        while matches!(self.peek(), TokenKind::Star) {
            base = self.pointer(base)?;
        }
        self.direct_declarator(base)
    }

    /// One `*` level; trailing qualifiers bind to this pointer, not to the
    /// pointee or to an outer level.
    fn pointer(&mut self, base: CType) -> Result<CType, Diagnostic> {
        self.expect(&TokenKind::Star)?;
        let mut qualifiers = Qualifiers::default();
        loop {
            match self.peek() {
                TokenKind::Const => qualifiers.is_const = true,
                TokenKind::Volatile => qualifiers.is_volatile = true,
                _ => break,
            }
            self.advance();
        }
        Ok(CType::pointer(base).with_qualifiers(qualifiers))
    }

    fn direct_declarator(
        &mut self,
        mut base: CType,
    ) -> Result<(CType, Option<Rc<str>>), Diagnostic> {
        let mut name = None;
        let mut ty = base.clone();
        match self.peek().clone() {
            TokenKind::Identifier(ident) => {
                self.advance();
                name = Some(ident);
            }
            TokenKind::LParen => {
                self.advance();
                let (inner_ty, inner_name) = self.declarator(base.clone())?;
                ty = inner_ty;
                name = inner_name;
                self.expect(&TokenKind::RParen)?;
            }
            _ => {}
        }
        // left-recursive suffixes, as in `long grid[10][5]`
        while matches!(self.peek(), TokenKind::LBracket | TokenKind::LParen) {
            match self.peek() {
                TokenKind::LBracket => ty = self.array_suffix(base.clone())?,
                _ => {
                    self.advance();
                    ty = self.parameter_list(base.clone())?;
                    self.expect(&TokenKind::RParen)?;
                }
            }
            base = ty.clone();
        }
        Ok((ty, name))
    }

    /// Consume every consecutive `[n]` group, then unwind wrapping `base`
    /// outside-in, so `long x[a][b]` builds array(a, array(b, base)).
    ///
    /// A dimension is either empty (unspecified length) or a constant
    /// expression that must reduce to an integer immediate at parse time.
    fn array_suffix(&mut self, base: CType) -> Result<CType, Diagnostic> {
        if !matches!(self.peek(), TokenKind::LBracket) {
            return Ok(base);
        }
        self.advance();
        let span = self.peek_span();
        let length = if !matches!(self.peek(), TokenKind::RBracket) {
            let throwaway = self.cfg.add_block(None);
            let expr = self.constant_expression(throwaway)?;
            let Some(length) = self.symbols.get(expr).as_int() else {
                return Err(DiagnosticBuilder::new(span).build_array_size_not_constant());
            };
            if length < 1 {
                return Err(DiagnosticBuilder::new(span).build_invalid_array_size(length));
            }
            length as u64
        } else {
            // special value for an unspecified array size
            0
        };
        self.expect(&TokenKind::RBracket)?;

        let element = self.array_suffix(base)?;
        Ok(CType::array(length, element))
    }

    /// FOLLOW(parameter-list) = `)`, so an empty list is allowed. A
    /// trailing `, ...` marks the function variadic; a bare trailing comma
    /// is fatal. Parameter names are optional until a definition binds
    /// them.
    fn parameter_list(&mut self, base: CType) -> Result<CType, Diagnostic> {
        let mut params = Vec::new();
        let mut variadic = false;
        while !matches!(self.peek(), TokenKind::RParen) {
            let spec = self.declaration_specifiers()?;
            let (ty, name) = self.declarator(spec)?;
            params.push(Parameter { name, ty });

            if !matches!(self.peek(), TokenKind::Comma) {
                break;
            }
            self.advance();
            if matches!(self.peek(), TokenKind::RParen) {
                return Err(
                    DiagnosticBuilder::new(self.peek_span()).build_trailing_parameter_comma()
                );
            }
            if matches!(self.peek(), TokenKind::Ellipsis) {
                self.advance();
                variadic = true;
                break;
            }
        }
        Ok(CType::function(base, params, variadic))
    }
}
