use crate::diagnostic::{Diagnostic, DiagnosticBuilder};
use crate::ir::cfg::BlockId;
use crate::ir::ctype::TypeKind;
use crate::ir::op::{BinaryOp, Op};
use crate::ir::symbols::SymbolId;
use crate::token::TokenKind;

use super::Parser;

impl Parser {
    /// Lower an expression into `block`, returning the symbol naming its
    /// value. Comma sequencing is not part of the subset, so this is
    /// assignment-expression.
    pub(super) fn expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        self.assignment_expression(block)
    }

    /// Constant expressions share the general grammar; the caller checks
    /// that the resulting symbol is an integer immediate.
    pub(super) fn constant_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        self.conditional_expression(block)
    }

    /// Right-associative by recursion; the value of an assignment is its
    /// left-hand side.
    pub(super) fn assignment_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        let lhs = self.conditional_expression(block)?;
        if matches!(self.peek(), TokenKind::Assign) {
            self.advance();
            let rhs = self.assignment_expression(block)?;
            self.cfg.append(block, Op::Assign { dst: lhs, src: rhs });
        }
        Ok(lhs)
    }

    /// Both arms are evaluated into the current block; the selection itself
    /// is not lowered to control flow yet, and the condition is the value.
    fn conditional_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        let value = self.logical_expression(block)?;
        if matches!(self.peek(), TokenKind::Question) {
            self.advance();
            self.expression(block)?;
            self.expect(&TokenKind::Colon)?;
            self.conditional_expression(block)?;
        }
        Ok(value)
    }

    /// `&&` and `||` as plain binary ops, without short-circuit splits.
    fn logical_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        let mut lhs = self.or_expression(block)?;
        loop {
            let op = match self.peek() {
                TokenKind::AmpAmp => BinaryOp::LogicalAnd,
                TokenKind::PipePipe => BinaryOp::LogicalOr,
                _ => break,
            };
            self.advance();
            let rhs = self.or_expression(block)?;
            lhs = self.binary(block, op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `|` and `^` share a level.
    fn or_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        let mut lhs = self.and_expression(block)?;
        loop {
            let op = match self.peek() {
                TokenKind::Pipe => BinaryOp::BitOr,
                TokenKind::Caret => BinaryOp::BitXor,
                _ => break,
            };
            self.advance();
            let rhs = self.and_expression(block)?;
            lhs = self.binary(block, op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        let mut lhs = self.equality_expression(block)?;
        while matches!(self.peek(), TokenKind::Amp) {
            self.advance();
            let rhs = self.equality_expression(block)?;
            lhs = self.binary(block, BinaryOp::BitAnd, lhs, rhs);
        }
        Ok(lhs)
    }

    // The next three levels are grammar placeholders: the op set has no
    // comparison or shift opcodes yet.

    fn equality_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        self.relational_expression(block)
    }

    fn relational_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        self.shift_expression(block)
    }

    fn shift_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        self.additive_expression(block)
    }

    fn additive_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        let mut lhs = self.multiplicative_expression(block)?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.multiplicative_expression(block)?;
            lhs = self.binary(block, op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn multiplicative_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        let mut lhs = self.cast_expression(block)?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.cast_expression(block)?;
            lhs = self.binary(block, op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn cast_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        self.unary_expression(block)
    }

    fn unary_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        self.postfix_expression(block)
    }

    /// Append one binary operation, producing a fresh temporary of the
    /// combined operand type.
    fn binary(
        &mut self,
        block: BlockId,
        op: BinaryOp,
        lhs: SymbolId,
        rhs: SymbolId,
    ) -> SymbolId {
        let ty = self
            .symbols
            .get(lhs)
            .ty
            .combine(&self.symbols.get(rhs).ty);
        let dst = self.symbols.mktemp(ty);
        self.cfg.append(block, Op::Binary { op, dst, lhs, rhs });
        dst
    }

    fn postfix_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        let mut root = self.primary_expression(block)?;
        loop {
            match self.peek() {
                TokenKind::LBracket => {
                    self.advance();
                    root = self.index_expression(block, root)?;
                }
                // calls and member access are grammar-present only
                TokenKind::LParen | TokenKind::Dot => {
                    let token = self.advance();
                    return Err(DiagnosticBuilder::new(token.span)
                        .build_invalid_postfix(token.kind.describe()));
                }
                _ => return Ok(root),
            }
        }
    }

    /// `a[i]`: scale the index by the element size and add it to the base.
    /// An array-of-arrays element peels one rank without a load; anything
    /// else must be a pointer by now and is loaded through.
    fn index_expression(
        &mut self,
        block: BlockId,
        root: SymbolId,
    ) -> Result<SymbolId, Diagnostic> {
        let span = self.peek_span();
        let index = self.expression(block)?;
        let root_ty = self.symbols.get(root).ty.clone();
        let Some(element) = root_ty.deref() else {
            return Err(DiagnosticBuilder::new(span).build_deref_non_pointer(&root_ty));
        };
        let scale = self.symbols.mkimmediate_int(element.size() as i64);
        let offset = self.binary(block, BinaryOp::Mul, index, scale);
        let address = self.binary(block, BinaryOp::Add, root, offset);
        self.expect(&TokenKind::RBracket)?;

        let address_ty = self.symbols.get(address).ty.clone();
        match address_ty.deref() {
            Some(pointee) if pointee.is_array() => {
                // one more rank decays; the load happens at the innermost
                // rank only
                let pointee = pointee.clone();
                self.symbols.get_mut(address).ty = pointee;
                Ok(address)
            }
            _ => {
                let TypeKind::Pointer(pointee) = &address_ty.kind else {
                    return Err(DiagnosticBuilder::new(span).build_deref_non_pointer(&address_ty));
                };
                let result = self.symbols.mktemp((**pointee).clone());
                self.cfg.append(
                    block,
                    Op::Deref {
                        dst: result,
                        src: address,
                    },
                );
                Ok(result)
            }
        }
    }

    fn primary_expression(&mut self, block: BlockId) -> Result<SymbolId, Diagnostic> {
        let token = self.advance();
        match token.kind {
            TokenKind::Identifier(name) => self
                .symbols
                .lookup(&name)
                .ok_or_else(|| DiagnosticBuilder::new(token.span).build_undefined_symbol(&name)),
            TokenKind::Integer(lexeme) => self.symbols.mkimmediate(&lexeme, token.span),
            TokenKind::LParen => {
                let value = self.expression(block)?;
                self.expect(&TokenKind::RParen)?;
                Ok(value)
            }
            other => {
                Err(DiagnosticBuilder::new(token.span).build_invalid_primary(other.describe()))
            }
        }
    }
}
