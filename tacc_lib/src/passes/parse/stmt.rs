use crate::diagnostic::{Diagnostic, DiagnosticBuilder};
use crate::ir::cfg::BlockId;
use crate::token::TokenKind;

use super::{LoopContext, Parser};

impl Parser {
    /// Compound statement. Statements and declarations are freely
    /// interleaved; each statement's tail becomes the next one's parent.
    pub(super) fn compound(&mut self, mut parent: BlockId) -> Result<BlockId, Diagnostic> {
        self.expect(&TokenKind::LBrace)?;
        while !matches!(self.peek(), TokenKind::RBrace) {
            if self.at_eof() {
                return Err(DiagnosticBuilder::new(self.peek_span())
                    .build_unexpected_token("end of input", "`}`"));
            }
            parent = self.statement(parent)?;
        }
        self.advance();
        Ok(parent)
    }

    /// Lower one statement into `parent` and return the block subsequent
    /// statements continue into. Straight-line statements return `parent`
    /// itself; branching statements splice new blocks and return a fresh
    /// tail, so callers must keep their own handles to the roots.
    pub(super) fn statement(&mut self, parent: BlockId) -> Result<BlockId, Diagnostic> {
        match self.peek() {
            TokenKind::Semicolon => {
                self.advance();
                Ok(parent)
            }
            TokenKind::LBrace => {
                self.symbols.push_scope();
                let tail = self.compound(parent)?;
                self.symbols.pop_scope();
                Ok(tail)
            }
            TokenKind::If | TokenKind::Switch => self.selection_statement(parent),
            TokenKind::While => self.while_statement(parent),
            TokenKind::Do => self.do_statement(parent),
            TokenKind::For => self.for_statement(parent),
            TokenKind::Continue | TokenKind::Break => self.jump_statement(parent),
            TokenKind::Return => {
                self.advance();
                if !matches!(self.peek(), TokenKind::Semicolon) {
                    let value = self.expression(parent)?;
                    self.cfg[parent].expr = Some(value);
                }
                self.expect(&TokenKind::Semicolon)?;
                // anything lowered after this is dead until a label
                // mechanism makes it reachable again
                Ok(self.cfg.add_block(None))
            }
            TokenKind::Goto => {
                self.advance();
                let target = self.advance();
                if !matches!(target.kind, TokenKind::Identifier(_)) {
                    return Err(DiagnosticBuilder::new(target.span)
                        .build_unexpected_token(target.kind.describe(), "identifier"));
                }
                // label targets are not wired up; the name is discarded
                self.expect(&TokenKind::Semicolon)?;
                Ok(parent)
            }
            TokenKind::Case => {
                // consumed transparently; case dispatch is not lowered
                self.advance();
                if !matches!(self.peek(), TokenKind::Colon) {
                    self.constant_expression(parent)?;
                }
                self.expect(&TokenKind::Colon)?;
                Ok(parent)
            }
            TokenKind::Default => {
                self.advance();
                self.expect(&TokenKind::Colon)?;
                Ok(parent)
            }
            TokenKind::Identifier(_)
            | TokenKind::Integer(_)
            | TokenKind::String(_)
            | TokenKind::LParen => {
                self.expression(parent)?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(parent)
            }
            _ => {
                let _ = self.declaration()?;
                Ok(parent)
            }
        }
    }

    /// `if` and `switch` lower identically for now: a two-way branch on the
    /// condition with an empty join block returned as the new tail. Case
    /// dispatch is not lowered.
    fn selection_statement(&mut self, parent: BlockId) -> Result<BlockId, Diagnostic> {
        let right = self.cfg.add_block(None);
        let next = self.cfg.add_block(None);
        self.advance();
        self.expect(&TokenKind::LParen)?;

        // the parent becomes the branch: condition value in `expr`, code to
        // compute it appended in place
        let condition = self.expression(parent)?;
        self.cfg[parent].expr = Some(condition);
        self.expect(&TokenKind::RParen)?;

        self.cfg[parent].jump = [Some(next), Some(right)];

        // Order matters: lower into `right` first, then wire the resulting
        // tail (which may be a different block) to the join.
        let tail = self.statement(right)?;
        self.cfg[tail].jump[0] = Some(next);

        if matches!(self.peek(), TokenKind::Else) {
            self.advance();
            let left = self.cfg.add_block(None);
            self.cfg[parent].jump[0] = Some(left);
            let tail = self.statement(left)?;
            self.cfg[tail].jump[0] = Some(next);
        }
        Ok(next)
    }

    fn while_statement(&mut self, parent: BlockId) -> Result<BlockId, Diagnostic> {
        let top = self.cfg.add_block(None);
        let body = self.cfg.add_block(None);
        let next = self.cfg.add_block(None);

        // parent falls through into the test
        self.cfg[parent].jump[0] = Some(top);
        self.loops.push(LoopContext {
            break_target: next,
            continue_target: top,
        });

        self.advance();
        self.expect(&TokenKind::LParen)?;
        let condition = self.expression(top)?;
        self.cfg[top].expr = Some(condition);
        self.expect(&TokenKind::RParen)?;
        self.cfg[top].jump = [Some(next), Some(body)];

        let tail = self.statement(body)?;
        self.cfg[tail].jump[0] = Some(top);

        self.loops.pop();
        Ok(next)
    }

    /// Like `while`, except the condition is lowered into the body's tail
    /// after the body itself; that tail becomes the backward branch.
    fn do_statement(&mut self, parent: BlockId) -> Result<BlockId, Diagnostic> {
        let top = self.cfg.add_block(None);
        let next = self.cfg.add_block(None);

        self.cfg[parent].jump[0] = Some(top);
        self.loops.push(LoopContext {
            break_target: next,
            continue_target: top,
        });

        self.advance();
        let tail = self.statement(top)?;
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let condition = self.expression(tail)?;
        self.cfg[tail].expr = Some(condition);
        self.cfg[tail].jump = [Some(next), Some(top)];
        self.expect(&TokenKind::RParen)?;

        self.loops.pop();
        Ok(next)
    }

    fn for_statement(&mut self, parent: BlockId) -> Result<BlockId, Diagnostic> {
        let mut top = self.cfg.add_block(None);
        let body = self.cfg.add_block(None);
        let increment = self.cfg.add_block(None);
        let next = self.cfg.add_block(None);

        self.loops.push(LoopContext {
            break_target: next,
            continue_target: top,
        });

        self.advance();
        self.expect(&TokenKind::LParen)?;
        if !matches!(self.peek(), TokenKind::Semicolon) {
            self.expression(parent)?;
        }
        self.expect(&TokenKind::Semicolon)?;
        if !matches!(self.peek(), TokenKind::Semicolon) {
            self.cfg[parent].jump[0] = Some(top);
            let condition = self.expression(top)?;
            self.cfg[top].expr = Some(condition);
            self.cfg[top].jump = [Some(next), Some(body)];
        } else {
            // no condition: drop the test block and loop straight back to
            // the body
            self.cfg.remove(top);
            self.cfg[parent].jump[0] = Some(body);
            top = body;
            if let Some(innermost) = self.loops.last_mut() {
                innermost.continue_target = body;
            }
        }
        self.expect(&TokenKind::Semicolon)?;
        if !matches!(self.peek(), TokenKind::RParen) {
            self.expression(increment)?;
            self.cfg[increment].jump[0] = Some(top);
        }
        self.expect(&TokenKind::RParen)?;

        let tail = self.statement(body)?;
        self.cfg[tail].jump[0] = Some(increment);

        self.loops.pop();
        Ok(next)
    }

    /// `break` and `continue` retarget the parent to the innermost loop
    /// context and return a fresh orphan block; dead code after the jump
    /// keeps lowering into it until a later pass prunes it.
    fn jump_statement(&mut self, parent: BlockId) -> Result<BlockId, Diagnostic> {
        let token = self.advance();
        let Some(innermost) = self.loops.last() else {
            return Err(
                DiagnosticBuilder::new(token.span).build_jump_outside_loop(token.kind.describe())
            );
        };
        let target = match token.kind {
            TokenKind::Continue => innermost.continue_target,
            _ => innermost.break_target,
        };
        self.cfg[parent].jump[0] = Some(target);
        self.expect(&TokenKind::Semicolon)?;
        Ok(self.cfg.add_block(None))
    }
}
