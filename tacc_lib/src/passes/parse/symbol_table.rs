use std::rc::Rc;

use crate::diagnostic::{Diagnostic, DiagnosticBuilder, Span};
use crate::ir::ctype::{Arithmetic, CType};
use crate::ir::symbols::{Immediate, Symbol, SymbolArena, SymbolId};

/// Scoped name bindings over the translation-unit symbol arena.
///
/// Symbol records live in the arena for the whole compile. Popping a scope
/// only drops the name bindings it introduced, so ids already written into
/// IR operations stay valid after the scope is gone. Lookup walks the
/// binding list innermost-first; the first match wins.
#[derive(Debug, Default)]
pub struct SymbolTable {
    arena: SymbolArena,
    bindings: Vec<(Rc<str>, SymbolId)>,
    /// Start index into `bindings` for each open scope; depth 0 is file
    /// scope.
    scopes: Vec<usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(self.bindings.len());
    }

    /// Drops the innermost scope's bindings. Any outer binding of the same
    /// name becomes visible again.
    pub fn pop_scope(&mut self) {
        let start = self.scopes.pop().expect("no scope to pop");
        self.bindings.truncate(start);
    }

    /// Current scope depth; 0 is file scope.
    pub fn depth(&self) -> usize {
        self.scopes.len().saturating_sub(1)
    }

    /// Bind `name` at the current depth. Redeclaring a name already bound
    /// at this depth yields the existing symbol; a binding at an outer
    /// depth is shadowed instead.
    pub fn add(&mut self, name: Rc<str>, ty: CType) -> SymbolId {
        let start = *self.scopes.last().expect("no open scope");
        if let Some((_, existing)) = self.bindings[start..].iter().find(|(n, _)| *n == name) {
            return *existing;
        }
        let id = self.arena.add(Symbol {
            name: Some(Rc::clone(&name)),
            ty,
            depth: self.depth(),
            value: None,
        });
        self.bindings.push((name, id));
        id
    }

    /// Innermost-first search over every open scope.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| &**n == name)
            .map(|(_, id)| *id)
    }

    /// A nameless symbol holding an intermediate result; never visible to
    /// lookup.
    pub fn mktemp(&mut self, ty: CType) -> SymbolId {
        self.arena.add(Symbol {
            name: None,
            ty,
            depth: self.depth(),
            value: None,
        })
    }

    /// An integer immediate from its decimal spelling.
    pub fn mkimmediate(&mut self, lexeme: &str, span: Span) -> Result<SymbolId, Diagnostic> {
        let value: i64 = lexeme
            .parse()
            .map_err(|_| DiagnosticBuilder::new(span).build_integer_out_of_range(lexeme))?;
        Ok(self.mkimmediate_int(value))
    }

    /// An integer immediate from a native value.
    pub fn mkimmediate_int(&mut self, value: i64) -> SymbolId {
        self.arena.add(Symbol {
            name: None,
            ty: CType::arithmetic(Arithmetic::Int64),
            depth: self.depth(),
            value: Some(Immediate::Int(value)),
        })
    }

    /// A string immediate; the lexeme is kept verbatim, quotes included.
    pub fn mkimmediate_str(&mut self, lexeme: Rc<str>) -> SymbolId {
        self.arena.add(Symbol {
            name: None,
            ty: CType::pointer(CType::arithmetic(Arithmetic::Char)),
            depth: self.depth(),
            value: Some(Immediate::Str(lexeme)),
        })
    }

    #[track_caller]
    pub fn get(&self, id: SymbolId) -> &Symbol {
        self.arena.get(id)
    }

    #[track_caller]
    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        self.arena.get_mut(id)
    }

    pub fn arena(&self) -> &SymbolArena {
        &self.arena
    }
}
