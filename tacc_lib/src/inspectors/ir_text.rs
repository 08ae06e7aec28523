//! Textual rendering of lowered functions.
//!
//! Blocks print in depth-first preorder from the entry; the entry carries
//! the function name as its label and every other reachable block gets a
//! generated `.L<n>` label. Temporaries are numbered per function in order
//! of first use; immediates print inline.

use std::fmt::Write;

use rustc_hash::FxHashMap;

use crate::ir::cfg::{BlockId, Function};
use crate::ir::op::Op;
use crate::ir::symbols::{Immediate, SymbolId};
use crate::passes::parse::symbol_table::SymbolTable;

pub(crate) struct OperandNamer<'a> {
    symbols: &'a SymbolTable,
    temps: FxHashMap<SymbolId, usize>,
}

impl<'a> OperandNamer<'a> {
    pub(crate) fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            temps: FxHashMap::default(),
        }
    }

    pub(crate) fn name(&mut self, id: SymbolId) -> String {
        let symbol = self.symbols.get(id);
        if let Some(value) = &symbol.value {
            return match value {
                Immediate::Int(v) => v.to_string(),
                Immediate::Str(s) => s.to_string(),
            };
        }
        if let Some(name) = &symbol.name {
            return name.to_string();
        }
        let next = self.temps.len();
        let number = *self.temps.entry(id).or_insert(next);
        format!("t{number}")
    }
}

pub(crate) fn render_op(op: &Op, namer: &mut OperandNamer) -> String {
    match op {
        Op::Assign { dst, src } => format!("{} = {}", namer.name(*dst), namer.name(*src)),
        Op::Deref { dst, src } => format!("{} = *{}", namer.name(*dst), namer.name(*src)),
        Op::Binary { op, dst, lhs, rhs } => format!(
            "{} = {} {} {}",
            namer.name(*dst),
            namer.name(*lhs),
            op.spelling(),
            namer.name(*rhs)
        ),
    }
}

/// Render one finished function. This is the emitter handed every function
/// as soon as its definition has been parsed.
pub fn emit_function(function: &Function, symbols: &SymbolTable) -> String {
    let order = function.cfg.preorder_from(function.entry);

    let mut labels: FxHashMap<BlockId, String> = FxHashMap::default();
    let mut generated = 0usize;
    for id in &order {
        if *id == function.entry {
            labels.insert(*id, function.name.to_string());
        } else {
            labels.insert(*id, format!(".L{generated}"));
            generated += 1;
        }
    }

    let mut namer = OperandNamer::new(symbols);
    let mut out = String::new();
    for id in &order {
        let block = &function.cfg[*id];
        writeln!(out, "{}:", labels[id]).unwrap();
        for op in &block.ops {
            writeln!(out, "\t{}", render_op(op, &mut namer)).unwrap();
        }
        match block.jump {
            [None, None] => match block.expr {
                Some(value) => writeln!(out, "\treturn {}", namer.name(value)).unwrap(),
                None => writeln!(out, "\treturn").unwrap(),
            },
            [Some(target), None] => writeln!(out, "\tgoto {}", labels[&target]).unwrap(),
            [Some(zero), Some(nonzero)] => {
                let condition = block.expr.expect("conditional branch without a condition");
                writeln!(out, "\tif {} goto {}", namer.name(condition), labels[&nonzero]).unwrap();
                writeln!(out, "\tgoto {}", labels[&zero]).unwrap();
            }
            [None, Some(_)] => unreachable!("second jump slot set without the first"),
        }
    }
    out
}
