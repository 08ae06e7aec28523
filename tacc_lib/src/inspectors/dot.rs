//! Graphviz rendering of a function's control-flow graph.
//!
//! Unlike the textual emitter this shows *every* block in the arena, so it
//! is the view to reach for when inspecting orphans before pruning.

use std::fmt::Write;

use rustc_hash::FxHashMap;

use crate::ir::cfg::Function;
use crate::passes::parse::symbol_table::SymbolTable;

use super::ir_text::{render_op, OperandNamer};

pub fn inspect_cfg(function: &Function, symbols: &SymbolTable) -> String {
    let mut node_names = FxHashMap::default();
    for (i, (id, _)) in function.cfg.blocks().enumerate() {
        node_names.insert(id, format!("b{i}"));
    }

    let mut namer = OperandNamer::new(symbols);
    let mut out = String::new();
    writeln!(out, "digraph \"{}\" {{", function.name).unwrap();
    writeln!(out, "\tnode [shape=box, fontname=\"monospace\"];").unwrap();

    for (id, block) in function.cfg.blocks() {
        let mut label = String::new();
        if let Some(name) = &block.label {
            label.push_str(&format!("{name}:\\l"));
        }
        for op in &block.ops {
            label.push_str(&format!("{}\\l", render_op(op, &mut namer)));
        }
        if let Some(condition) = block.expr {
            label.push_str(&format!("expr: {}\\l", namer.name(condition)));
        }
        let highlight = if id == function.entry {
            ", penwidth=2"
        } else {
            ""
        };
        writeln!(out, "\t{} [label=\"{}\"{}];", node_names[&id], label, highlight).unwrap();
    }

    for (id, block) in function.cfg.blocks() {
        match block.jump {
            [Some(zero), Some(nonzero)] => {
                writeln!(out, "\t{} -> {} [label=\"0\"];", node_names[&id], node_names[&zero])
                    .unwrap();
                writeln!(
                    out,
                    "\t{} -> {} [label=\"1\"];",
                    node_names[&id], node_names[&nonzero]
                )
                .unwrap();
            }
            [Some(target), None] => {
                writeln!(out, "\t{} -> {};", node_names[&id], node_names[&target]).unwrap();
            }
            _ => {}
        }
    }

    writeln!(out, "}}").unwrap();
    out
}
