//! Removal of blocks that cannot be reached from a function's entry.
//!
//! The lowering deliberately leaks orphans: the fresh tails returned after
//! `return`/`break`/`continue`, the dropped test block of a condition-less
//! `for`, and the throwaway blocks constant expressions evaluate into. None
//! of them are reachable from the entry, so one sweep drops them all.

use crate::ir::cfg::Function;

/// Delete every block the entry cannot reach. Returns the number of blocks
/// removed.
pub fn prune_blocks(function: &mut Function) -> usize {
    let reachable = function.cfg.reachable_from(function.entry);
    let dead: Vec<_> = function
        .cfg
        .block_ids()
        .filter(|id| !reachable.contains(id))
        .collect();
    for id in &dead {
        function.cfg.remove(*id);
    }
    dead.len()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::cfg::Cfg;

    #[test]
    fn drops_orphans_and_keeps_the_loop() {
        let mut cfg = Cfg::new();
        let entry = cfg.add_block(Some("f".into()));
        let top = cfg.add_block(None);
        let body = cfg.add_block(None);
        let next = cfg.add_block(None);
        let orphan = cfg.add_block(None);
        let throwaway = cfg.add_block(None);
        cfg[entry].jump[0] = Some(top);
        cfg[top].jump = [Some(next), Some(body)];
        cfg[body].jump[0] = Some(top);
        cfg[orphan].jump[0] = Some(next);

        let mut function = Function {
            name: "f".into(),
            entry,
            cfg,
        };
        assert_eq!(prune_blocks(&mut function), 2);
        assert_eq!(function.cfg.len(), 4);
        assert!(function.cfg.get(orphan).is_none());
        assert!(function.cfg.get(throwaway).is_none());
        assert!(function.cfg.get(body).is_some());
    }

    #[test]
    fn a_lone_entry_survives() {
        let mut cfg = Cfg::new();
        let entry = cfg.add_block(Some("f".into()));
        let mut function = Function {
            name: "f".into(),
            entry,
            cfg,
        };
        assert_eq!(prune_blocks(&mut function), 0);
        assert_eq!(function.cfg.len(), 1);
    }
}
