//! Store maintenance commands: `list`, `show`, `clear`, `rename`.
//!
//! These operate on the persisted store directly and never touch live windows.

use std::io::Write;

use space_ids::MonitorId;
use spaces::{Slot, StoreBackend, VirtualSpacesStore};
use tracing::info;

use crate::{
    cli::{RenameArgs, SlotArgs},
    error::{Error, Result},
};

/// Monitors a slot command applies to.
fn targets(store: &VirtualSpacesStore, args: &SlotArgs) -> Vec<MonitorId> {
    match &args.monitor {
        Some(id) => vec![MonitorId::from(id.as_str())],
        None => store.monitors_with(Slot::new(i64::from(args.slot))),
    }
}

/// One line per monitor, then one per non-empty slot.
pub fn list(store: &VirtualSpacesStore, out: &mut impl Write) -> Result<()> {
    if store.is_empty() {
        writeln!(out, "no saved spaces")?;
        return Ok(());
    }
    for monitor in store.monitors() {
        writeln!(out, "{monitor}")?;
        for space in store.get_non_empty(monitor) {
            let names = space.app_names().join(", ");
            match &space.name {
                Some(name) => writeln!(out, "  [{}] {name}: {names}", space.number)?,
                None => writeln!(out, "  [{}] {names}", space.number)?,
            }
        }
    }
    Ok(())
}

/// Windows of the selected slot, front to back.
pub fn show(store: &VirtualSpacesStore, args: &SlotArgs, out: &mut impl Write) -> Result<()> {
    let slot = Slot::new(i64::from(args.slot));
    let monitors = targets(store, args);
    if monitors.is_empty() {
        return Err(Error::other(format!("slot {slot} is empty on every monitor")));
    }
    for monitor in monitors {
        let space = store.get(&monitor, slot).ok_or_else(|| Error::NoSuchSpace {
            monitor: monitor.clone(),
            slot: args.slot,
        })?;
        match &space.name {
            Some(name) => writeln!(out, "{monitor} [{slot}] {name}")?,
            None => writeln!(out, "{monitor} [{slot}]")?,
        }
        for w in space.windows_by_z_order() {
            writeln!(
                out,
                "  z={} {} {:?} {}",
                w.z_index,
                w.display_name(),
                w.title,
                w.rect()
            )?;
        }
    }
    Ok(())
}

/// Remove the selected slot; returns the number of spaces deleted.
pub fn clear(backend: &dyn StoreBackend, args: &SlotArgs) -> Result<usize> {
    let mut store = backend.load()?;
    let slot = Slot::new(i64::from(args.slot));
    let removed = targets(&store, args)
        .iter()
        .filter(|m| store.remove(m, slot).is_some())
        .count();
    if removed > 0 {
        backend.save(&store)?;
    }
    info!(slot = args.slot, removed, "cleared");
    Ok(removed)
}

/// Rename the selected slot; returns the number of spaces changed.
pub fn rename(backend: &dyn StoreBackend, args: &RenameArgs) -> Result<usize> {
    let mut store = backend.load()?;
    let slot = Slot::new(i64::from(args.target.slot));
    let mut changed = 0;
    for monitor in targets(&store, &args.target) {
        if store.rename(&monitor, slot, args.name.clone()) {
            changed += 1;
        }
    }
    if changed > 0 {
        backend.save(&store)?;
    }
    info!(slot = args.target.slot, changed, "renamed");
    Ok(changed)
}
