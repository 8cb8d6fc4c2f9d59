//! Menu bar example driving a MenuRibbon engine with a printing coordinator.
//!
//! Run with: `cargo run --example menu_bar`

#![allow(clippy::unwrap_used)]

use menuribbon::prelude::*;
use std::rc::Rc;

#[derive(Default)]
struct PrintingCoordinator {
    responsive: bool,
}

impl PopupManager for PrintingCoordinator {
    fn enter(&mut self, item: ElementId, immediate: bool) {
        println!("  coordinator: enter {item} (immediate: {immediate})");
    }

    fn exit(&mut self, item: ElementId) {
        println!("  coordinator: exit {item}");
    }

    fn is_responsive(&self) -> bool {
        self.responsive
    }

    fn set_responsive(&mut self, responsive: bool) {
        println!("  coordinator: responsive = {responsive}");
        self.responsive = responsive;
    }

    fn set_opened_item(&mut self, item: Option<ElementId>) {
        println!("  coordinator: opened = {item:?}");
    }

    fn set_highlighted_item(&mut self, item: Option<ElementId>) {
        println!("  coordinator: highlighted = {item:?}");
    }

    fn set_tracking(&mut self, tracking: bool) {
        println!("  coordinator: tracking = {tracking}");
    }
}

fn main() {
    println!("=== MenuRibbon Menu Bar Example ===\n");

    let mut engine = MenuEngine::new();
    let root = engine.create_root(shared(PrintingCoordinator::default()));

    let file = engine.create_named_item("File");
    let help = engine.create_named_item("Help");
    engine.attach(file, root).unwrap();
    engine.attach(help, root).unwrap();

    let recent = engine.create_named_item("Recent");
    engine.add_entry(file, recent).unwrap();
    engine.add_entry(recent, "notes.txt").unwrap();
    let separator = engine.create_separator();
    engine.add_entry(file, separator).unwrap();
    engine
        .add_entry(
            file,
            MenuEntry::command("Quit", RelayCommand::new(|| println!("  command: quit"))),
        )
        .unwrap();
    engine
        .set_command(help, Some(Rc::new(RelayCommand::new(|| println!("  command: help")))))
        .unwrap();

    for (name, id) in [("File", file), ("Recent", recent), ("Help", help)] {
        let state = engine.item_state(id).unwrap();
        println!("{name} ({id}): {:?}, top = {}", state.role, state.top);
    }

    println!("\nPointer down on File:");
    engine.pointer_down(file, MouseButton::Left);

    println!("\nPointer down on Recent:");
    engine.pointer_down(recent, MouseButton::Left);

    println!("\nArrow right from File:");
    engine.key_down(file, Key::Right);

    println!("\nClick on Help:");
    engine.action(help);

    println!("\n=== Example Complete ===");
}
