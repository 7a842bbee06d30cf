//! Small editing session demonstrating the Tanner graph engine

use tanner_core::{EditorConfig, Intent, Key, NodeId, SharedEditor};

fn show(editor: &SharedEditor, label: &str, intent: Intent) {
    match editor.dispatch(intent) {
        Ok(outcome) => println!("  {:<28} -> {:?}", label, outcome),
        Err(e) => println!("  {:<28} -> Error: {}", label, e),
    }
}

fn main() {
    println!("=== Tanner Editor Demo ===\n");

    let editor = SharedEditor::new(&EditorConfig::default());
    println!("✓ Editor initialized\n");

    println!("Building a small graph:");
    show(&editor, "click (0, 0)", Intent::Click { x: 0, y: 0 });
    show(&editor, "click (1, 0)", Intent::Click { x: 1, y: 0 });
    show(&editor, "click (2, 0)", Intent::Click { x: 2, y: 0 });
    show(&editor, "click check#0", Intent::NodeClick(NodeId::check(0)));
    show(&editor, "click (0, 1)", Intent::Click { x: 0, y: 1 });
    show(&editor, "hover var#1", Intent::HoverEnter(NodeId::var(1)));

    println!();
    match editor.to_json() {
        Ok(json) => println!("Snapshot:\n{}\n", json),
        Err(e) => println!("Snapshot error: {}\n", e),
    }

    println!("Deleting and undoing:");
    show(&editor, "click check#0", Intent::NodeClick(NodeId::check(0)));
    show(&editor, "delete", Intent::Key(Key::Delete));
    show(&editor, "delete (nothing selected)", Intent::Key(Key::Delete));
    show(&editor, "undo", Intent::Key(Key::Undo));

    println!();
    let scene = editor.scene();
    println!(
        "Scene at scale {}: {} nodes, {} edges",
        scene.scale,
        scene.nodes.len(),
        scene.edges.len()
    );

    println!("\n=== Demo Complete ===");
}
