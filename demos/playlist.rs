//! A playlist on a doubly linked list: reorder, skip back, remove tracks.
//!
//! Run with `cargo run --example playlist`.

use anyhow::{Context, Result};
use strand::{DoublyLinkedList, Position, StructureConfig};

const CONFIG: &str = r#"{
    "kind": "doubly_linear",
    "node_manager": {
        "kind": "doubly_linear",
        "anchor_keys": ["head", "tail"],
        "pointer_keys": ["next", "prev"]
    },
    "sizing": { "max_size": 16, "assert_messages": { "overflow": "playlist is full" } }
}"#;

#[derive(Debug, Clone)]
struct Track {
    title: &'static str,
    seconds: u32,
}

fn main() -> Result<()> {
    let config = StructureConfig::from_json(CONFIG).context("parsing playlist config")?;
    let mut playlist = DoublyLinkedList::with_config(&config)?;

    for (id, title, seconds) in [
        ("t1", "Opening", 184),
        ("t2", "Interlude", 61),
        ("t3", "Main Theme", 247),
        ("t4", "Reprise", 132),
    ] {
        playlist.insert_tail((id, Track { title, seconds }))?;
    }
    println!("{playlist}");

    playlist
        .move_node("t4", "t2", Position::Before)
        .context("moving the reprise forward")?;
    println!("reordered: {playlist}");

    if let Some(prev) = playlist.get_prev("t3") {
        println!("before `Main Theme` plays `{}`", prev.data().title);
    }

    let skipped = playlist.extract_by(|e| e.data().seconds < 90);
    if let Some(skipped) = skipped {
        println!("dropped short track `{}` at position {}", skipped.detail.data.title, skipped.index);
    }

    let total: u32 = playlist.reduce(0, |acc, e| acc + e.data().seconds);
    println!("{} tracks, {}m{:02}s total", playlist.len(), total / 60, total % 60);

    let reversed: Vec<_> = playlist.traverse_backward().map(|e| e.data().title).collect();
    println!("reverse order: {}", reversed.join(", "));

    playlist.check_invariants().map_err(anyhow::Error::msg)?;
    Ok(())
}
