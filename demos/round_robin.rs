//! Round-robin scheduling on a circular singly linked list, with a bounded
//! circular deque as the completion log.
//!
//! Run with `cargo run --example round_robin`.

use anyhow::{bail, Context, Result};
use strand::{Deque, SinglyLinkedList, Topology};

const QUANTUM: u32 = 3;
const LOG_SIZE: usize = 3;

fn main() -> Result<()> {
    let mut ready = SinglyLinkedList::circular();
    ready.extend_tail([("build", 7_u32), ("lint", 2), ("test", 5), ("docs", 4)])?;
    let mut finished = Deque::with_max_size(Topology::Circular, LOG_SIZE);

    let mut clock = 0;
    while !ready.is_empty() {
        let Some(job) = ready.head().map(|n| n.id().to_owned()) else {
            bail!("non-empty ready list without a head");
        };
        let remaining = ready.data_mut(&job).context("job vanished from the ready list")?;
        let slice = (*remaining).min(QUANTUM);
        *remaining -= slice;
        clock += slice;

        if *remaining == 0 {
            let done = ready.remove_head()?;
            if finished.is_full() {
                finished.pop_head();
            }
            finished.append((done.id, clock))?;
            println!("t={clock:>2} finished {job}");
        } else {
            // Rotate: the head goes to the back of the ring.
            let detail = ready.remove_head()?;
            ready.insert_tail(detail)?;
        }
        println!("      ready: {ready}");
    }

    let log: Vec<_> = finished.iter().map(|e| format!("{}@{}", e.id(), e.data())).collect();
    println!("last {LOG_SIZE} completions: {}", log.join(", "));
    Ok(())
}
