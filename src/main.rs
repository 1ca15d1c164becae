//! Pupiletras Demo
//!
//! Generates a seeded puzzle, then simulates a two-peer collaborative
//! room over the in-memory bus: role race, late-joiner sync, found-word
//! proposal and a requested regeneration.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pupiletras::session::{
    deliver, derive_room_id, join_room, pump_until_idle, MemoryHub, Role, RoomOptions, Session,
};
use pupiletras::{default_pool, PuzzleConfig, PuzzleState, VERSION};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Pupiletras v{}", VERSION);

    demo_puzzle();
    demo_room()?;
    Ok(())
}

/// Generate and print one seeded puzzle.
fn demo_puzzle() {
    info!("=== Seeded Puzzle ===");

    let config = PuzzleConfig {
        size: 14,
        word_count: 12,
        seed: Some("amigos2025".to_string()),
    };
    let state = PuzzleState::generate(&config, &default_pool());

    info!("Seed: amigos2025, size: {}", state.size());
    info!("Placed {} words", state.placed().len());
    for row in state.grid().rows() {
        info!("  {}", row);
    }
    for word in state.placed() {
        info!("  word: {}", word.word);
    }
    info!("State hash: {}", hex::encode(state.state_hash()));

    // Regenerating from the same seed must reproduce the grid exactly
    let replay = PuzzleState::generate(&config, &default_pool());
    if replay.state_hash() == state.state_hash() {
        info!("DETERMINISM VERIFIED: hashes match");
    } else {
        info!("DETERMINISM FAILURE: hashes differ!");
    }
}

/// Simulate a two-peer room on the in-memory bus.
fn demo_room() -> Result<()> {
    info!("=== Collaborative Room ===");

    let mut hub = MemoryHub::new();
    let room_id = derive_room_id("juegos.example/sopa");
    let config = PuzzleConfig {
        size: 12,
        word_count: 8,
        seed: Some("sala-demo".to_string()),
    };

    let mut ana = join_room(
        &mut hub,
        &room_id,
        RoomOptions::with_name("Ana"),
        config.clone(),
        default_pool(),
    )?;
    let mut beto = join_room(
        &mut hub,
        &room_id,
        RoomOptions::with_name("Beto"),
        config,
        default_pool(),
    )?;

    info!("Ana is {:?}, Beto is {:?}", ana.role(), beto.role());
    assert_eq!(ana.role(), Role::Authority);
    assert_eq!(beto.role(), Role::Participant);

    // Drain the handshake: open events, hello, init_state
    pump_all(&mut hub, &mut ana, &mut beto);

    // Beto finds the first word of his replica and proposes it
    let path = beto.state().placed()[0].path.clone();
    let proposal = beto.commit_selection(&path);
    let endpoint = beto.endpoint();
    deliver(&mut hub, endpoint, proposal);
    pump_all(&mut hub, &mut ana, &mut beto);

    // Beto asks for a bigger puzzle
    if let Session::Participant(part) = &beto {
        let request = part.request_new_puzzle(Some(20), Some(15));
        deliver(&mut hub, endpoint, request);
    }
    pump_all(&mut hub, &mut ana, &mut beto);

    info!(
        "Final grids: host {}x{}, guest {}x{}",
        ana.state().size(),
        ana.state().size(),
        beto.state().size(),
        beto.state().size()
    );
    info!(
        "Replicas in sync: {}",
        ana.state().state_hash() == beto.state().state_hash()
    );

    for event in ana.drain_events() {
        info!("host feed: {}", event);
    }
    for event in beto.drain_events() {
        info!("guest feed: {}", event);
    }
    Ok(())
}

fn pump_all(hub: &mut MemoryHub, a: &mut Session, b: &mut Session) {
    pump_until_idle(hub, &mut [a, b]);
}
