//! End-to-end scenarios for the room state machine.
//!
//! Each test drives a [`Room`] through connect/join/mark/disconnect and
//! checks both the registry and what every connection's outbox received.

#![allow(
    clippy::unwrap_used,
    clippy::unreachable,
    clippy::arithmetic_side_effects
)]

use bingo_room::{MarkOutcome, Room, RoomRegistry};
use bingo_types::{
    CellUnmarked, ConnectionId, JoinRequest, MarkCellRequest, PlayerWon, ServerMessage,
};
use tokio::sync::mpsc::Receiver;

fn drain(rx: &mut Receiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

fn abc_board() -> JoinRequest {
    JoinRequest {
        name: "Alice".to_owned(),
        board_size: 3,
        board_data: vec![
            vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
            vec!["d".to_owned(), "e".to_owned(), "f".to_owned()],
            vec!["g".to_owned(), "h".to_owned(), "i".to_owned()],
        ],
    }
}

fn mark(row: usize, col: usize, text: &str) -> MarkCellRequest {
    MarkCellRequest {
        row,
        col,
        cell_text: text.to_owned(),
    }
}

// =========================================================================
// Tests
// =========================================================================

#[test]
fn diagonal_win_after_three_marks() {
    let mut room = Room::new();
    let a = ConnectionId::new();
    let mut rx = room.connect(a);
    room.join(a, abc_board()).unwrap();
    drain(&mut rx);

    room.mark_cell(a, mark(0, 0, "a"));
    room.mark_cell(a, mark(1, 1, "e"));
    let last = room.mark_cell(a, mark(2, 2, "i"));
    assert_eq!(last, MarkOutcome::Marked { won: true });

    let events = drain(&mut rx);
    assert_eq!(events.len(), 4);
    assert_eq!(
        events.last(),
        Some(&ServerMessage::PlayerWon(PlayerWon {
            player_id: a,
            player_name: "Alice".to_owned(),
        }))
    );

    let history = room.registry().snapshot().mark_history;
    let cells: Vec<(usize, usize, &str)> = history
        .iter()
        .map(|e| (e.row, e.col, e.cell_text.as_str()))
        .collect();
    assert_eq!(cells, vec![(0, 0, "a"), (1, 1, "e"), (2, 2, "i")]);
    assert!(history.iter().all(|e| e.player_id == a));
    assert!(history.windows(2).all(|w| match w {
        [first, second] => first.timestamp <= second.timestamp,
        _ => true,
    }));
}

#[test]
fn late_joiner_sees_existing_player() {
    let mut room = Room::new();
    let a = ConnectionId::new();
    let mut rx_a = room.connect(a);
    room.join(a, abc_board()).unwrap();
    drain(&mut rx_a);

    let b = ConnectionId::new();
    let mut rx_b = room.connect(b);
    let bob = room
        .join(
            b,
            JoinRequest {
                name: "Bob".to_owned(),
                board_size: 4,
                board_data: Vec::new(),
            },
        )
        .unwrap();

    let b_events = drain(&mut rx_b);
    let Some(ServerMessage::InitialState(initial)) = b_events.first() else {
        unreachable!("first message to a new connection is initialState");
    };
    assert_eq!(initial.players.len(), 1);
    let alice = initial.players.first().unwrap();
    assert_eq!(alice.id, a);
    assert_eq!(alice.marked_count(), 0);
    assert_eq!(b_events.get(1), Some(&ServerMessage::PlayerJoined(bob.clone())));

    assert_eq!(drain(&mut rx_a), vec![ServerMessage::PlayerJoined(bob)]);
}

#[test]
fn mark_then_unmark_leaves_no_history() {
    let mut room = Room::new();
    let a = ConnectionId::new();
    let mut rx = room.connect(a);
    room.join(a, abc_board()).unwrap();
    drain(&mut rx);

    assert_eq!(
        room.mark_cell(a, mark(0, 0, "a")),
        MarkOutcome::Marked { won: false }
    );
    assert_eq!(room.registry().history_len(), 1);
    assert_eq!(room.mark_cell(a, mark(0, 0, "a")), MarkOutcome::Unmarked);

    // The history entry from the mark stays; the unmark adds none.
    assert_eq!(room.registry().history_len(), 1);
    assert!(!room.registry().get(a).unwrap().is_marked(0, 0));

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(matches!(events.first(), Some(ServerMessage::CellMarked(_))));
    assert_eq!(
        events.get(1),
        Some(&ServerMessage::CellUnmarked(CellUnmarked {
            player_id: a,
            row: 0,
            col: 0,
        }))
    );
}

#[test]
fn toggle_twice_on_every_cell_restores_board() {
    for n in 1..=5 {
        let mut room = Room::new();
        let a = ConnectionId::new();
        let mut rx = room.connect(a);
        room.join(
            a,
            JoinRequest {
                name: "Grid".to_owned(),
                board_size: n,
                board_data: Vec::new(),
            },
        )
        .unwrap();
        drain(&mut rx);

        for row in 0..n {
            for col in 0..n {
                let before = room.registry().history_len();
                room.mark_cell(a, mark(row, col, "x"));
                room.mark_cell(a, mark(row, col, "x"));
                assert_eq!(room.registry().history_len(), before + 1);
                assert!(!room.registry().get(a).unwrap().is_marked(row, col));

                let events = drain(&mut rx);
                let marked = events
                    .iter()
                    .filter(|m| matches!(m, ServerMessage::CellMarked(_)))
                    .count();
                let unmarked = events
                    .iter()
                    .filter(|m| matches!(m, ServerMessage::CellUnmarked(_)))
                    .count();
                assert_eq!((marked, unmarked), (1, 1));
            }
        }
    }
}

#[test]
fn disconnect_mid_game_keeps_history() {
    let mut room = Room::new();
    let a = ConnectionId::new();
    let b = ConnectionId::new();
    let _rx_a = room.connect(a);
    let mut rx_b = room.connect(b);
    room.join(a, abc_board()).unwrap();
    room.mark_cell(a, mark(0, 0, "a"));
    room.mark_cell(a, mark(0, 1, "b"));
    let before = room.registry().snapshot().mark_history;
    drain(&mut rx_b);

    room.disconnect(a);

    assert!(room.registry().get(a).is_none());
    assert_eq!(drain(&mut rx_b), vec![ServerMessage::PlayerLeft(a)]);
    assert_eq!(room.registry().snapshot().mark_history, before);

    // The next connection still sees the departed player's marks.
    let c = ConnectionId::new();
    let mut rx_c = room.connect(c);
    let Some(ServerMessage::InitialState(initial)) = drain(&mut rx_c).into_iter().next() else {
        unreachable!("first message to a new connection is initialState");
    };
    assert!(initial.players.is_empty());
    assert_eq!(initial.mark_history.len(), 2);
}

#[test]
fn reconnect_gets_a_fresh_player() {
    let mut room = Room::new();
    let old = ConnectionId::new();
    let _rx_old = room.connect(old);
    room.join(old, abc_board()).unwrap();
    room.mark_cell(old, mark(0, 0, "a"));

    let new = ConnectionId::new();
    let _rx_new = room.connect(new);
    let fresh = room.join(new, abc_board()).unwrap();
    assert_eq!(fresh.marked_count(), 0);

    // The abandoned record lingers until its disconnect is processed.
    assert_eq!(room.registry().len(), 2);
    room.disconnect(old);
    assert_eq!(room.registry().len(), 1);
}

#[test]
fn bounded_history_trims_snapshot() {
    let mut room = Room::with_registry(RoomRegistry::with_history_limit(2));
    let a = ConnectionId::new();
    let mut rx = room.connect(a);
    room.join(a, abc_board()).unwrap();
    for (col, text) in ["a", "b", "c"].into_iter().enumerate() {
        room.mark_cell(a, mark(0, col, text));
    }

    // All three marks were broadcast even though one was evicted.
    let marked = drain(&mut rx)
        .into_iter()
        .filter(|m| matches!(m, ServerMessage::CellMarked(_)))
        .count();
    assert_eq!(marked, 3);

    let texts: Vec<String> = room
        .registry()
        .snapshot()
        .mark_history
        .into_iter()
        .map(|e| e.cell_text)
        .collect();
    assert_eq!(texts, vec!["b".to_owned(), "c".to_owned()]);
}
