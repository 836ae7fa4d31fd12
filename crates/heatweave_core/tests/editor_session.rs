use heatweave_core::{
    blank_grid, Direction, EditorCommand, EditorError, EditorPhase, EditorSession, GridCoordinate,
};

fn session(weeks: usize) -> EditorSession {
    EditorSession::new(blank_grid(weeks)).unwrap()
}

#[test]
fn starts_at_origin_and_clean() {
    let session = session(10);
    assert_eq!(session.cursor(), GridCoordinate { row: 0, col: 0 });
    assert_eq!(session.phase(), EditorPhase::Editing);
    assert!(!session.is_dirty());
}

#[test]
fn rejects_malformed_starting_grids() {
    assert!(EditorSession::new(vec![vec![0u8; 4]; 3]).is_err());
}

#[test]
fn set_toggle_and_cycle_edit_the_cursor_cell() {
    let mut session = session(5);

    session.apply(EditorCommand::Set(7)).unwrap();
    assert_eq!(session.current_value(), 7);
    assert!(session.is_dirty());

    session.apply(EditorCommand::Toggle).unwrap();
    assert_eq!(session.current_value(), 0);
    session.apply(EditorCommand::Toggle).unwrap();
    assert_eq!(session.current_value(), 5);

    session.apply(EditorCommand::Set(0)).unwrap();
    session.apply(EditorCommand::Cycle).unwrap();
    assert_eq!(session.current_value(), 3);
    session.apply(EditorCommand::Cycle).unwrap();
    assert_eq!(session.current_value(), 6);
    session.apply(EditorCommand::Cycle).unwrap();
    assert_eq!(session.current_value(), 9);
    session.apply(EditorCommand::Cycle).unwrap();
    assert_eq!(session.current_value(), 0);
}

#[test]
fn set_rejects_values_above_nine() {
    let mut session = session(5);
    assert!(matches!(
        session.apply(EditorCommand::Set(10)),
        Err(EditorError::InvalidIntensity(10))
    ));
    assert_eq!(session.current_value(), 0);
}

#[test]
fn clear_requires_explicit_confirmation() {
    let mut session = session(3);
    session.apply(EditorCommand::Set(9)).unwrap();

    session.apply(EditorCommand::ClearRequested).unwrap();
    assert_eq!(session.phase(), EditorPhase::ClearPending);
    session.apply(EditorCommand::ClearCancelled).unwrap();
    assert_eq!(session.phase(), EditorPhase::Editing);
    assert_eq!(session.grid()[0][0], 9, "cancel keeps the grid");

    session.apply(EditorCommand::ClearRequested).unwrap();
    session.apply(EditorCommand::ClearConfirmed).unwrap();
    assert_eq!(session.phase(), EditorPhase::Editing);
    assert!(session.grid().iter().all(|row| row.iter().all(|&v| v == 0)));
}

#[test]
fn pending_clear_is_dropped_by_other_commands() {
    let mut session = session(3);
    session.apply(EditorCommand::Set(4)).unwrap();
    session.apply(EditorCommand::ClearRequested).unwrap();

    session
        .apply(EditorCommand::Move(Direction::Right))
        .unwrap();
    assert_eq!(session.phase(), EditorPhase::Editing);
    assert_eq!(session.grid()[0][0], 4, "implicit cancel keeps the grid");
    assert_eq!(session.cursor(), GridCoordinate { row: 0, col: 1 });
}

#[test]
fn template_stamps_at_the_cursor_column() {
    let mut session = session(12);
    for _ in 0..2 {
        session
            .apply(EditorCommand::Move(Direction::Right))
            .unwrap();
    }
    session
        .apply(EditorCommand::Template(String::from("-")))
        .unwrap();

    // The dash glyph is a single pixel row, columns 2..=6 of grid row 3.
    assert_eq!(session.grid()[3][2..7], [9, 9, 9, 9, 9]);
    assert!(session.is_dirty());
}

#[test]
fn save_is_terminal_and_yields_the_grid() {
    let mut session = session(4);
    session.apply(EditorCommand::Set(8)).unwrap();
    session.apply(EditorCommand::Save).unwrap();
    assert_eq!(session.phase(), EditorPhase::Saved);

    assert!(matches!(
        session.apply(EditorCommand::Set(1)),
        Err(EditorError::SessionClosed)
    ));

    let grid = session.into_grid();
    assert_eq!(grid[0][0], 8);
}

#[test]
fn abandon_is_terminal() {
    let mut session = session(4);
    session.apply(EditorCommand::Set(8)).unwrap();
    session.apply(EditorCommand::Abandon).unwrap();
    assert_eq!(session.phase(), EditorPhase::Abandoned);
    assert!(matches!(
        session.apply(EditorCommand::Move(Direction::Down)),
        Err(EditorError::SessionClosed)
    ));
}
