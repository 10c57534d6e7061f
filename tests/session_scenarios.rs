//! Session-level scenarios driven through a scripted line source.
//!
//! Output is captured in memory; file round trips use a temporary directory.

use em::editor::{Session, SessionOutcome};
use em::input::{ReaderLineSource, ScriptedLineSource};
use tempfile::TempDir;

type TestSession = Session<ScriptedLineSource, Vec<u8>>;

fn session(input: &[&str]) -> TestSession {
    Session::new(ScriptedLineSource::new(input.to_vec()), Vec::new())
}

/// Build a session whose buffer holds `lines`, loaded through `a` so the
/// buffer goes through the same path a user would take.
fn session_with_lines(lines: &[&str]) -> TestSession {
    let mut script = lines.to_vec();
    script.push(".");
    let mut session = session(&script);
    session.execute_line("a").unwrap();
    session
}

fn output(session: &TestSession) -> String {
    String::from_utf8(session.output().clone()).unwrap()
}

fn contents(session: &TestSession) -> Vec<String> {
    session.buffer().write_all().to_vec()
}

#[test]
fn print_range_scenario() {
    let mut s = session_with_lines(&["one", "two", "three"]);
    s.execute_line("2,3p").unwrap();

    assert_eq!(output(&s), "two\nthree\n");
    assert_eq!(s.buffer().current_line(), 3);
}

#[test]
fn delete_scenario() {
    let mut s = session_with_lines(&["one", "two", "three"]);
    s.execute_line("2d").unwrap();

    assert_eq!(contents(&s), vec!["one", "three"]);
    assert_eq!(s.buffer().len(), 2);
    assert!(s.buffer().is_modified());
}

#[test]
fn insert_scenario() {
    let mut s = session(&["one", "two", "three", ".", "zero", "."]);
    s.execute_line("a").unwrap();
    s.execute_line("1i").unwrap();

    assert_eq!(contents(&s), vec!["zero", "one", "two", "three"]);
    assert_eq!(s.buffer().current_line(), 1);
}

#[test]
fn inserted_block_reads_back_verbatim() {
    let mut s = session(&["a", "b", "c", ".", "x", "y", "."]);
    s.execute_line("a").unwrap();
    s.execute_line("2a").unwrap();
    s.execute_line("3,4p").unwrap();

    assert_eq!(output(&s), "x\ny\n");
    assert_eq!(contents(&s), vec!["a", "b", "x", "y", "c"]);
}

#[test]
fn whole_buffer_delete() {
    let mut s = session_with_lines(&["a", "b", "c"]);
    s.execute_line(",d").unwrap();

    assert!(s.buffer().is_empty());
    assert_eq!(s.buffer().current_line(), 0);

    s.execute_line("p").unwrap();
    assert_eq!(output(&s), "?\n");
    assert_eq!(s.last_error(), Some("Invalid address"));
}

#[test]
fn addresses_resolve_before_the_command_runs() {
    let mut s = session_with_lines(&["a", "b", "c"]);
    s.execute_line("2p").unwrap();
    s.execute_line("+d").unwrap();
    assert_eq!(contents(&s), vec!["a", "b"]);

    s.execute_line("-n").unwrap();
    assert_eq!(output(&s), "b\n1\ta\n");
}

#[test]
fn reversed_range_is_reported() {
    let mut s = session_with_lines(&["a", "b", "c"]);
    s.execute_line("3,1p").unwrap();
    s.execute_line("2,9d").unwrap();

    assert_eq!(output(&s), "?\n?\n");
    assert_eq!(contents(&s), vec!["a", "b", "c"]);
}

#[test]
fn unknown_command_vs_bad_address() {
    let mut s = session_with_lines(&["a"]);
    s.execute_line("1x").unwrap();
    s.execute_line("h").unwrap();
    s.execute_line("5x").unwrap();
    s.execute_line("h").unwrap();

    assert_eq!(output(&s), "?\nUnknown command\n?\nInvalid address\n");
}

#[test]
fn write_without_filename_keeps_state() {
    let mut s = session_with_lines(&["a"]);
    s.execute_line("w").unwrap();

    assert_eq!(output(&s), "?\n");
    assert_eq!(s.last_error(), Some("No current filename"));
    assert!(s.buffer().is_modified());
    assert_eq!(contents(&s), vec!["a"]);
}

#[test]
fn modified_quit_needs_second_request() {
    let mut s = session(&["a", ".", "q", "q", "p"]);
    assert_eq!(s.run().unwrap(), SessionOutcome::Quit);
    assert_eq!(output(&s), "?\n");
    assert_eq!(s.last_error(), Some("Warning: buffer modified"));
}

#[test]
fn edit_between_quits_rearms_warning() {
    let mut s = session(&["a", ".", "q", "$p", "q", "Q"]);
    assert_eq!(s.run().unwrap(), SessionOutcome::Quit);
    assert_eq!(output(&s), "?\na\n?\n");
}

#[test]
fn end_of_input_ends_session_normally() {
    let mut s = session(&["a", "unterminated"]);
    assert_eq!(s.run().unwrap(), SessionOutcome::EndOfInput);
    assert_eq!(contents(&s), vec!["unterminated"]);
}

#[test]
fn load_save_round_trip() {
    let dir = TempDir::new().unwrap();
    let original = dir.path().join("original.txt");
    let copy = dir.path().join("copy.txt");
    std::fs::write(&original, "first line\nsecond line\n\nlast\n").unwrap();

    let mut s = session(&[]);
    s.execute_line(&format!("e {}", original.display())).unwrap();
    s.execute_line(&format!("w {}", copy.display())).unwrap();
    let first_pass = contents(&s);

    s.execute_line(&format!("e {}", copy.display())).unwrap();

    assert_eq!(output(&s), "29\n29\n29\n");
    assert_eq!(contents(&s), first_pass);
    assert_eq!(s.buffer().current_line(), 4);
    assert_eq!(s.filename(), Some(copy.as_path()));
    assert_eq!(
        std::fs::read(&original).unwrap(),
        std::fs::read(&copy).unwrap()
    );
}

#[test]
fn write_remembers_filename_and_clears_modified() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("notes.txt");

    let mut s = session_with_lines(&["alpha", "beta"]);
    s.execute_line(&format!("w {}", target.display())).unwrap();
    assert!(!s.buffer().is_modified());

    s.execute_line("1d").unwrap();
    s.execute_line("w").unwrap();

    assert_eq!(output(&s), "11\n5\n");
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "beta\n");
    assert_eq!(s.execute_line("q").unwrap(), em::editor::CommandFlow::Exit);
}

#[test]
fn edit_missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");

    let mut s = session_with_lines(&["keep"]);
    s.execute_line(&format!("e {}", missing.display())).unwrap();
    s.execute_line("h").unwrap();

    assert_eq!(output(&s), "?\nCannot open input file\n");
    assert_eq!(contents(&s), vec!["keep"]);
}

#[test]
fn open_initial_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("start.txt");
    std::fs::write(&path, "x\ny\n").unwrap();

    let mut s = session(&["n"]);
    s.open_initial(path.clone()).unwrap();
    s.run().unwrap();

    assert_eq!(output(&s), "4\n2\ty\n");
    assert_eq!(s.filename(), Some(path.as_path()));
}

#[test]
fn non_utf8_input_line_does_not_end_the_session() {
    let input = std::io::Cursor::new(b"a\nx\n\xff\ny\n.\n,p\n".to_vec());
    let source = ReaderLineSource::new(input, std::io::sink());
    let mut s = Session::new(source, Vec::new());

    assert_eq!(s.run().unwrap(), SessionOutcome::EndOfInput);
    assert_eq!(s.buffer().len(), 3);
    assert_eq!(s.output().as_slice(), b"x\n\xff\ny\n");
}

#[test]
fn non_utf8_file_round_trips_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    let original = dir.path().join("latin1.txt");
    let copy = dir.path().join("copy.txt");
    std::fs::write(&original, b"caf\xe9\n").unwrap();

    let mut s = session(&[]);
    s.execute_line(&format!("e {}", original.display())).unwrap();
    s.execute_line("p").unwrap();
    s.execute_line(&format!("w {}", copy.display())).unwrap();

    assert_eq!(s.output().as_slice(), b"5\ncaf\xe9\n5\n");
    assert_eq!(std::fs::read(&copy).unwrap(), b"caf\xe9\n");
}

#[test]
fn edit_without_path_reloads_remembered_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "one\ntwo\n").unwrap();

    let mut s = session(&[]);
    s.execute_line(&format!("e {}", path.display())).unwrap();
    std::fs::write(&path, "changed\n").unwrap();
    s.execute_line("e").unwrap();

    assert_eq!(output(&s), "8\n8\n");
    assert_eq!(contents(&s), vec!["changed"]);
    assert_eq!(s.filename(), Some(path.as_path()));
}

#[test]
fn edit_without_any_filename_is_reported() {
    let mut s = session_with_lines(&["keep"]);
    s.execute_line("e").unwrap();
    s.execute_line("h").unwrap();

    assert_eq!(output(&s), "?\nNo current filename\n");
    assert_eq!(contents(&s), vec!["keep"]);
    assert!(s.buffer().is_modified());
}

#[test]
fn edit_discards_modified_buffer_without_warning() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh.txt");
    std::fs::write(&path, "fresh\n").unwrap();

    let mut s = session_with_lines(&["unsaved"]);
    assert!(s.buffer().is_modified());
    s.execute_line(&format!("e {}", path.display())).unwrap();

    assert_eq!(output(&s), "6\n");
    assert_eq!(s.last_error(), None);
    assert_eq!(contents(&s), vec!["fresh"]);
    assert!(!s.buffer().is_modified());
    assert_eq!(s.execute_line("q").unwrap(), em::editor::CommandFlow::Exit);
}
