use super::*;
use crate::application::session_mocks::MockProcessProvider;
use tempfile::TempDir;

#[test]
fn live_provider_round_trips_files() {
    let temp = TempDir::new().unwrap();
    let fs = LiveFileSystemProvider;
    let file = temp.path().join("note.txt");

    fs.write_text_file(&file, "hello").unwrap();
    assert!(fs.file_exists(&file));
    assert!(!fs.is_directory(&file));
    assert!(fs.is_directory(temp.path()));
    assert_eq!(fs.read_text_file(&file).unwrap(), "hello");
}

#[test]
fn live_write_creates_missing_parent_directories() {
    let temp = TempDir::new().unwrap();
    let fs = LiveFileSystemProvider;
    let file = temp.path().join("ios-app/tree/Deep/Nested/note.txt");

    fs.write_text_file(&file, "hello").unwrap();
    assert_eq!(fs.read_text_file(&file).unwrap(), "hello");
    assert!(fs.is_directory(&temp.path().join("ios-app/tree/Deep")));
}

#[test]
fn live_create_file_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();
    let fs = LiveFileSystemProvider;
    let file = temp.path().join("fresh.swift");

    fs.create_file(&file).unwrap();
    assert_eq!(fs.read_text_file(&file).unwrap(), "");
    assert!(fs.create_file(&file).is_err());
}

#[test]
fn live_copy_tree_copies_nested_content() {
    let temp = TempDir::new().unwrap();
    let fs = LiveFileSystemProvider;
    let source = temp.path().join("tree");
    fs.create_directory(&source.join("Sub")).unwrap();
    fs.write_text_file(&source.join("Sub/deep.txt"), "deep").unwrap();
    fs.write_text_file(&source.join("top.txt"), "top").unwrap();

    let dest = temp.path().join("copy");
    fs.copy_tree(&source, &dest).unwrap();
    assert_eq!(fs.read_text_file(&dest.join("Sub/deep.txt")).unwrap(), "deep");
    assert_eq!(fs.read_text_file(&dest.join("top.txt")).unwrap(), "top");
    assert!(fs.file_exists(&source.join("top.txt")));
}

#[test]
fn live_move_and_remove_handle_directories() {
    let temp = TempDir::new().unwrap();
    let fs = LiveFileSystemProvider;
    let old = temp.path().join("Old");
    fs.create_directory(&old).unwrap();
    fs.write_text_file(&old.join("a.txt"), "a").unwrap();

    let new = temp.path().join("New");
    fs.move_item(&old, &new).unwrap();
    assert!(!fs.file_exists(&old));
    assert_eq!(fs.read_text_file(&new.join("a.txt")).unwrap(), "a");

    fs.remove_item(&new).unwrap();
    assert!(!fs.file_exists(&new));
    fs.remove_item(&new).unwrap();
}

#[test]
fn live_list_dir_is_sorted_and_walk_recurses() {
    let temp = TempDir::new().unwrap();
    let fs = LiveFileSystemProvider;
    fs.write_text_file(&temp.path().join("b.txt"), "").unwrap();
    fs.write_text_file(&temp.path().join("a.txt"), "").unwrap();
    fs.create_directory(&temp.path().join("Sub")).unwrap();
    fs.write_text_file(&temp.path().join("Sub/c.txt"), "").unwrap();

    let listed = fs.list_dir(temp.path()).unwrap();
    assert_eq!(
        listed,
        vec![
            temp.path().join("Sub"),
            temp.path().join("a.txt"),
            temp.path().join("b.txt"),
        ]
    );

    let walked = fs.walk_files(temp.path()).unwrap();
    assert_eq!(
        walked,
        vec![
            temp.path().join("Sub/c.txt"),
            temp.path().join("a.txt"),
            temp.path().join("b.txt"),
        ]
    );
}

#[test]
fn live_replace_occurrences_rewrites_the_file() {
    let temp = TempDir::new().unwrap();
    let fs = LiveFileSystemProvider;
    let file = temp.path().join("app.swift");
    fs.write_text_file(&file, "struct Template { let x = \"Template\" }")
        .unwrap();

    fs.replace_occurrences(&file, "Template", "Demo").unwrap();
    assert_eq!(
        fs.read_text_file(&file).unwrap(),
        "struct Demo { let x = \"Demo\" }"
    );
}

#[test]
fn live_process_captures_output() {
    let process = LiveProcessProvider;
    let output = process.execute("echo", &["hello"]).unwrap();
    assert!(output.success);
    assert_eq!(output.stdout.trim(), "hello");
}

fn defaults_command_line() -> String {
    let plist = BaseDirs::new()
        .unwrap()
        .home_dir()
        .join("Library/Preferences/com.apple.dt.Xcode.plist");
    format!("defaults read {} {}", plist.to_string_lossy(), TEAM_ID_KEY)
}

#[test]
fn team_id_comes_from_the_defaults_domain() {
    let process = MockProcessProvider::new().with_stdout(&defaults_command_line(), "AB12CD34EF\n");
    assert_eq!(
        fetch_last_selected_team_id(&process),
        Some("AB12CD34EF".to_string())
    );
}

#[test]
fn team_id_is_absent_when_defaults_has_no_entry() {
    let process = MockProcessProvider::new();
    assert_eq!(fetch_last_selected_team_id(&process), None);
}
