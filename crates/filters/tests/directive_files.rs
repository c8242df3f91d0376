//! Loading statoverride and skip-list files from disk.

use std::fs;
use std::io::ErrorKind;

use filters::{DirectiveError, LoadError, ModeOverrides, ModeSyntax, SkipList};
use tempfile::tempdir;

#[test]
fn statoverride_file_loads_every_line() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("statoverride");
    fs::write(&path, "2 /usr/bin/setuid-helper\n2048 /usr/bin/su\n1024 /tmp\n").expect("write");

    let table = ModeOverrides::load(&path, ModeSyntax::Integer).expect("load");
    assert_eq!(table.len(), 3);
    assert_eq!(table.get("/usr/bin/setuid-helper"), Some(0o2));
    assert_eq!(table.get("/usr/bin/su"), Some(0o4000));
    assert_eq!(table.get("/tmp"), Some(0o2000));
}

#[test]
fn malformed_line_aborts_whole_load() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("statoverride");
    fs::write(&path, "2 /ok/before\nbad-line-no-space\n4 /ok/after\n").expect("write");

    let error = ModeOverrides::load(&path, ModeSyntax::Integer).expect_err("must fail");
    match &error {
        LoadError::Directive {
            path: reported,
            line_number,
            source,
        } => {
            assert_eq!(reported.as_deref(), Some(path.as_path()));
            assert_eq!(*line_number, 2);
            assert_eq!(
                source,
                &DirectiveError::MalformedDirective {
                    line: b"bad-line-no-space".to_vec()
                }
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let message = error.to_string();
    assert!(message.contains(":2: malformed statoverride directive 'bad-line-no-space'"));
}

#[test]
fn failed_extend_leaves_table_untouched() {
    let mut table: ModeOverrides = [("/keep", 0o1)].into_iter().collect();
    let error = table
        .extend_from_reader(&b"2 /new\nnope\n"[..], ModeSyntax::Integer)
        .expect_err("must fail");

    assert!(error.path().is_none());
    assert!(error.to_string().starts_with("<input>:2:"));
    assert_eq!(table.len(), 1);
    assert!(!table.contains("/new"));
}

#[test]
fn successful_extend_merges_with_last_write_wins() {
    let mut table: ModeOverrides = [("/a", 0o1), ("/b", 0o2)].into_iter().collect();
    let read = table
        .extend_from_reader(&b"4 /b\n8 /c\n"[..], ModeSyntax::Integer)
        .expect("extend");

    assert_eq!(read, 2);
    assert_eq!(
        table.into_sorted_vec(),
        vec![
            (b"/a".to_vec(), 0o1),
            (b"/b".to_vec(), 0o4),
            (b"/c".to_vec(), 0o10)
        ]
    );
}

#[test]
fn crlf_files_are_accepted() {
    let overrides =
        ModeOverrides::read_from(&b"2 /a\r\n4 /b\r\n"[..], ModeSyntax::Integer).expect("load");
    assert_eq!(overrides.get("/a"), Some(2));
    assert_eq!(overrides.get("/b"), Some(4));

    let skips = SkipList::read_from(&b"/x\r\n/y\r\n"[..]).expect("load");
    assert!(skips.contains("/x"));
    assert!(skips.contains("/y"));
    assert!(!skips.contains("/x\r"));
}

#[test]
fn lenient_syntax_accepts_float_prefixes() {
    let table = ModeOverrides::read_from(&b"2.0 /a\n1e1 /b\n-0.5 /c\n"[..], ModeSyntax::Lenient)
        .expect("load");
    assert_eq!(table.get("/a"), Some(2));
    assert_eq!(table.get("/b"), Some(10));
    assert_eq!(table.get("/c"), Some(0));

    let strict = ModeOverrides::read_from(&b"2.0 /a\n"[..], ModeSyntax::Integer)
        .expect_err("integer syntax rejects floats");
    assert!(matches!(
        strict.directive(),
        Some(DirectiveError::InvalidModeBits { .. })
    ));
}

#[test]
fn empty_statoverride_line_is_malformed() {
    let error = ModeOverrides::read_from(&b"2 /a\n\n"[..], ModeSyntax::Integer)
        .expect_err("empty line has no separator");
    assert_eq!(
        error.directive(),
        Some(&DirectiveError::MalformedDirective { line: Vec::new() })
    );
}

#[test]
fn skip_list_keeps_lines_verbatim() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("skiplist");
    fs::write(&path, "/var/cache\n/with space \n\n/var/cache\n").expect("write");

    let skips = SkipList::load(&path).expect("load");
    assert_eq!(
        skips.into_sorted_vec(),
        vec![b"".to_vec(), b"/var/cache".to_vec(), b"/with space ".to_vec()]
    );
}

#[test]
fn missing_file_reports_io_error_with_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent");

    let error = SkipList::load(&path).expect_err("missing file");
    match &error {
        LoadError::Io { path: reported, source } => {
            assert_eq!(reported.as_deref(), Some(path.as_path()));
            assert_eq!(source.kind(), ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let error = ModeOverrides::load(&path, ModeSyntax::Integer).expect_err("missing file");
    assert!(error.to_string().starts_with("failed to read "));
}

#[test]
fn non_utf8_paths_survive_loading() {
    let skips = SkipList::read_from(&b"/caf\xe9\n"[..]).expect("load");
    assert!(skips.contains(&b"/caf\xe9"[..]));

    let overrides =
        ModeOverrides::read_from(&b"2 /caf\xe9\n"[..], ModeSyntax::Integer).expect("load");
    assert_eq!(overrides.get(&b"/caf\xe9"[..]), Some(2));
}
