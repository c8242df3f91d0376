//! Directive consumption across a simulated pre-order walk.

use filters::{FilterContext, ModeOverrides, ModeSyntax, SkipList, Verdict};
use metadata::{EntryKind, EntryMetadata, MetadataRecord, OwnerOverride};

fn walk(context: &mut FilterContext, entries: &[(&str, EntryKind, u32)]) -> Vec<(String, u32)> {
    let mut committed = Vec::new();
    let mut pruned: Vec<String> = Vec::new();

    for &(path, kind, mode) in entries {
        if pruned
            .iter()
            .any(|prefix| path.starts_with(&format!("{prefix}/")))
        {
            continue;
        }
        let mut entry = EntryMetadata::new(kind, 1000, 1000, mode);
        match context.decide(path, &mut entry) {
            Verdict::Allow => committed.push((path.to_owned(), entry.mode())),
            Verdict::Skip => {
                if kind.is_dir() {
                    pruned.push(path.to_owned());
                }
            }
        }
    }
    committed
}

#[test]
fn skipped_directory_contents_are_never_offered() {
    let overrides = ModeOverrides::read_from(
        &b"2 /var/cache/apt\n2048 /usr/bin/su\n"[..],
        ModeSyntax::Integer,
    )
    .expect("load");
    let skips = SkipList::read_from(&b"/var/cache\n"[..]).expect("load");
    let mut context = FilterContext::new(overrides, skips, OwnerOverride::none());

    let committed = walk(
        &mut context,
        &[
            ("/", EntryKind::Directory, 0o755),
            ("/usr", EntryKind::Directory, 0o755),
            ("/usr/bin", EntryKind::Directory, 0o755),
            ("/usr/bin/su", EntryKind::File, 0o755),
            ("/var", EntryKind::Directory, 0o755),
            ("/var/cache", EntryKind::Directory, 0o755),
            ("/var/cache/apt", EntryKind::Directory, 0o755),
        ],
    );

    assert_eq!(
        committed,
        vec![
            ("/".to_owned(), 0o755),
            ("/usr".to_owned(), 0o755),
            ("/usr/bin".to_owned(), 0o755),
            ("/usr/bin/su".to_owned(), 0o4755),
            ("/var".to_owned(), 0o755),
        ]
    );

    let leftovers = context.finish();
    assert!(leftovers.skips.is_empty());
    assert_eq!(leftovers.mode_overrides, vec![(b"/var/cache/apt".to_vec(), 2)]);
}

#[test]
fn repeated_path_in_one_walk_is_matched_once() {
    let overrides: ModeOverrides = [("/etc/hosts", 0o20)].into_iter().collect();
    let skips: SkipList = ["/etc/motd"].into_iter().collect();
    let mut context = FilterContext::new(overrides, skips, OwnerOverride::none());

    let committed = walk(
        &mut context,
        &[
            ("/etc/hosts", EntryKind::File, 0o600),
            ("/etc/hosts", EntryKind::File, 0o600),
            ("/etc/motd", EntryKind::File, 0o644),
            ("/etc/motd", EntryKind::File, 0o644),
        ],
    );

    assert_eq!(
        committed,
        vec![
            ("/etc/hosts".to_owned(), 0o620),
            ("/etc/hosts".to_owned(), 0o600),
            ("/etc/motd".to_owned(), 0o644),
        ]
    );
}

#[test]
fn independent_contexts_do_not_share_consumption() {
    let overrides: ModeOverrides = [("/a", 0o1)].into_iter().collect();
    let mut first = FilterContext::new(overrides.clone(), SkipList::new(), OwnerOverride::none());
    let mut second = FilterContext::new(overrides, SkipList::new(), OwnerOverride::none());

    let mut entry = EntryMetadata::new(EntryKind::File, 0, 0, 0o600);
    first.decide("/a", &mut entry);
    assert!(first.overrides().is_empty());
    assert_eq!(second.overrides().len(), 1);

    let mut entry = EntryMetadata::new(EntryKind::File, 0, 0, 0o600);
    second.decide("/a", &mut entry);
    assert_eq!(entry.mode(), 0o601);
}

#[test]
fn owner_override_applies_to_every_entry_including_skipped() {
    let owner = OwnerOverride::from_raw(0, 0).expect("valid override");
    let skips: SkipList = ["/home"].into_iter().collect();
    let mut context = FilterContext::new(ModeOverrides::new(), skips, owner);

    for path in ["/", "/home", "/etc"] {
        let mut entry = EntryMetadata::new(EntryKind::Directory, 1000, 100, 0o755);
        context.decide(path, &mut entry);
        assert_eq!((entry.uid(), entry.gid()), (0, 0), "{path}");
    }
    assert_eq!(context.stats().owner_rewrites, 3);
    assert_eq!(context.stats().skipped, 1);
}
