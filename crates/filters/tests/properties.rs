//! Property tests for the commit filter.

use filters::{FilterContext, ModeOverrides, SkipList, Verdict};
use metadata::{EntryKind, EntryMetadata, MetadataRecord, OwnerOverride};
use proptest::prelude::*;

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c]{1,3}", 1..4).prop_map(|parts| format!("/{}", parts.join("/")))
}

proptest! {
    #[test]
    fn mode_is_always_or_of_existing_and_override(mode in any::<u32>(), bits in any::<u32>()) {
        let overrides: ModeOverrides = [("/p", bits)].into_iter().collect();
        let mut context = FilterContext::new(overrides, SkipList::new(), OwnerOverride::none());
        let mut entry = EntryMetadata::new(EntryKind::File, 0, 0, mode);

        prop_assert_eq!(context.decide("/p", &mut entry), Verdict::Allow);
        prop_assert_eq!(entry.mode(), mode | bits);
        prop_assert_eq!(entry.mode() & mode, mode);
    }

    #[test]
    fn directive_never_affects_other_paths(
        target in path_strategy(),
        other in path_strategy(),
        bits in 1u32..0o7777,
    ) {
        prop_assume!(target != other);
        let overrides: ModeOverrides = [(target.as_str(), bits)].into_iter().collect();
        let skips: SkipList = [target.as_str()].into_iter().collect();
        let mut context = FilterContext::new(overrides, skips, OwnerOverride::none());
        let mut entry = EntryMetadata::new(EntryKind::File, 3, 4, 0o644);

        prop_assert_eq!(context.decide(&other, &mut entry), Verdict::Allow);
        prop_assert_eq!(entry.mode(), 0o644);
        prop_assert_eq!((entry.uid(), entry.gid()), (3, 4));
        prop_assert!(context.overrides().contains(&target));
        prop_assert!(context.skips().contains(&target));
    }

    #[test]
    fn uid_only_override_never_touches_gid(
        uid in 0i64..=i64::from(u32::MAX - 1),
        gid in any::<u32>(),
        in_skip in any::<bool>(),
    ) {
        let owner = OwnerOverride::from_raw(uid, -1).expect("in range");
        let skips: SkipList = if in_skip { ["/e"].into_iter().collect() } else { SkipList::new() };
        let overrides: ModeOverrides = [("/e", 0o1)].into_iter().collect();
        let mut context = FilterContext::new(overrides, skips, owner);
        let mut entry = EntryMetadata::new(EntryKind::File, 0, gid, 0);

        let verdict = context.decide("/e", &mut entry);
        prop_assert_eq!(verdict.is_allowed(), !in_skip);
        prop_assert_eq!(i64::from(entry.uid()), uid);
        prop_assert_eq!(entry.gid(), gid);
    }

    #[test]
    fn every_directive_is_consumed_or_left_over(
        paths in prop::collection::btree_set(path_strategy(), 0..12),
        visited in prop::collection::vec(path_strategy(), 0..24),
    ) {
        let overrides: ModeOverrides = paths.iter().map(|p| (p.as_str(), 0o1)).collect();
        let mut context = FilterContext::new(overrides, SkipList::new(), OwnerOverride::none());

        let mut applied = 0usize;
        for path in &visited {
            let mut entry = EntryMetadata::new(EntryKind::File, 0, 0, 0);
            context.decide(path, &mut entry);
            if entry.mode() == 0o1 {
                applied += 1;
            }
        }

        let leftovers = context.finish();
        prop_assert_eq!(applied + leftovers.mode_overrides.len(), paths.len());
    }
}
