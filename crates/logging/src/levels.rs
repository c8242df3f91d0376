//! crates/logging/src/levels.rs
//! Flag enums and level structures for info and debug verbosity.

/// Info flags for user-facing diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfoFlag {
    /// Directives that never matched a walked entry.
    Leftover,
    /// Names of entries admitted into the commit.
    Name,
    /// Entries excluded by the skip list.
    Skip,
    /// End-of-walk statistics.
    Stats,
}

impl InfoFlag {
    /// Every info flag, in token order.
    pub const ALL: [Self; 4] = [Self::Leftover, Self::Name, Self::Skip, Self::Stats];

    /// Returns the token used for this flag on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Leftover => "leftover",
            Self::Name => "name",
            Self::Skip => "skip",
            Self::Stats => "stats",
        }
    }
}

/// Debug flags for diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugFlag {
    /// Commit filter decisions and table loading.
    Filter,
    /// Ownership rewrites.
    Own,
    /// Permission bit additions.
    Perms,
    /// Directory traversal.
    Walk,
}

impl DebugFlag {
    /// Every debug flag, in token order.
    pub const ALL: [Self; 4] = [Self::Filter, Self::Own, Self::Perms, Self::Walk];

    /// Returns the token used for this flag on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Own => "own",
            Self::Perms => "perms",
            Self::Walk => "walk",
        }
    }
}

/// Info verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfoLevels {
    /// Leftover directive reporting level.
    pub leftover: u8,
    /// Admitted entry names level.
    pub name: u8,
    /// Skipped entries level.
    pub skip: u8,
    /// Statistics level.
    pub stats: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Leftover => self.leftover,
            InfoFlag::Name => self.name,
            InfoFlag::Skip => self.skip,
            InfoFlag::Stats => self.stats,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Leftover => self.leftover = level,
            InfoFlag::Name => self.name = level,
            InfoFlag::Skip => self.skip = level,
            InfoFlag::Stats => self.stats = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in InfoFlag::ALL {
            self.set(flag, level);
        }
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLevels {
    /// Filter decision level.
    pub filter: u8,
    /// Ownership rewrite level.
    pub own: u8,
    /// Permission addition level.
    pub perms: u8,
    /// Traversal level.
    pub walk: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Filter => self.filter,
            DebugFlag::Own => self.own,
            DebugFlag::Perms => self.perms,
            DebugFlag::Walk => self.walk,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Filter => self.filter = level,
            DebugFlag::Own => self.own = level,
            DebugFlag::Perms => self.perms = level,
            DebugFlag::Walk => self.walk = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        for flag in DebugFlag::ALL {
            self.set(flag, level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_levels_get_returns_what_set_stored() {
        let mut levels = InfoLevels::default();
        for (index, flag) in InfoFlag::ALL.into_iter().enumerate() {
            levels.set(flag, index as u8 + 1);
        }
        assert_eq!(levels.get(InfoFlag::Leftover), 1);
        assert_eq!(levels.get(InfoFlag::Name), 2);
        assert_eq!(levels.get(InfoFlag::Skip), 3);
        assert_eq!(levels.get(InfoFlag::Stats), 4);
    }

    #[test]
    fn debug_levels_set_all_touches_every_flag() {
        let mut levels = DebugLevels::default();
        levels.set_all(3);
        for flag in DebugFlag::ALL {
            assert_eq!(levels.get(flag), 3, "{}", flag.name());
        }
    }

    #[test]
    fn flag_names_are_unique() {
        let mut names: Vec<_> = InfoFlag::ALL.iter().map(|f| f.name()).collect();
        names.extend(DebugFlag::ALL.iter().map(|f| f.name()));
        let count = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), count);
    }
}
