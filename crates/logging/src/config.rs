//! crates/logging/src/config.rs
//! Verbosity configuration combining info and debug levels.

use super::levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};

/// Combined verbosity configuration for info and debug flags.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Info flag levels.
    pub info: InfoLevels,
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a new configuration from a `-v` count.
    ///
    /// Leftover directives are always reported. Each additional level widens
    /// the set of flags; counts above 4 behave like 4.
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();
        config.info.leftover = 1;

        if level >= 1 {
            config.info.skip = 1;
            config.info.stats = 1;
        }
        if level >= 2 {
            config.info.name = 1;
            config.info.skip = 2;
            config.debug.filter = 1;
        }
        if level >= 3 {
            config.info.name = 2;
            config.debug.own = 1;
            config.debug.perms = 1;
            config.debug.walk = 1;
        }
        if level >= 4 {
            config.debug.set_all(2);
        }

        config
    }

    /// Apply a single info flag token (e.g., "skip2", "stats", "ALL", "NONE").
    pub fn apply_info_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;
        match name {
            "ALL" | "all" => {
                self.info.set_all(level);
                return Ok(());
            }
            "NONE" | "none" => {
                self.info.set_all(0);
                return Ok(());
            }
            _ => {}
        }

        let flag = InfoFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == name)
            .ok_or_else(|| format!("unknown info flag: {name}"))?;
        self.info.set(flag, level);
        Ok(())
    }

    /// Apply a single debug flag token (e.g., "filter2", "own").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;
        match name {
            "ALL" | "all" => {
                self.debug.set_all(level);
                return Ok(());
            }
            "NONE" | "none" => {
                self.debug.set_all(0);
                return Ok(());
            }
            _ => {}
        }

        let flag = DebugFlag::ALL
            .into_iter()
            .find(|flag| flag.name() == name)
            .ok_or_else(|| format!("unknown debug flag: {name}"))?;
        self.debug.set(flag, level);
        Ok(())
    }

    /// Applies a comma-separated list of info tokens.
    pub fn apply_info_list(&mut self, list: &str) -> Result<(), String> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_info_flag(token))
    }

    /// Applies a comma-separated list of debug tokens.
    pub fn apply_debug_list(&mut self, list: &str) -> Result<(), String> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_debug_flag(token))
    }
}

/// Parse a flag token like "skip2" into ("skip", 2) or "stats" into ("stats", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(0) => Err(format!("flag token has no name: {token}")),
        Some(pos) => {
            let (name, level_str) = token.split_at(pos);
            let level = level_str
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((name, level))
        }
        None => Ok((token, 1)),
    }
}
