//! XP and level calculator.
//!
//! Levels 1-9 each span 1000 XP starting at 0. From level 10 (anchored at
//! 9000 XP) every further level also spans 1000 XP.

use serde::{Deserialize, Serialize};

/// XP covered by a single level.
pub const XP_PER_LEVEL: u64 = 1000;

/// XP at which level 10 starts.
pub const LEVEL_TEN_XP: u64 = 9000;

/// Level derived from cumulative XP. Always at least 1.
pub const fn level_for_xp(xp: u64) -> u64 {
    if xp < LEVEL_TEN_XP {
        xp / XP_PER_LEVEL + 1
    } else {
        (xp - LEVEL_TEN_XP) / XP_PER_LEVEL + 10
    }
}

/// XP at which the given level starts.
const fn level_start_xp(level: u64) -> u64 {
    if level < 10 {
        (level - 1) * XP_PER_LEVEL
    } else {
        LEVEL_TEN_XP + (level - 10) * XP_PER_LEVEL
    }
}

/// Fraction of the current level already earned, in `[0, 1)`.
pub fn level_progress(xp: u64) -> f64 {
    let level = level_for_xp(xp);
    (xp - level_start_xp(level)) as f64 / XP_PER_LEVEL as f64
}

/// Cumulative XP needed to reach the next level, saturating at `u64::MAX`
/// for the last representable level.
pub const fn xp_for_next_level(xp: u64) -> u64 {
    level_start_xp(level_for_xp(xp)).saturating_add(XP_PER_LEVEL)
}

/// Snapshot of everything a presentation layer shows about a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub xp: u64,
    pub level: u64,
    pub progress: f64,
    pub next_level_xp: u64,
}

impl LevelInfo {
    pub fn from_xp(xp: u64) -> Self {
        Self {
            xp,
            level: level_for_xp(xp),
            progress: level_progress(xp),
            next_level_xp: xp_for_next_level(xp),
        }
    }

    /// XP still missing before the next level.
    pub const fn xp_remaining(&self) -> u64 {
        self.next_level_xp.saturating_sub(self.xp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(999), 1);
        assert_eq!(level_for_xp(1000), 2);
        assert_eq!(level_for_xp(8999), 9);
        assert_eq!(level_for_xp(9000), 10);
        assert_eq!(level_for_xp(9999), 10);
        assert_eq!(level_for_xp(10000), 11);
    }

    #[test]
    fn test_progress_within_level() {
        assert!((level_progress(0) - 0.0).abs() < f64::EPSILON);
        assert!((level_progress(500) - 0.5).abs() < f64::EPSILON);
        assert!((level_progress(1030) - 0.03).abs() < 1e-9);
        assert!((level_progress(9250) - 0.25).abs() < 1e-9);
        assert!(level_progress(999) < 1.0);
    }

    #[test]
    fn test_next_level_xp() {
        assert_eq!(xp_for_next_level(0), 1000);
        assert_eq!(xp_for_next_level(1030), 2000);
        assert_eq!(xp_for_next_level(8999), 9000);
        assert_eq!(xp_for_next_level(9000), 10000);
        assert_eq!(xp_for_next_level(12345), 13000);
    }

    #[test]
    fn test_level_info() {
        let info = LevelInfo::from_xp(1030);
        assert_eq!(info.level, 2);
        assert_eq!(info.next_level_xp, 2000);
        assert_eq!(info.xp_remaining(), 970);
    }

    #[test]
    fn test_level_beyond_u32_range() {
        let xp = 5_000_000_000_000;
        assert_eq!(level_for_xp(xp), 4_999_999_991 + 10);
        assert!(level_for_xp(xp) > u64::from(u32::MAX));
        assert_eq!(xp_for_next_level(xp), xp + 1000);
        assert!((0.0..1.0).contains(&level_progress(xp)));
    }

    #[test]
    fn test_level_at_u64_max() {
        assert!(level_for_xp(u64::MAX) >= level_for_xp(u64::MAX - 1000));
        assert_eq!(xp_for_next_level(u64::MAX), u64::MAX);
        assert!((0.0..1.0).contains(&level_progress(u64::MAX)));
    }
}
