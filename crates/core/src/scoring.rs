//! Scoring module - line clear points, drop points and level progression
//!
//! - Line clears award `lines * POINTS_PER_LINE * level`, using the level in effect
//!   *before* the clear is counted.
//! - Soft drop awards a flat point per step; hard drop awards two points per row.
//! - Level starts at 1 and advances every `LINES_PER_LEVEL` lines.
//! - Gravity interval shrinks by `LEVEL_SPEED_DECREASE_MS` per level down to a floor.

use crate::types::{
    HARD_DROP_POINTS_PER_ROW, INITIAL_DROP_SPEED_MS, LEVEL_SPEED_DECREASE_MS, LINES_PER_LEVEL,
    MIN_DROP_SPEED_MS, POINTS_PER_LINE, SOFT_DROP_POINTS,
};

/// Calculate line clear score
/// lines: number of lines cleared in one lock
/// level: level before the clear (1-based)
pub fn calculate_line_score(lines: u32, level: u32) -> u32 {
    lines.saturating_mul(POINTS_PER_LINE).saturating_mul(level)
}

/// Calculate drop score
/// soft_drop: +1 per step
/// hard_drop: +2 per row
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        cells.saturating_mul(HARD_DROP_POINTS_PER_ROW)
    } else {
        cells.saturating_mul(SOFT_DROP_POINTS)
    }
}

/// Level management
/// Level starts at 1 and increases every 10 lines cleared
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Get drop interval for a level (in milliseconds), clamped at the floor
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let decrease = level
        .saturating_sub(1)
        .saturating_mul(LEVEL_SPEED_DECREASE_MS);
    INITIAL_DROP_SPEED_MS
        .saturating_sub(decrease)
        .max(MIN_DROP_SPEED_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(calculate_line_score(0, 1), 0);
        assert_eq!(calculate_line_score(1, 1), 100);
        assert_eq!(calculate_line_score(2, 1), 200);
        assert_eq!(calculate_line_score(4, 1), 400);

        // Level multiplies
        assert_eq!(calculate_line_score(1, 3), 300);
        assert_eq!(calculate_line_score(4, 5), 2000);
    }

    #[test]
    fn test_drop_scores() {
        assert_eq!(calculate_drop_score(10, false), 10); // Soft drop 10 steps
        assert_eq!(calculate_drop_score(10, true), 20); // Hard drop 10 rows
        assert_eq!(calculate_drop_score(0, true), 0);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(9), 1);
        assert_eq!(calculate_level(10), 2);
        assert_eq!(calculate_level(29), 3);
        assert_eq!(calculate_level(100), 11);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(get_drop_interval_ms(1), 1000);
        assert_eq!(get_drop_interval_ms(2), 900);
        assert_eq!(get_drop_interval_ms(5), 600);
        assert_eq!(get_drop_interval_ms(10), 100);
        assert_eq!(get_drop_interval_ms(11), 100); // Floor
        assert_eq!(get_drop_interval_ms(u32::MAX), 100);
    }

    #[test]
    fn test_level_zero_behaves_like_level_one() {
        assert_eq!(get_drop_interval_ms(0), 1000);
    }
}
