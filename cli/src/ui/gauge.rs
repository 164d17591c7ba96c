//! Fixed-width text progress bars.

/// Characters used for the filled and empty parts of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGlyphs {
    pub fill: char,
    pub empty: char,
}

impl BarGlyphs {
    pub const BLOCK: Self = Self {
        fill: '█',
        empty: '░',
    };

    pub const ASCII: Self = Self {
        fill: '#',
        empty: '-',
    };
}

impl Default for BarGlyphs {
    fn default() -> Self {
        Self::BLOCK
    }
}

/// Renders `percent` as a bar of exactly `width` glyphs.
///
/// The percentage is clamped to `0..=100` and the filled part is rounded
/// down. NaN is treated as empty.
pub fn progress_bar(percent: f64, width: usize, glyphs: BarGlyphs) -> String {
    let percent = if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    };
    let filled = ((width as f64 * percent / 100.0).floor() as usize).min(width);

    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat_n(glyphs.fill, filled));
    bar.extend(std::iter::repeat_n(glyphs.empty, width - filled));
    bar
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const ASCII: BarGlyphs = BarGlyphs::ASCII;

    #[test]
    fn test_three_quarters_in_blocks() {
        assert_eq!(
            progress_bar(75.0, 20, BarGlyphs::BLOCK),
            format!("{}{}", "█".repeat(15), "░".repeat(5))
        );
    }

    #[test]
    fn test_rounds_filled_part_down() {
        assert_eq!(progress_bar(99.9, 10, ASCII), "#########-");
        assert_eq!(progress_bar(9.9, 10, ASCII), "----------");
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(progress_bar(-5.0, 12, ASCII), progress_bar(0.0, 12, ASCII));
        assert_eq!(progress_bar(150.0, 12, ASCII), progress_bar(100.0, 12, ASCII));
        assert_eq!(progress_bar(150.0, 4, ASCII), "####");
    }

    #[test]
    fn test_zero_width_is_empty() {
        assert_eq!(progress_bar(50.0, 0, BarGlyphs::BLOCK), "");
    }

    #[test]
    fn test_nan_is_empty_bar() {
        assert_eq!(progress_bar(f64::NAN, 3, ASCII), "---");
    }

    proptest! {
        #[test]
        fn test_always_exactly_width_glyphs(percent in -1000.0f64..1000.0, width in 0usize..200) {
            prop_assert_eq!(progress_bar(percent, width, BarGlyphs::BLOCK).chars().count(), width);
        }

        #[test]
        fn test_filled_count_matches_floor(percent in 0.0f64..=100.0, width in 1usize..100) {
            let bar = progress_bar(percent, width, ASCII);
            let filled = bar.chars().filter(|c| *c == '#').count();
            prop_assert_eq!(filled, (width as f64 * percent / 100.0).floor() as usize);
        }
    }
}
