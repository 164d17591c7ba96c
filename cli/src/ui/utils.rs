use std::time::Duration;

use ratatui::style::{Color, Modifier, Style};

use crate::data::Band;

/// Color role of a piece of dashboard text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Title,
    Heading,
    Text,
    Good,
    Caution,
    Alert,
}

impl From<Band> for Tone {
    fn from(band: Band) -> Self {
        match band {
            Band::Nominal => Tone::Good,
            Band::Warning => Tone::Caution,
            Band::Critical => Tone::Alert,
        }
    }
}

impl Tone {
    pub fn style(self, bold: bool) -> Style {
        let style = match self {
            Tone::Title => Style::default().fg(Color::Cyan),
            Tone::Heading | Tone::Caution => Style::default().fg(Color::Yellow),
            Tone::Text => Style::default(),
            Tone::Good => Style::default().fg(Color::Green),
            Tone::Alert => Style::default().fg(Color::Red),
        };
        if bold {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

/// Formats an estimate as `"{h}h {mm}m"` from whole minutes, or `-` when
/// there is nothing to show.
pub fn format_hours_minutes(duration: Option<Duration>) -> String {
    match duration {
        Some(duration) => {
            let minutes = duration.as_secs() / 60;
            format!("{}h {:02}m", minutes / 60, minutes % 60)
        }
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_and_padded_minutes() {
        assert_eq!(
            format_hours_minutes(Some(Duration::from_secs(5760))),
            "1h 36m"
        );
        assert_eq!(format_hours_minutes(Some(Duration::from_secs(300))), "0h 05m");
        assert_eq!(
            format_hours_minutes(Some(Duration::from_secs(26 * 3600))),
            "26h 00m"
        );
    }

    #[test]
    fn test_partial_minutes_truncate() {
        assert_eq!(format_hours_minutes(Some(Duration::from_secs(119))), "0h 01m");
        assert_eq!(format_hours_minutes(Some(Duration::ZERO)), "0h 00m");
    }

    #[test]
    fn test_undefined_estimate_is_dash() {
        assert_eq!(format_hours_minutes(None), "-");
    }

    #[test]
    fn test_bands_map_to_traffic_light() {
        assert_eq!(Tone::from(Band::Nominal).style(false).fg, Some(Color::Green));
        assert_eq!(Tone::from(Band::Warning).style(false).fg, Some(Color::Yellow));
        assert_eq!(Tone::from(Band::Critical).style(false).fg, Some(Color::Red));
    }

    #[test]
    fn test_bold_adds_modifier() {
        assert!(Tone::Title
            .style(true)
            .add_modifier
            .contains(Modifier::BOLD));
        assert!(!Tone::Text.style(false).add_modifier.contains(Modifier::BOLD));
    }
}
