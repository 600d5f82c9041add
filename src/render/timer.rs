//! Section countdown clock

use serde::Serialize;

/// What the timer widget shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerDisplay {
    pub text: String,
    pub overtime: bool,
}

/// `MM:SS`, minutes grow past two digits when needed
pub fn format_clock(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Remaining time for a section, or `--:--` when it has no duration
pub fn display(duration: Option<u64>, elapsed: u64) -> TimerDisplay {
    let Some(duration) = duration else {
        return TimerDisplay {
            text: "--:--".to_string(),
            overtime: false,
        };
    };

    if elapsed > duration {
        TimerDisplay {
            text: format!("Over: {}", format_clock(elapsed - duration)),
            overtime: true,
        }
    } else {
        TimerDisplay {
            text: format_clock(duration - elapsed),
            overtime: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(300), "05:00");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn test_display_without_duration() {
        let shown = display(None, 42);
        assert_eq!(shown.text, "--:--");
        assert!(!shown.overtime);
    }

    #[test]
    fn test_display_counts_down() {
        assert_eq!(display(Some(300), 0).text, "05:00");
        assert_eq!(display(Some(300), 299).text, "00:01");
        assert_eq!(display(Some(300), 300).text, "00:00");
    }

    #[test]
    fn test_display_overtime() {
        let shown = display(Some(60), 75);
        assert!(shown.overtime);
        assert_eq!(shown.text, "Over: 00:15");
    }
}
