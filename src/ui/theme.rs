//! Colour theme for the dashboard.
//!
//! Supports light and dark terminals with automatic background detection.

use ratatui::style::{Color, Modifier, Style};

use crate::data::{ActivityState, HealthStatus};

/// Colours and styles used by every dashboard section.
///
/// Use [`Theme::auto_detect()`] to pick one from the terminal background, or
/// [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent colour for titles and queue names.
    pub highlight: Color,
    pub warning: Color,
    pub critical: Color,
    pub healthy: Color,
    /// Colour of box-drawing characters and section rules.
    pub border: Color,
    /// Secondary text such as timestamps and hints.
    pub muted: Color,
    /// Style for section headings.
    pub header: Style,
}

impl Theme {
    /// Theme for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            muted: Color::DarkGray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        }
    }

    /// Theme for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            muted: Color::Gray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a backlog health status.
    pub fn status_style(&self, status: HealthStatus) -> Style {
        match status {
            HealthStatus::Healthy => Style::default().fg(self.healthy),
            HealthStatus::Warning => Style::default().fg(self.warning),
            HealthStatus::Critical => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    /// Style for an activity badge.
    pub fn activity_style(&self, state: ActivityState) -> Style {
        match state {
            ActivityState::Publishing => Style::default().fg(self.healthy),
            ActivityState::Consuming => Style::default().fg(self.highlight),
            ActivityState::Mixed => Style::default().fg(self.warning),
            ActivityState::Idle => Style::default().fg(self.muted),
        }
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }
}
