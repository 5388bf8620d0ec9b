//! Report styling.

use console::Style;

use crate::validate::Severity;

/// Styles used by the human report.
#[derive(Debug, Clone)]
pub struct ReportTheme {
    /// Error severity (red bold).
    pub error: Style,
    /// Warning severity (orange).
    pub warning: Style,
    /// Info severity (cyan).
    pub info: Style,
    /// Box-drawing borders (dim).
    pub border: Style,
    /// Report title and section headers (bold).
    pub header: Style,
    /// File paths and locations (underlined).
    pub location: Style,
    /// Rule ids, durations and other secondary text (dim).
    pub dim: Style,
    /// The highlighted line of a source excerpt (bold).
    pub highlight: Style,
    /// Suggestions (magenta).
    pub hint: Style,
    /// Clean-result summary (green).
    pub success: Style,
}

impl Default for ReportTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportTheme {
    pub fn new() -> Self {
        Self {
            error: Style::new().red().bold(),
            warning: Style::new().color256(208),
            info: Style::new().cyan(),
            border: Style::new().dim(),
            header: Style::new().bold(),
            location: Style::new().underlined(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            hint: Style::new().magenta(),
            success: Style::new().green(),
        }
    }

    /// A theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            error: Style::new(),
            warning: Style::new(),
            info: Style::new(),
            border: Style::new(),
            header: Style::new(),
            location: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            hint: Style::new(),
            success: Style::new(),
        }
    }

    pub fn for_color(use_color: bool) -> Self {
        if use_color {
            Self::new()
        } else {
            Self::plain()
        }
    }

    pub fn severity(&self, severity: Severity) -> &Style {
        match severity {
            Severity::Error => &self.error,
            Severity::Warn => &self.warning,
            Severity::Info => &self.info,
        }
    }

    /// Severity label padded to a fixed width, then styled.
    pub fn format_severity(&self, severity: Severity) -> String {
        format!(
            "{}",
            self.severity(severity)
                .apply_to(format!("{:<5}", severity.label()))
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_severity_is_padded_label() {
        let theme = ReportTheme::plain();
        assert_eq!(theme.format_severity(Severity::Warn), "WARN ");
        assert_eq!(theme.format_severity(Severity::Error), "ERROR");
    }

    #[test]
    fn for_color_picks_theme() {
        let plain = ReportTheme::for_color(false);
        assert_eq!(
            format!("{}", plain.error.apply_to("x")),
            "x"
        );
    }
}
