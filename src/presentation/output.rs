//! Output Rendering
//!
//! Renders a `SyncResult` as a human-readable report or as JSON.

use std::fmt::Write as _;

use crate::application::SyncResult;
use crate::domain::value_objects::ActionKind;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Icons for output rendering
struct Icons {
    check: &'static str,
    cross: &'static str,
    add: &'static str,
    enable: &'static str,
    disable: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
            add: "+",
            enable: "↺",
            disable: "-",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
            add: "+",
            enable: "~",
            disable: "-",
        }
    }

    fn action(&self, action: ActionKind) -> &'static str {
        match action {
            ActionKind::Add => self.add,
            ActionKind::Enable => self.enable,
            ActionKind::Disable => self.disable,
        }
    }
}

/// Trait for rendering sync results
pub trait SyncResultRenderer {
    /// Render the sync result
    fn render(&self, result: &SyncResult);
}

/// Text renderer for sync results
pub struct TextRenderer {
    /// Whether to use unicode
    pub unicode: bool,
    /// Verbosity level
    pub verbose: u8,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            unicode: true,
            verbose: 0,
        }
    }
}

impl TextRenderer {
    /// Report text for a result, without a trailing newline
    pub fn format(&self, result: &SyncResult) -> String {
        let icons = if self.unicode {
            Icons::unicode()
        } else {
            Icons::ascii()
        };
        let mut out = String::new();

        if !result.ok() {
            let _ = writeln!(out, "{} Sync Failed", icons.cross);
            let _ = writeln!(out);
            let _ = write!(
                out,
                "  Error: {}",
                result.error_message().unwrap_or("unknown error")
            );
            return out;
        }

        let title = if result.is_dry_run() {
            "Dry Run Complete"
        } else {
            "Sync Complete"
        };
        if result.has_failures() {
            let _ = writeln!(out, "{} {} With Errors", icons.cross, title);
        } else {
            let _ = writeln!(out, "{} {}", icons.check, title);
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  Added: {} (failed: {})",
            result.added_count(),
            result.added_fail_count()
        );
        let _ = writeln!(out, "  Enabled: {}", result.enabled_count());
        let _ = writeln!(
            out,
            "  Disabled: {} (failed: {})",
            result.disabled_count(),
            result.disabled_fail_count()
        );
        let _ = write!(out, "  Excluded: {}", result.excluded_count());

        if !result.changes().is_empty() && (self.verbose > 0 || result.is_dry_run()) {
            let heading = if result.is_dry_run() {
                "Planned"
            } else {
                "Changes"
            };
            let _ = write!(out, "\n\n  {} ({}):", heading, result.changes().len());
            for change in result.changes() {
                let _ = write!(
                    out,
                    "\n    {} {}",
                    icons.action(change.action),
                    change.username
                );
                if let Some(domain) = &change.domain {
                    let _ = write!(out, " [{}]", domain);
                }
            }
        }

        if !result.failed_domains().is_empty() {
            let names: Vec<&str> = result.failed_domains().iter().map(|d| d.as_str()).collect();
            let _ = write!(out, "\n\n  Skipped domains: {}", names.join(", "));
        }

        if !result.errors().is_empty() {
            let _ = write!(out, "\n\n  Errors ({}):", result.errors().len());
            for error in result.errors() {
                match error.action {
                    Some(action) => {
                        let _ = write!(
                            out,
                            "\n    {} {} ({}): {}",
                            icons.cross, error.username, action, error.message
                        );
                    }
                    None => {
                        let _ = write!(
                            out,
                            "\n    {} {}: {}",
                            icons.cross, error.username, error.message
                        );
                    }
                }
            }
        }

        out
    }
}

impl SyncResultRenderer for TextRenderer {
    fn render(&self, result: &SyncResult) {
        println!("{}", self.format(result));
    }
}

/// JSON renderer for sync results
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn format(result: &SyncResult) -> String {
        serde_json::to_string(result).unwrap_or_default()
    }
}

impl SyncResultRenderer for JsonRenderer {
    fn render(&self, result: &SyncResult) {
        println!("{}", Self::format(result));
    }
}

/// Create a renderer based on format
pub fn create_renderer(format: OutputFormat, unicode: bool, verbose: u8) -> Box<dyn SyncResultRenderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer { unicode, verbose }),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}
