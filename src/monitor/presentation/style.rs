//! ANSI coloring and the thresholds that pick a color.

use std::fmt::Display;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Cyan,
    White,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
            Color::Cyan => "\x1b[36m",
            Color::White => "\x1b[37m",
        }
    }
}

/// Applies colors, or leaves text untouched when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn paint(&self, text: impl Display, color: Color) -> String {
        if self.enabled {
            format!("{}{}{}", color.code(), text, RESET)
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: impl Display, color: Color) -> String {
        if self.enabled {
            format!("{}{}{}{}", color.code(), BOLD, text, RESET)
        } else {
            text.to_string()
        }
    }
}

/// Free capacity: green above 30 % of max, yellow above 10 %.
pub fn free_color(free: f64, max: f64) -> Color {
    if free > max * 0.3 {
        Color::Green
    } else if free > max * 0.1 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn stopped_color(stopped: u64) -> Color {
    if stopped == 0 { Color::Green } else { Color::Red }
}

pub fn growth_color(prediction: u64) -> Color {
    if prediction > 10 {
        Color::Green
    } else if prediction > 3 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Cluster utilization in percent.
pub fn utilization_color(percent: f64) -> Color {
    if percent < 70.0 {
        Color::Green
    } else if percent < 90.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Live CPU usage of a single VM, in percent.
pub fn cpu_usage_color(percent: f64) -> Color {
    if percent > 80.0 {
        Color::Red
    } else if percent > 60.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

pub fn status_color(status: &str) -> Color {
    if status == "running" { Color::Green } else { Color::Red }
}

/// Display width of `text`, ignoring ANSI escape sequences.
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_disabled_is_plain() {
        assert_eq!(Palette::plain().paint("x", Color::Red), "x");
        assert_eq!(Palette::plain().bold(42, Color::Cyan), "42");
    }

    #[test]
    fn test_palette_enabled_wraps() {
        let painted = Palette::new(true).paint("ok", Color::Green);
        assert_eq!(painted, "\x1b[32mok\x1b[0m");
        assert_eq!(visible_width(&painted), 2);
        assert_eq!(visible_width(&Palette::new(true).bold("héllo", Color::Blue)), 5);
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(free_color(40.0, 100.0), Color::Green);
        assert_eq!(free_color(30.0, 100.0), Color::Yellow);
        assert_eq!(free_color(10.0, 100.0), Color::Red);
        assert_eq!(free_color(-5.0, 100.0), Color::Red);
        assert_eq!(stopped_color(0), Color::Green);
        assert_eq!(stopped_color(1), Color::Red);
        assert_eq!(growth_color(11), Color::Green);
        assert_eq!(growth_color(10), Color::Yellow);
        assert_eq!(growth_color(3), Color::Red);
        assert_eq!(utilization_color(69.9), Color::Green);
        assert_eq!(utilization_color(70.0), Color::Yellow);
        assert_eq!(utilization_color(90.0), Color::Red);
        assert_eq!(cpu_usage_color(81.0), Color::Red);
        assert_eq!(cpu_usage_color(61.0), Color::Yellow);
        assert_eq!(cpu_usage_color(60.0), Color::Green);
    }
}
