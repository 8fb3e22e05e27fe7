use std::env;
use std::io::{self, IsTerminal};

use nu_ansi_term::Style;

/// Catppuccin Mocha accents used when rendering diagnostics.
pub mod catppuccin {
    use nu_ansi_term::Color;

    pub struct Mocha;

    impl Mocha {
        pub const TEXT: Color = Color::Rgb(205, 214, 244);
        pub const SURFACE2: Color = Color::Rgb(108, 112, 134);
        pub const RED: Color = Color::Rgb(243, 139, 168);
        pub const YELLOW: Color = Color::Rgb(249, 226, 175);
        pub const PEACH: Color = Color::Rgb(250, 179, 135);
    }
}

/// Styles for each part of an error report.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub headline: Style,
    pub source: Style,
    pub caret: Style,
    pub cause: Style,
    /// Accent for abort notices (timeouts, cancellation).
    pub notice: Style,
}

impl Palette {
    /// Colored palette when stderr is a terminal and `NO_COLOR` is unset.
    pub fn for_stderr() -> Self {
        Self::choose(io::stderr().is_terminal(), env::var_os("NO_COLOR").is_some())
    }

    pub fn choose(is_tty: bool, no_color: bool) -> Self {
        if is_tty && !no_color {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        use catppuccin::Mocha;
        Self {
            headline: Style::new().bold().fg(Mocha::RED),
            source: Style::new().fg(Mocha::TEXT),
            caret: Style::new().bold().fg(Mocha::YELLOW),
            cause: Style::new().italic().fg(Mocha::SURFACE2),
            notice: Style::new().fg(Mocha::PEACH),
        }
    }

    pub fn plain() -> Self {
        Self {
            headline: Style::new(),
            source: Style::new(),
            caret: Style::new(),
            cause: Style::new(),
            notice: Style::new(),
        }
    }
}
