//! Display unit command encoding.
//!
//! A roadside display accepts two pipe-delimited ASCII commands over a
//! short-lived stream connection, each terminated by CRLF:
//!
//! ```text
//! |T|22-18|<speed>|7|1|1|1|      show, overspeed variant (red flashing)
//! |T|22-18|<speed>|7|2|1|1|      show, normal variant (green flashing)
//! |C|0-0|128-128|                clear
//! ```

use bytes::Bytes;

/// Panel window coordinates shared by all show commands.
const PANEL_WINDOW: &str = "22-18";
/// Font selector for the speed figure.
const FONT: &str = "7";
/// Colour code for readings over the speed threshold (red flashing).
const COLOUR_OVERSPEED: &str = "1";
/// Colour code for readings at or under the threshold (green flashing).
const COLOUR_NORMAL: &str = "2";
/// The clear command body, fixed for every panel.
const CLEAR_BODY: &str = "|C|0-0|128-128|";

/// A command addressed to a roadside display unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCommand {
    /// Render a speed figure on the panel.
    Show {
        /// Speed to render, in km/h.
        speed_kmh: u32,
        /// Selects the overspeed (red) colour variant.
        overspeed: bool,
    },
    /// Blank the panel.
    Clear,
}

impl DisplayCommand {
    /// Encode the command as a CRLF-terminated ASCII line.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let line = match self {
            Self::Show { speed_kmh, overspeed } => {
                let colour = if *overspeed { COLOUR_OVERSPEED } else { COLOUR_NORMAL };
                format!("|T|{PANEL_WINDOW}|{speed_kmh}|{FONT}|{colour}|1|1|\r\n")
            },
            Self::Clear => format!("{CLEAR_BODY}\r\n"),
        };
        Bytes::from(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_overspeed_show() {
        let cmd = DisplayCommand::Show { speed_kmh: 95, overspeed: true };
        assert_eq!(cmd.encode(), Bytes::from_static(b"|T|22-18|95|7|1|1|1|\r\n"));
    }

    #[test]
    fn encodes_normal_show() {
        let cmd = DisplayCommand::Show { speed_kmh: 42, overspeed: false };
        assert_eq!(cmd.encode(), Bytes::from_static(b"|T|22-18|42|7|2|1|1|\r\n"));
    }

    #[test]
    fn encodes_clear() {
        assert_eq!(DisplayCommand::Clear.encode(), Bytes::from_static(b"|C|0-0|128-128|\r\n"));
    }
}
