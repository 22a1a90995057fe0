use colored::Color;

pub const PRIMARY: Color = Color::BrightCyan;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const MAC_ADDR: Color = Color::BrightMagenta;
pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const HOSTNAME: Color = Color::BrightGreen;
pub const PORT: Color = Color::BrightYellow;
pub const LOCATION: Color = Color::Cyan;
pub const ALERT: Color = Color::BrightRed;
