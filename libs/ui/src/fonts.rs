// Font definitions for the 128x64 display
//
// All text fonts are fixed-advance X11 fonts so that the layout engine can
// measure a line by counting characters.

// Regular body text, 6 px advance
pub use u8g2_fonts::fonts::u8g2_font_6x10_tf as FONT_NORMAL;

// Bold body text and headers, 6 px advance
pub use u8g2_fonts::fonts::u8g2_font_6x13B_tf as FONT_BOLD;

// Monospace for addresses, hex data and amounts, 7 px advance
pub use u8g2_fonts::fonts::u8g2_font_7x13_tf as FONT_MONO;

// Button labels
pub use u8g2_fonts::fonts::u8g2_font_5x8_tf as FONT_BUTTON;

// Open Iconic 8x8 sets for header icons
// check set: 'A' = check mark, 'B' = cross, 'D' = info
pub use u8g2_fonts::fonts::u8g2_font_open_iconic_check_1x_t as ICON_CHECK;
// embedded set: 'B' = gear, 'G' = warning triangle
pub use u8g2_fonts::fonts::u8g2_font_open_iconic_embedded_1x_t as ICON_EMBEDDED;
// arrow set: 'M' = arrow out, 'P' = arrow in
pub use u8g2_fonts::fonts::u8g2_font_open_iconic_arrow_1x_t as ICON_ARROW;
