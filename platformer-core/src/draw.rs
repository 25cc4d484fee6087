//! Render seam. The simulation describes each frame through [`Canvas`]; hosts map the
//! calls onto whatever graphics API they have. [`CommandList`] records them.

use serde::Serialize;

use crate::collision::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x00_0000);
    pub const WHITE: Color = Color(0xff_ffff);
    pub const RED: Color = Color(0xff_3333);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Parses `#rgb` or `#rrggbb`.
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            3 => {
                let value = u32::from_str_radix(digits, 16).ok()?;
                let expand = |nibble: u32| ((nibble & 0xf) * 0x11) as u8;
                Some(Self::rgb(
                    expand(value >> 8),
                    expand(value >> 4),
                    expand(value),
                ))
            }
            6 => u32::from_str_radix(digits, 16).ok().map(Self),
            _ => None,
        }
    }

    pub fn hex(self) -> String {
        format!("#{:06x}", self.0 & 0xff_ffff)
    }
}

pub trait Canvas {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, alpha: f32);
    fn text(&mut self, x: f32, y: f32, text: &str, color: Color);
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
        alpha: f32,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Color,
        alpha: f32,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        color: Color,
    },
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CommandList {
    pub commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn position_of(&self, predicate: impl Fn(&DrawCommand) -> bool) -> Option<usize> {
        self.commands.iter().position(predicate)
    }
}

impl Canvas for CommandList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32) {
        self.commands.push(DrawCommand::Rect { rect, color, alpha });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, alpha: f32) {
        self.commands.push(DrawCommand::Circle {
            cx,
            cy,
            radius,
            color,
            alpha,
        });
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }
}

/// Discards everything; used when a host only wants the simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn clear(&mut self, _color: Color) {}
    fn fill_rect(&mut self, _rect: Rect, _color: Color, _alpha: f32) {}
    fn fill_circle(&mut self, _cx: f32, _cy: f32, _radius: f32, _color: Color, _alpha: f32) {}
    fn text(&mut self, _x: f32, _y: f32, _text: &str, _color: Color) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_formatting() {
        assert_eq!(Color::rgb(0x3a, 0x7d, 0x2d).hex(), "#3a7d2d");
        assert_eq!(Color::BLACK.hex(), "#000000");
    }

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(Color::parse_hex("#87CEEB"), Some(Color::rgb(0x87, 0xce, 0xeb)));
        assert_eq!(Color::parse_hex("#300"), Some(Color::rgb(0x33, 0x00, 0x00)));
        assert_eq!(Color::parse_hex("555"), None);
        assert_eq!(Color::parse_hex("#12345"), None);
        assert_eq!(Color::parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn command_list_records_in_order() {
        let mut list = CommandList::new();
        list.clear(Color::BLACK);
        list.text(1.0, 2.0, "hi", Color::WHITE);
        assert_eq!(list.commands.len(), 2);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["hi"]);
    }
}
