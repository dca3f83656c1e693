use std::io::{self, Write};

use chip8_core::FrameBuffer;

/// # Display
/// Renders a Chip-8 FrameBuffer as text, one character per pixel and one line per row.
/// The display only gets a call to `render` when the FrameBuffer was updated.
pub struct Display {
    on: char,
    off: char,
    border: bool,
}

impl Default for Display {
    fn default() -> Self {
        Display {
            on: '█',
            off: ' ',
            border: true,
        }
    }
}

impl Display {
    /// Creates a display that draws lit pixels with `on` and dark pixels with `off`.
    ///
    /// # Arguments
    /// * `border` whether to frame the picture with a box
    pub fn new(on: char, off: char, border: bool) -> Self {
        Display { on, off, border }
    }

    /// Formats a FrameBuffer as lines of text.
    ///
    /// Each row of pixels maps to a line of `on`/`off` characters, optionally boxed in by
    /// `+---+` and `|` so blank edges of the screen stay visible.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn frame_to_text(&self, frame: &FrameBuffer) -> String {
        let edge = format!("+{}+\n", "-".repeat(frame.width()));
        let mut text = String::new();
        if self.border {
            text.push_str(&edge);
        }
        for row in frame.rows() {
            if self.border {
                text.push('|');
            }
            text.extend(row.iter().map(|&on| if on { self.on } else { self.off }));
            if self.border {
                text.push('|');
            }
            text.push('\n');
        }
        if self.border {
            text.push_str(&edge);
        }
        text
    }

    /// Formats the FrameBuffer as text and writes it out in one go.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    /// * `out` where to write the frame, usually stdout
    pub fn render(&mut self, frame: &FrameBuffer, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(self.frame_to_text(frame).as_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_text() {
        let mut frame = FrameBuffer::new(4, 2);
        frame.set(1, 0, true);
        frame.set(0, 1, true);
        let display = Display::new('#', '.', false);
        assert_eq!(display.frame_to_text(&frame), ".#..\n#...\n");
    }

    #[test]
    fn test_frame_to_text_with_border() {
        let mut frame = FrameBuffer::new(3, 1);
        frame.set(2, 0, true);
        let display = Display::new('#', ' ', true);
        assert_eq!(display.frame_to_text(&frame), "+---+\n|  #|\n+---+\n");
    }

    #[test]
    fn test_render_writes_whole_frame() {
        let frame = FrameBuffer::new(64, 32);
        let mut display = Display::default();
        let mut out = Vec::new();
        display.render(&frame, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 34);
        assert!(text.lines().all(|line| line.chars().count() == 66));
    }
}
