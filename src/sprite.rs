//! Renders sprite bytes as rows of glyphs, one glyph per pixel.

use bitvec::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub on: char,
    pub off: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self { on: '1', off: ' ' }
    }
}

impl Glyphs {
    /// Parses a two character string, the set glyph first.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(on), Some(off), None) => Some(Self { on, off }),
            _ => None,
        }
    }

    /// One byte as an 8 glyph row, most significant bit on the left.
    pub fn row(&self, byte: u8) -> String {
        byte.view_bits::<Msb0>()
            .iter()
            .by_vals()
            .map(|bit| if bit { self.on } else { self.off })
            .collect()
    }

    pub fn rows(&self, bytes: &[u8]) -> Vec<String> {
        bytes.iter().map(|byte| self.row(*byte)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn msb_is_leftmost() {
        let glyphs = Glyphs::default();
        assert_eq!(glyphs.row(0xF0), "1111    ");
        assert_eq!(glyphs.row(0x90), "1  1    ");
        assert_eq!(glyphs.row(0x01), "       1");
    }

    #[test]
    fn one_row_per_byte() {
        let glyphs = Glyphs { on: '#', off: '.' };
        assert_eq!(glyphs.rows(&[0xF0, 0x90]), vec!["####....", "#..#...."]);
        assert!(glyphs.rows(&[]).is_empty());
    }

    #[test]
    fn parses_glyph_pairs() {
        assert_eq!(Glyphs::parse("#."), Some(Glyphs { on: '#', off: '.' }));
        assert_eq!(Glyphs::parse("█·"), Some(Glyphs { on: '█', off: '·' }));
        assert_eq!(Glyphs::parse("#"), None);
        assert_eq!(Glyphs::parse("#.x"), None);
    }
}
