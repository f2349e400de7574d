//! Font style flags, render styles, character ranges and the
//! font-instance hash.

use bitflags::bitflags;

/// Point size used by the public font APIs.
///
/// Deliberately 16 bits wide so that size, style and render style pack
/// into one [`FontInstanceHash`] without overlapping.
pub type FontSize = u16;

/// Key of a generated font instance within its [`Font`](crate::font::Font).
pub type FontInstanceHash = u64;

bitflags! {
    /// Style flags of a font instance. Combine with `|`, test with
    /// [`contains`](Self::contains).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FontStyle: u32 {
        const BOLD          = 0x01;
        const ITALIC        = 0x02;
        const UNDERLINE     = 0x04;
        const STRIKETHROUGH = 0x08;
    }
}

impl FontStyle {
    /// No styling.
    pub const NORMAL: FontStyle = FontStyle::empty();
}

/// How glyphs are rasterised into the atlas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FontRenderStyle {
    /// No anti-aliasing: coverage is thresholded to fully on or off.
    Solid = 0,
    /// Anti-aliased coverage.
    #[default]
    Blended = 1,
}

const SIZE_BITS: u32 = FontSize::BITS;
const STYLE_BITS: u32 = u32::BITS;

/// Combine size, style and render style into one collision-free key.
///
/// Layout: size in bits 0..16, style in bits 16..48, render style in
/// bits 48..56.
pub fn font_instance_hash(
    size: FontSize,
    style: FontStyle,
    render_style: FontRenderStyle,
) -> FontInstanceHash {
    u64::from(size)
        | (u64::from(style.bits()) << SIZE_BITS)
        | (u64::from(render_style as u8) << (SIZE_BITS + STYLE_BITS))
}

/// Inclusive range of single-byte character codes a font covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CharRange {
    start: u8,
    end: u8,
}

impl CharRange {
    /// First and last printable (non-extended) ASCII characters.
    pub const PRINTABLE_ASCII: CharRange = CharRange {
        start: 32,
        end: 126,
    };

    /// Range covering `start..=end`. The bounds are swapped if reversed.
    pub fn new(start: u8, end: u8) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn start(&self) -> u8 {
        self.start
    }

    pub fn end(&self) -> u8 {
        self.end
    }

    /// Number of characters in the range.
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    /// Always false: a range holds at least one character.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of `ch` within the range, if covered.
    pub fn index_of(&self, ch: char) -> Option<usize> {
        let code = u32::from(ch);
        if code < u32::from(self.start) || code > u32::from(self.end) {
            return None;
        }
        Some((code - u32::from(self.start)) as usize)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.index_of(ch).is_some()
    }

    /// Characters of the range in code-point order.
    pub fn chars(&self) -> impl Iterator<Item = char> {
        (self.start..=self.end).map(char::from)
    }
}

impl Default for CharRange {
    fn default() -> Self {
        Self::PRINTABLE_ASCII
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_styles() -> Vec<FontStyle> {
        // Every OR-combination of the four flags, NORMAL included.
        (0u32..16).map(FontStyle::from_bits_truncate).collect()
    }

    #[test]
    fn test_style_flags() {
        let style = FontStyle::BOLD | FontStyle::ITALIC;
        assert!(style.contains(FontStyle::BOLD));
        assert!(style.contains(FontStyle::ITALIC));
        assert!(!style.contains(FontStyle::UNDERLINE));
        assert_eq!(style.intersection(FontStyle::ITALIC), FontStyle::ITALIC);
        assert_eq!(
            FontStyle::NORMAL.union(FontStyle::STRIKETHROUGH),
            FontStyle::STRIKETHROUGH
        );
        assert!(FontStyle::NORMAL.is_empty());
    }

    #[test]
    fn test_hash_layout() {
        let h = font_instance_hash(12, FontStyle::BOLD, FontRenderStyle::Blended);
        assert_eq!(h & 0xFFFF, 12);
        assert_eq!((h >> 16) & 0xFFFF_FFFF, 1);
        assert_eq!(h >> 48, 1);
    }

    #[test]
    fn test_hash_unique_across_styles_and_render_styles() {
        let styles = all_styles();
        let render_styles = [FontRenderStyle::Solid, FontRenderStyle::Blended];
        let sizes: Vec<FontSize> = vec![0, 1, 2, 255, 256, 4096, 65534, 65535];

        let mut seen = HashSet::new();
        for &size in &sizes {
            for &style in &styles {
                for &rs in &render_styles {
                    assert!(
                        seen.insert(font_instance_hash(size, style, rs)),
                        "collision at size {size}, style {style:?}, render style {rs:?}"
                    );
                }
            }
        }
        assert_eq!(seen.len(), sizes.len() * styles.len() * render_styles.len());
    }

    #[test]
    fn test_hash_unique_across_every_size() {
        let mut seen = HashSet::new();
        for size in 0..=FontSize::MAX {
            for rs in [FontRenderStyle::Solid, FontRenderStyle::Blended] {
                assert!(seen.insert(font_instance_hash(size, FontStyle::ITALIC, rs)));
            }
        }
    }

    #[test]
    fn test_char_range() {
        let range = CharRange::PRINTABLE_ASCII;
        assert_eq!(range.len(), 95);
        assert_eq!(range.index_of(' '), Some(0));
        assert_eq!(range.index_of('~'), Some(94));
        assert_eq!(range.index_of('\n'), None);
        assert_eq!(range.index_of('é'), None);
        assert_eq!(range.chars().count(), 95);
    }

    #[test]
    fn test_char_range_reversed_bounds() {
        let range = CharRange::new(b'z', b'a');
        assert_eq!(range.start(), b'a');
        assert_eq!(range.end(), b'z');
        assert!(range.contains('m'));
    }
}
