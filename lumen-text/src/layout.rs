//! Text layout: wrapping multi-component strings into lines and turning
//! lines into positioned, clipped glyph quads.
//!
//! ```text
//! [StringComponent] ──layout_string(rect, wrap)──► TextLayout { lines }
//!                                                       │
//!                         glyph_quads(rect, align) ◄────┘
//!                                │
//!                                ▼
//!                         Vec<GlyphQuad>  (clipped to rect)
//! ```
//!
//! Coordinates are top-left origin, Y down. A line is as tall as its
//! tallest glyph and glyphs sit on the line's bottom edge. Layout never
//! breaks on horizontal overflow by itself; only when a new line would
//! push the text past the bottom of the rectangle does it stop.

use lumen_core::{clip, Color4, Rect, TextureId, Vec2};

use crate::font::{FontInstance, Glyph};

/// Where a block of text sits inside its rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Top-left, with no offset computation at all.
    #[default]
    None,
    CenterLeft,
    TopLeft,
    TopCenter,
    TopRight,
    CenterRight,
    BottomRight,
    BottomCenter,
    BottomLeft,
    CenterCenter,
}

/// Line-breaking policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WordWrap {
    /// Break only at `'\n'`.
    #[default]
    None,
    /// Break before whichever character would overflow the line.
    Quick,
    /// Break between words, keeping each word whole.
    Greedy,
}

/// How a component's glyphs are scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StringSizing {
    /// Multiply glyph size by a per-axis factor.
    Scaled(Vec2),
    /// Scale vertically so the font's line height becomes
    /// `target_height`; `scale_x` applies horizontally on its own.
    Fixed { scale_x: f32, target_height: f32 },
}

impl StringSizing {
    /// Per-axis glyph scale and resulting line height for a font of
    /// `font_height` pixels.
    fn resolve(&self, font_height: u32) -> (Vec2, f32) {
        let font_height = font_height as f32;
        match *self {
            StringSizing::Scaled(scale) => (scale, font_height * scale.y),
            StringSizing::Fixed {
                scale_x,
                target_height,
            } => {
                (Vec2::new(scale_x, target_height / font_height), target_height)
            }
        }
    }
}

impl Default for StringSizing {
    fn default() -> Self {
        StringSizing::Scaled(Vec2::ONE)
    }
}

/// A run of text drawn with one font, scale and tint.
#[derive(Clone, Copy, Debug)]
pub struct StringComponent<'a> {
    pub text: &'a str,
    pub font: &'a FontInstance,
    pub sizing: StringSizing,
    pub tint: Color4,
}

impl<'a> StringComponent<'a> {
    /// Unscaled, untinted text.
    pub fn new(text: &'a str, font: &'a FontInstance) -> Self {
        Self {
            text,
            font,
            sizing: StringSizing::default(),
            tint: Color4::WHITE,
        }
    }

    pub fn with_sizing(mut self, sizing: StringSizing) -> Self {
        self.sizing = sizing;
        self
    }

    pub fn with_tint(mut self, tint: Color4) -> Self {
        self.tint = tint;
        self
    }
}

/// A glyph placed on a line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawableGlyph {
    pub glyph: Glyph,
    /// Horizontal offset from the line start.
    pub x: f32,
    pub scale: Vec2,
    pub tint: Color4,
    pub texture: Option<TextureId>,
}

impl DrawableGlyph {
    fn scaled_size(&self) -> Vec2 {
        self.glyph.size * self.scale
    }
}

/// One laid-out line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawableLine {
    /// Sum of scaled glyph widths.
    pub length: f32,
    /// Tallest scaled line height on the line.
    pub height: f32,
    pub glyphs: Vec<DrawableGlyph>,
}

/// Output of [`layout_string`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<DrawableLine>,
    pub total_height: f32,
}

impl TextLayout {
    /// Widest line.
    pub fn max_line_length(&self) -> f32 {
        self.lines.iter().map(|l| l.length).fold(0.0, f32::max)
    }

    /// Number of placed glyphs across all lines.
    pub fn glyph_count(&self) -> usize {
        self.lines.iter().map(|l| l.glyphs.len()).sum()
    }
}

/// A glyph ready to draw: screen-space quad, atlas UVs and tint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphQuad {
    /// Top-left position in pixels.
    pub position: Vec2,
    pub size: Vec2,
    /// UV coordinates in the atlas texture.
    pub uv_rect: Rect,
    pub tint: Color4,
    pub texture: Option<TextureId>,
}

// ── Line building ───────────────────────────────────────────────────

/// Layout hit the bottom of the rectangle.
struct Overflow;

struct LineBuilder {
    /// Height available for lines.
    max_height: f32,
    /// Heights of all finished lines.
    completed_height: f32,
    lines: Vec<DrawableLine>,
}

impl LineBuilder {
    fn new(max_height: f32) -> Self {
        Self {
            max_height,
            completed_height: 0.0,
            lines: vec![DrawableLine::default()],
        }
    }

    fn current(&self) -> &DrawableLine {
        // `lines` is never empty.
        &self.lines[self.lines.len() - 1]
    }

    fn current_mut(&mut self) -> &mut DrawableLine {
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    fn line_is_empty(&self) -> bool {
        self.current().glyphs.is_empty()
    }

    /// Finish the current line and start a new one of `height`.
    fn break_line(&mut self, height: f32) -> Result<(), Overflow> {
        let finished = self.completed_height + self.current().height;
        if finished + height > self.max_height {
            return Err(Overflow);
        }
        self.completed_height = finished;
        self.lines.push(DrawableLine {
            height,
            ..DrawableLine::default()
        });
        Ok(())
    }

    /// Grow the current line to at least `height`.
    fn ensure_height(&mut self, height: f32) -> Result<(), Overflow> {
        if self.current().height < height {
            if self.completed_height + height > self.max_height {
                return Err(Overflow);
            }
            self.current_mut().height = height;
        }
        Ok(())
    }

    fn push(&mut self, run: &Run<'_>, glyph: &Glyph) {
        let line = self.current_mut();
        let width = glyph.size.x * run.scale.x;
        line.glyphs.push(DrawableGlyph {
            glyph: *glyph,
            x: line.length,
            scale: run.scale,
            tint: run.tint,
            texture: run.texture,
        });
        line.length += width;
    }

    /// Drop trailing spaces so alignment ignores them.
    fn trim_trailing_spaces(&mut self) {
        let line = self.current_mut();
        while let Some(last) = line.glyphs.last() {
            if last.glyph.character != ' ' {
                break;
            }
            line.length -= last.scaled_size().x;
            line.glyphs.pop();
        }
    }

    fn finish(self) -> TextLayout {
        let total_height = self.completed_height + self.current().height;
        TextLayout {
            lines: self.lines,
            total_height,
        }
    }
}

/// Per-component settings resolved once.
struct Run<'a> {
    font: &'a FontInstance,
    scale: Vec2,
    height: f32,
    tint: Color4,
    texture: Option<TextureId>,
}

impl<'a> Run<'a> {
    fn new(component: &StringComponent<'a>) -> Option<Self> {
        if component.font.is_nil() || component.font.height() == 0 {
            return None;
        }
        let (scale, height) = component.sizing.resolve(component.font.height());
        Some(Self {
            font: component.font,
            scale,
            height,
            tint: component.tint,
            texture: component.font.texture(),
        })
    }

    fn glyph(&self, ch: char) -> Option<&'a Glyph> {
        self.font.supported_glyph(ch)
    }

    fn width(&self, glyph: &Glyph) -> f32 {
        glyph.size.x * self.scale.x
    }
}

fn layout_no_wrap(builder: &mut LineBuilder, run: &Run<'_>, text: &str) -> Result<(), Overflow> {
    for ch in text.chars() {
        if ch == '\n' {
            builder.break_line(run.height)?;
            continue;
        }
        let Some(glyph) = run.glyph(ch) else {
            continue;
        };
        builder.ensure_height(run.height)?;
        builder.push(run, glyph);
    }
    Ok(())
}

fn layout_quick_wrap(
    builder: &mut LineBuilder,
    run: &Run<'_>,
    text: &str,
    width: f32,
) -> Result<(), Overflow> {
    for ch in text.chars() {
        if ch == '\n' {
            builder.break_line(run.height)?;
            continue;
        }
        let Some(glyph) = run.glyph(ch) else {
            continue;
        };

        if builder.current().length + run.width(glyph) > width && !builder.line_is_empty() {
            builder.break_line(run.height)?;
            // A space that caused the break is dropped.
            if ch == ' ' {
                continue;
            }
        }
        builder.ensure_height(run.height)?;
        builder.push(run, glyph);
    }
    Ok(())
}

/// Buffered word for greedy wrapping.
#[derive(Default)]
struct PendingWord<'a> {
    glyphs: Vec<&'a Glyph>,
    length: f32,
}

impl<'a> PendingWord<'a> {
    fn commit(
        &mut self,
        builder: &mut LineBuilder,
        run: &Run<'a>,
        width: f32,
    ) -> Result<(), Overflow> {
        if self.glyphs.is_empty() {
            return Ok(());
        }
        if builder.current().length + self.length > width && !builder.line_is_empty() {
            builder.trim_trailing_spaces();
            builder.break_line(run.height)?;
        }
        builder.ensure_height(run.height)?;
        for glyph in self.glyphs.drain(..) {
            builder.push(run, glyph);
        }
        self.length = 0.0;
        Ok(())
    }
}

fn layout_greedy_wrap<'a>(
    builder: &mut LineBuilder,
    run: &Run<'a>,
    text: &str,
    width: f32,
) -> Result<(), Overflow> {
    let mut word = PendingWord::default();

    for ch in text.chars() {
        if ch == '\n' {
            word.commit(builder, run, width)?;
            builder.break_line(run.height)?;
            continue;
        }
        let Some(glyph) = run.glyph(ch) else {
            continue;
        };

        if ch == ' ' {
            word.commit(builder, run, width)?;
            if builder.current().length + run.width(glyph) > width && !builder.line_is_empty() {
                builder.trim_trailing_spaces();
                builder.break_line(run.height)?;
                continue;
            }
            builder.ensure_height(run.height)?;
            builder.push(run, glyph);
            continue;
        }

        // A hyphen starts a new word.
        if ch == '-' {
            word.commit(builder, run, width)?;
        }
        word.glyphs.push(glyph);
        word.length += run.width(glyph);
    }
    word.commit(builder, run, width)
}

/// Lay `components` out into lines inside `rect`.
///
/// Layout stops at the first line that would extend past the bottom of
/// `rect`; everything laid out before it is kept. Characters the font
/// does not support, and components with a nil font, are skipped.
pub fn layout_string(
    components: &[StringComponent<'_>],
    rect: &Rect,
    wrap: WordWrap,
) -> TextLayout {
    let mut builder = LineBuilder::new(rect.height);

    for component in components {
        let Some(run) = Run::new(component) else {
            continue;
        };
        let result = match wrap {
            WordWrap::None => layout_no_wrap(&mut builder, &run, component.text),
            WordWrap::Quick => layout_quick_wrap(&mut builder, &run, component.text, rect.width),
            WordWrap::Greedy => layout_greedy_wrap(&mut builder, &run, component.text, rect.width),
        };
        if result.is_err() {
            log::trace!("Text layout overflowed {}px of height", rect.height);
            break;
        }
    }

    builder.finish()
}

/// Offset of a line of `length` within `rect` for a block of `height`.
pub fn calculate_offset(align: TextAlign, rect: &Rect, height: f32, length: f32) -> Vec2 {
    let left = 0.0;
    let center_x = (rect.width - length) / 2.0;
    let right = rect.width - length;
    let top = 0.0;
    let center_y = (rect.height - height) / 2.0;
    let bottom = rect.height - height;

    let (x, y) = match align {
        TextAlign::None => (0.0, 0.0),
        TextAlign::CenterLeft => (left, center_y),
        TextAlign::TopLeft => (left, top),
        TextAlign::TopCenter => (center_x, top),
        TextAlign::TopRight => (right, top),
        TextAlign::CenterRight => (right, center_y),
        TextAlign::BottomRight => (right, bottom),
        TextAlign::BottomCenter => (center_x, bottom),
        TextAlign::BottomLeft => (left, bottom),
        TextAlign::CenterCenter => (center_x, center_y),
    };
    Vec2::new(x, y)
}

/// Position every glyph of `layout` inside `rect` and clip it.
///
/// Glyphs that clipping would cut are dropped whole, since partial
/// glyphs look worse than missing ones.
pub fn glyph_quads(layout: &TextLayout, rect: &Rect, align: TextAlign) -> Vec<GlyphQuad> {
    let mut quads = Vec::with_capacity(layout.glyph_count());
    let mut line_top = 0.0;

    for line in &layout.lines {
        let offset = calculate_offset(align, rect, layout.total_height, line.length);

        for drawable in &line.glyphs {
            let full_size = drawable.scaled_size();
            if full_size.x <= 0.0 || full_size.y <= 0.0 {
                continue;
            }

            let mut position = rect.position()
                + offset
                + Vec2::new(drawable.x, line_top + line.height - full_size.y);
            let mut size = full_size;
            let mut uv_rect = drawable.glyph.uv_rect;
            clip(rect, &mut position, &mut size, &mut uv_rect);
            if size != full_size {
                continue;
            }

            quads.push(GlyphQuad {
                position,
                size,
                uv_rect,
                tint: drawable.tint,
                texture: drawable.texture,
            });
        }
        line_top += line.height;
    }
    quads
}

/// [`layout_string`] followed by [`glyph_quads`].
pub fn layout_glyph_quads(
    components: &[StringComponent<'_>],
    rect: &Rect,
    wrap: WordWrap,
    align: TextAlign,
) -> Vec<GlyphQuad> {
    let layout = layout_string(components, rect, wrap);
    glyph_quads(&layout, rect, align)
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixed_pitch_instance;

    fn line_text(line: &DrawableLine) -> String {
        line.glyphs.iter().map(|g| g.glyph.character).collect()
    }

    fn lines(layout: &TextLayout) -> Vec<String> {
        layout.lines.iter().map(line_text).collect()
    }

    #[test]
    fn test_no_wrap_single_line() {
        let font = fixed_pitch_instance(10.0, 20);
        let layout = layout_string(
            &[StringComponent::new("hello world", &font)],
            &Rect::new(0.0, 0.0, 50.0, 100.0),
            WordWrap::None,
        );
        assert_eq!(lines(&layout), vec!["hello world"]);
        assert_eq!(layout.lines[0].length, 110.0);
        assert_eq!(layout.total_height, 20.0);
    }

    #[test]
    fn test_no_wrap_newlines() {
        let font = fixed_pitch_instance(10.0, 20);
        let layout = layout_string(
            &[StringComponent::new("ab\ncd", &font)],
            &Rect::new(0.0, 0.0, 100.0, 100.0),
            WordWrap::None,
        );
        assert_eq!(lines(&layout), vec!["ab", "cd"]);
        assert_eq!(layout.total_height, 40.0);
    }

    #[test]
    fn test_no_wrap_vertical_overflow_stops() {
        let font = fixed_pitch_instance(10.0, 20);
        let layout = layout_string(
            &[StringComponent::new("a\nb\nc\nd", &font)],
            &Rect::new(0.0, 0.0, 100.0, 50.0),
            WordWrap::None,
        );
        assert_eq!(lines(&layout), vec!["a", "b"]);
        assert!(layout.total_height <= 50.0);
    }

    #[test]
    fn test_overflow_discards_later_components() {
        let font = fixed_pitch_instance(10.0, 20);
        let layout = layout_string(
            &[
                StringComponent::new("a\nb\nc", &font),
                StringComponent::new("z", &font),
            ],
            &Rect::new(0.0, 0.0, 100.0, 40.0),
            WordWrap::None,
        );
        assert_eq!(lines(&layout), vec!["a", "b"]);
    }

    #[test]
    fn test_quick_wrap_breaks_at_overflowing_char() {
        let font = fixed_pitch_instance(10.0, 20);
        let layout = layout_string(
            &[StringComponent::new("abcdefg", &font)],
            &Rect::new(0.0, 0.0, 30.0, 200.0),
            WordWrap::Quick,
        );
        assert_eq!(lines(&layout), vec!["abc", "def", "g"]);
        for line in &layout.lines {
            assert!(line.length <= 30.0);
        }
    }

    #[test]
    fn test_quick_wrap_drops_breaking_space() {
        let font = fixed_pitch_instance(10.0, 20);
        let layout = layout_string(
            &[StringComponent::new("abc def", &font)],
            &Rect::new(0.0, 0.0, 30.0, 200.0),
            WordWrap::Quick,
        );
        assert_eq!(lines(&layout), vec!["abc", "def"]);
    }

    #[test]
    fn test_quick_wrap_oversized_char_on_empty_line() {
        let font = fixed_pitch_instance(50.0, 20);
        let layout = layout_string(
            &[StringComponent::new("ab", &font)],
            &Rect::new(0.0, 0.0, 30.0, 200.0),
            WordWrap::Quick,
        );
        assert_eq!(lines(&layout), vec!["a", "b"]);
    }

    #[test]
    fn test_greedy_wrap_keeps_words_whole() {
        let font = fixed_pitch_instance(10.0, 20);
        let layout = layout_string(
            &[StringComponent::new("one two three", &font)],
            &Rect::new(0.0, 0.0, 100.0, 200.0),
            WordWrap::Greedy,
        );
        assert_eq!(lines(&layout), vec!["one two", "three"]);
        assert_eq!(layout.lines[0].length, 70.0);
        assert_eq!(layout.total_height, 40.0);
    }

    #[test]
    fn test_greedy_wrap_breaks_before_hyphen() {
        let font = fixed_pitch_instance(10.0, 20);
        let layout = layout_string(
            &[StringComponent::new("well-known", &font)],
            &Rect::new(0.0, 0.0, 60.0, 200.0),
            WordWrap::Greedy,
        );
        assert_eq!(lines(&layout), vec!["well", "-known"]);
    }

    #[test]
    fn test_greedy_wrap_long_word_stays_whole() {
        let font = fixed_pitch_instance(10.0, 20);
        let layout = layout_string(
            &[StringComponent::new("a extraordinary b", &font)],
            &Rect::new(0.0, 0.0, 50.0, 200.0),
            WordWrap::Greedy,
        );
        assert_eq!(lines(&layout), vec!["a", "extraordinary", "b"]);
    }

    #[test]
    fn test_greedy_wrap_respects_newline() {
        let font = fixed_pitch_instance(10.0, 20);
        let layout = layout_string(
            &[StringComponent::new("ab\ncd ef", &font)],
            &Rect::new(0.0, 0.0, 100.0, 200.0),
            WordWrap::Greedy,
        );
        assert_eq!(lines(&layout), vec!["ab", "cd ef"]);
    }

    #[test]
    fn test_line_height_is_tallest_component() {
        let small = fixed_pitch_instance(10.0, 10);
        let big = fixed_pitch_instance(10.0, 30);
        let layout = layout_string(
            &[StringComponent::new("ab", &small), StringComponent::new("c", &big)],
            &Rect::new(0.0, 0.0, 100.0, 100.0),
            WordWrap::None,
        );
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].height, 30.0);
        assert_eq!(layout.total_height, 30.0);
    }

    #[test]
    fn test_sizing_fixed_height() {
        let font = fixed_pitch_instance(10.0, 20);
        let component = StringComponent::new("ab", &font).with_sizing(StringSizing::Fixed {
            scale_x: 2.0,
            target_height: 40.0,
        });
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let layout = layout_string(&[component], &rect, WordWrap::None);
        assert_eq!(layout.lines[0].height, 40.0);
        assert_eq!(layout.lines[0].glyphs[0].scale, Vec2::new(2.0, 2.0));
        assert_eq!(layout.lines[0].length, 40.0);
    }

    #[test]
    fn test_sizing_scaled() {
        let font = fixed_pitch_instance(10.0, 20);
        let sizing = StringSizing::Scaled(Vec2::new(0.5, 1.5));
        let component = StringComponent::new("ab", &font).with_sizing(sizing);
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let layout = layout_string(&[component], &rect, WordWrap::None);
        assert_eq!(layout.lines[0].height, 30.0);
        assert_eq!(layout.lines[0].length, 10.0);
    }

    #[test]
    fn test_nil_font_yields_nothing() {
        let nil = FontInstance::nil();
        let layout = layout_string(
            &[StringComponent::new("hello", &nil)],
            &Rect::new(0.0, 0.0, 100.0, 100.0),
            WordWrap::Greedy,
        );
        assert_eq!(layout.glyph_count(), 0);
        assert_eq!(layout.total_height, 0.0);
    }

    #[test]
    fn test_out_of_range_chars_skipped() {
        let font = fixed_pitch_instance(10.0, 20);
        let layout = layout_string(
            &[StringComponent::new("aé\tb", &font)],
            &Rect::new(0.0, 0.0, 100.0, 100.0),
            WordWrap::None,
        );
        assert_eq!(lines(&layout), vec!["ab"]);
    }

    #[test]
    fn test_calculate_offset() {
        let rect = Rect::new(0.0, 0.0, 100.0, 60.0);
        let (h, len) = (20.0, 40.0);
        assert_eq!(calculate_offset(TextAlign::None, &rect, h, len), Vec2::ZERO);
        assert_eq!(calculate_offset(TextAlign::TopLeft, &rect, h, len), Vec2::ZERO);
        assert_eq!(calculate_offset(TextAlign::TopCenter, &rect, h, len), Vec2::new(30.0, 0.0));
        assert_eq!(calculate_offset(TextAlign::TopRight, &rect, h, len), Vec2::new(60.0, 0.0));
        assert_eq!(calculate_offset(TextAlign::CenterLeft, &rect, h, len), Vec2::new(0.0, 20.0));
        assert_eq!(calculate_offset(TextAlign::CenterCenter, &rect, h, len), Vec2::new(30.0, 20.0));
        assert_eq!(calculate_offset(TextAlign::CenterRight, &rect, h, len), Vec2::new(60.0, 20.0));
        assert_eq!(calculate_offset(TextAlign::BottomLeft, &rect, h, len), Vec2::new(0.0, 40.0));
        assert_eq!(calculate_offset(TextAlign::BottomCenter, &rect, h, len), Vec2::new(30.0, 40.0));
        assert_eq!(calculate_offset(TextAlign::BottomRight, &rect, h, len), Vec2::new(60.0, 40.0));
    }

    #[test]
    fn test_quads_positioned_in_rect() {
        let font = fixed_pitch_instance(10.0, 20);
        let rect = Rect::new(5.0, 7.0, 100.0, 100.0);
        let quads = layout_glyph_quads(
            &[StringComponent::new("ab\nc", &font).with_tint(Color4::rgb(255, 0, 0))],
            &rect,
            WordWrap::None,
            TextAlign::TopLeft,
        );
        assert_eq!(quads.len(), 3);
        assert_eq!(quads[0].position, Vec2::new(5.0, 7.0));
        assert_eq!(quads[1].position, Vec2::new(15.0, 7.0));
        assert_eq!(quads[2].position, Vec2::new(5.0, 27.0));
        assert_eq!(quads[0].size, Vec2::new(10.0, 20.0));
        assert_eq!(quads[0].tint, Color4::rgb(255, 0, 0));
        assert_eq!(quads[0].texture, font.texture());
    }

    #[test]
    fn test_quads_centered() {
        let font = fixed_pitch_instance(10.0, 20);
        let rect = Rect::new(0.0, 0.0, 100.0, 60.0);
        let quads = layout_glyph_quads(
            &[StringComponent::new("abcd", &font)],
            &rect,
            WordWrap::None,
            TextAlign::CenterCenter,
        );
        assert_eq!(quads[0].position, Vec2::new(30.0, 20.0));
    }

    #[test]
    fn test_small_glyph_sits_on_line_bottom() {
        let small = fixed_pitch_instance(10.0, 10);
        let big = fixed_pitch_instance(10.0, 30);
        let quads = layout_glyph_quads(
            &[StringComponent::new("a", &small), StringComponent::new("b", &big)],
            &Rect::new(0.0, 0.0, 100.0, 100.0),
            WordWrap::None,
            TextAlign::TopLeft,
        );
        assert_eq!(quads[0].position.y, 20.0);
        assert_eq!(quads[1].position.y, 0.0);
    }

    #[test]
    fn test_clipped_glyphs_dropped() {
        let font = fixed_pitch_instance(10.0, 20);
        // No wrap: "abcdef" is 60 wide in a 35 wide rect.
        let quads = layout_glyph_quads(
            &[StringComponent::new("abcdef", &font)],
            &Rect::new(0.0, 0.0, 35.0, 100.0),
            WordWrap::None,
            TextAlign::TopLeft,
        );
        assert_eq!(quads.len(), 3);
        for quad in &quads {
            assert!(quad.position.x + quad.size.x <= 35.0);
            assert_eq!(quad.uv_rect, Rect::UNIT);
        }
    }
}
