//! Glyph atlas packing and bitmap stitching.
//!
//! Glyphs of one font instance are packed once into a single static
//! atlas using a row ("shelf") layout:
//!
//! ```text
//!   row_count = 1, 2, 3 … N
//!       │
//!       ▼
//!   each glyph → row with the smallest current width
//!       │
//!       ▼
//!   atlas = (pow2(widest row), pow2(Σ row heights))   ← keep smallest area
//! ```
//!
//! The search stops as soon as adding another row no longer shrinks the
//! area, or once the height has passed the device limit. Widths that
//! exceed the limit while the height still fits are skipped rather than
//! terminating the search, since more rows make the atlas narrower.
//!
//! [`AtlasBitmap`] then stitches the rasterised glyphs into one RGBA
//! buffer at the packed positions.

use lumen_core::Rect;
use thiserror::Error;

/// Why a set of glyphs could not be packed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("No glyphs to pack")]
    Empty,
    #[error("Atlas {width}×{height} exceeds the maximum texture dimension {max}")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// One shelf of the atlas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackedRow {
    /// Tallest glyph in the row.
    pub height: u32,
    /// Sum of glyph widths plus one padding per glyph.
    pub width: u32,
    /// Indices into the input size list, in placement order.
    pub glyphs: Vec<usize>,
}

/// Pixel position of one packed glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Result of [`pack_glyphs`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtlasLayout {
    /// Atlas width (power of two).
    pub width: u32,
    /// Atlas height (power of two).
    pub height: u32,
    pub rows: Vec<PackedRow>,
    /// Placement for every input glyph, indexed like the input.
    pub placements: Vec<GlyphPlacement>,
}

impl AtlasLayout {
    /// Normalised UV rectangle of glyph `index`.
    pub fn uv_rect(&self, index: usize) -> Option<Rect> {
        let p = self.placements.get(index)?;
        let w = self.width as f32;
        let h = self.height as f32;
        Some(Rect::new(
            p.x as f32 / w,
            p.y as f32 / h,
            p.width as f32 / w,
            p.height as f32 / h,
        ))
    }
}

/// Distribute `sizes` over `row_count` rows, each glyph going to the
/// currently narrowest row. Returns the rows with the unrounded atlas
/// width and height.
fn generate_rows(
    sizes: &[(u32, u32)],
    row_count: usize,
    padding: u32,
) -> (Vec<PackedRow>, u32, u32) {
    let mut rows = vec![PackedRow::default(); row_count];

    for (index, &(w, h)) in sizes.iter().enumerate() {
        // Ties go to the earliest row.
        let mut best = 0;
        for (i, row) in rows.iter().enumerate().skip(1) {
            if row.width < rows[best].width {
                best = i;
            }
        }

        let row = &mut rows[best];
        row.width += w + padding;
        row.height = row.height.max(h);
        row.glyphs.push(index);
    }

    let width = padding + rows.iter().map(|r| r.width).max().unwrap_or(0);
    let height = padding + rows.iter().map(|r| r.height + padding).sum::<u32>();
    (rows, width, height)
}

/// Pack glyph cells of the given `(width, height)` sizes into one atlas
/// no larger than `max_dimension` on either side.
///
/// `padding` pixels separate glyphs from each other and from the atlas
/// edges.
pub fn pack_glyphs(
    sizes: &[(u32, u32)],
    padding: u32,
    max_dimension: u32,
) -> Result<AtlasLayout, PackError> {
    if sizes.is_empty() {
        return Err(PackError::Empty);
    }

    let mut best: Option<(Vec<PackedRow>, u32, u32)> = None;
    let mut best_area = u64::MAX;

    let mut row_count = 1;
    while row_count <= sizes.len() {
        let (rows, width, height) = generate_rows(sizes, row_count, padding);
        let width = width.next_power_of_two();
        let height = height.next_power_of_two();

        if width > max_dimension && height <= max_dimension {
            row_count += 1;
            continue;
        }

        let area = u64::from(width) * u64::from(height);
        if area >= best_area {
            break;
        }

        best = Some((rows, width, height));
        best_area = area;
        row_count += 1;

        if height > max_dimension {
            break;
        }
    }

    let Some((rows, width, height)) = best else {
        let (_, width, height) = generate_rows(sizes, sizes.len(), padding);
        return Err(PackError::TooLarge {
            width: width.next_power_of_two(),
            height: height.next_power_of_two(),
            max: max_dimension,
        });
    };
    if width > max_dimension || height > max_dimension {
        return Err(PackError::TooLarge {
            width,
            height,
            max: max_dimension,
        });
    }

    let mut placements = vec![GlyphPlacement::default(); sizes.len()];
    let mut y = padding;
    for row in &rows {
        let mut x = padding;
        for &index in &row.glyphs {
            let (w, h) = sizes[index];
            placements[index] = GlyphPlacement {
                x,
                y,
                width: w,
                height: h,
            };
            x += w + padding;
        }
        y += row.height + padding;
    }

    log::debug!(
        "Packed {} glyphs into {} rows ({}×{})",
        sizes.len(),
        rows.len(),
        width,
        height,
    );

    Ok(AtlasLayout {
        width,
        height,
        rows,
        placements,
    })
}

// ───────────────────────────────────────────────────────────────────
// Bitmap stitching
// ───────────────────────────────────────────────────────────────────

/// CPU-side RGBA atlas image, filled glyph by glyph before upload.
pub struct AtlasBitmap {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
}

impl AtlasBitmap {
    /// A fully transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Copy a `width × height` bitmap to `(x, y)`.
    ///
    /// Handles both alpha-only (1 byte/pixel, drawn as white with that
    /// alpha) and RGBA (4 bytes/pixel). Pixels outside the atlas are
    /// dropped.
    pub fn blit(&mut self, x: u32, y: u32, width: u32, height: u32, bitmap_data: &[u8]) {
        let expected_rgba = width as usize * height as usize * 4;
        let expected_alpha = width as usize * height as usize;

        let is_rgba = bitmap_data.len() >= expected_rgba;
        let is_alpha = bitmap_data.len() >= expected_alpha && !is_rgba;
        if !is_rgba && !is_alpha {
            log::warn!(
                "Bitmap data too short for {}×{} glyph ({} bytes)",
                width,
                height,
                bitmap_data.len()
            );
            return;
        }

        for row in 0..height {
            let dst_y = y + row;
            if dst_y >= self.height {
                break;
            }
            for col in 0..width {
                let dst_x = x + col;
                if dst_x >= self.width {
                    break;
                }
                let dst_idx = ((dst_y * self.width + dst_x) * 4) as usize;

                if is_rgba {
                    let src_idx = ((row * width + col) * 4) as usize;
                    self.data[dst_idx..dst_idx + 4]
                        .copy_from_slice(&bitmap_data[src_idx..src_idx + 4]);
                } else {
                    let alpha = bitmap_data[(row * width + col) as usize];
                    // White glyph with alpha.
                    self.data[dst_idx..dst_idx + 4].copy_from_slice(&[255, 255, 255, alpha]);
                }
            }
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
