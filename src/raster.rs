use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::PipelineError;
use crate::grid::{GRID_SIZE, PixelGrid};

pub const CELL_SIZE: u32 = 16;
pub const CANVAS_SIZE: u32 = GRID_SIZE as u32 * CELL_SIZE;

// Index-aligned with the grid's color domain. Index 0 stays unpainted
// during rendering even though the table defines a color for it.
pub const PALETTE: [Rgba<u8>; 6] = [
    Rgba([0xff, 0xff, 0xff, 0xff]), // 0 background
    Rgba([0x00, 0x00, 0x00, 0xff]), // 1 black outline
    Rgba([0xe7, 0x4c, 0x3c, 0xff]), // 2 red
    Rgba([0x34, 0x98, 0xdb, 0xff]), // 3 blue
    Rgba([0x2e, 0xcc, 0x71, 0xff]), // 4 green
    Rgba([0xf1, 0xc4, 0x0f, 0xff]), // 5 gold
];

const FALLBACK_COLOR: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

// One opaque cell fill on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOp {
    pub x: u32,
    pub y: u32,
    pub color: Rgba<u8>,
}

// Row-major sweep of the grid. Index 0 emits no fill; an out-of-range
// index paints the fallback color instead of failing the draw.
pub fn paint_ops(grid: &PixelGrid) -> Vec<FillOp> {
    let mut ops = Vec::new();
    for (row, cells) in grid.rows().iter().enumerate() {
        for (col, &index) in cells.iter().enumerate() {
            if index == 0 {
                continue;
            }
            let color = PALETTE
                .get(index as usize)
                .copied()
                .unwrap_or(FALLBACK_COLOR);
            ops.push(FillOp {
                x: col as u32 * CELL_SIZE,
                y: row as u32 * CELL_SIZE,
                color,
            });
        }
    }
    ops
}

// Full clear-then-redraw on every call. The surface is small and redraws
// are bounded by user-triggered generations, so no partial updates.
pub fn render(grid: &PixelGrid) -> RgbaImage {
    let mut canvas = RgbaImage::new(CANVAS_SIZE, CANVAS_SIZE);
    for op in paint_ops(grid) {
        for y in op.y..op.y + CELL_SIZE {
            for x in op.x..op.x + CELL_SIZE {
                canvas.put_pixel(x, y, op.color);
            }
        }
    }
    canvas
}

pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, PipelineError> {
    let mut buffer = Cursor::new(Vec::new());
    canvas
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| PipelineError::ExportFailed(e.to_string()))?;
    Ok(buffer.into_inner())
}

pub fn data_url(canvas: &RgbaImage) -> Result<String, PipelineError> {
    let png = encode_png(canvas)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

// Download name from the originating prompt, whitespace collapsed to
// underscores, with a fixed fallback for an empty prompt
pub fn download_name(prompt: &str) -> String {
    let slug = prompt.split_whitespace().collect::<Vec<_>>().join("_");
    if slug.is_empty() {
        "pixel_art".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid;
    use serde_json::{Value, json};

    fn validated(value: &Value) -> PixelGrid {
        grid::validate(value).unwrap()
    }

    fn zeros() -> Value {
        Value::Array(vec![Value::Array(vec![json!(0); GRID_SIZE]); GRID_SIZE])
    }

    fn diagonal(index: u8) -> Value {
        let rows: Vec<Value> = (0..GRID_SIZE)
            .map(|r| {
                let row: Vec<Value> = (0..GRID_SIZE)
                    .map(|c| if r == c { json!(index) } else { json!(0) })
                    .collect();
                Value::Array(row)
            })
            .collect();
        Value::Array(rows)
    }

    #[test]
    fn all_zero_grid_emits_no_fills() {
        assert!(paint_ops(&validated(&zeros())).is_empty());
    }

    #[test]
    fn one_fill_per_non_zero_cell() {
        let ops = paint_ops(&validated(&diagonal(2)));
        assert_eq!(ops.len(), GRID_SIZE);
        for (i, op) in ops.iter().enumerate() {
            assert_eq!(op.x, i as u32 * CELL_SIZE);
            assert_eq!(op.y, i as u32 * CELL_SIZE);
            assert_eq!(op.color, PALETTE[2]);
        }
    }

    #[test]
    fn out_of_range_index_falls_back_to_white() {
        let mut rows = vec![vec![0u8; GRID_SIZE]; GRID_SIZE];
        rows[0][0] = 9;
        let grid = PixelGrid::from_rows(rows).unwrap();

        let ops = paint_ops(&grid);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].color, FALLBACK_COLOR);
    }

    #[test]
    fn render_paints_full_cells_and_leaves_background_clear() {
        let canvas = render(&validated(&diagonal(3)));
        assert_eq!(canvas.dimensions(), (CANVAS_SIZE, CANVAS_SIZE));

        // inside the first diagonal cell
        assert_eq!(*canvas.get_pixel(0, 0), PALETTE[3]);
        assert_eq!(*canvas.get_pixel(15, 15), PALETTE[3]);
        // off-diagonal stays transparent
        assert_eq!(*canvas.get_pixel(16, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn rendering_twice_is_identical() {
        let grid = validated(&diagonal(5));
        assert_eq!(render(&grid).as_raw(), render(&grid).as_raw());
    }

    #[test]
    fn png_export_produces_a_png() {
        let png = encode_png(&render(&validated(&diagonal(1)))).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn data_url_is_embedded_png() {
        let url = data_url(&render(&validated(&zeros()))).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn download_name_slugs_the_prompt() {
        assert_eq!(download_name("cyberpunk  katana "), "cyberpunk_katana");
        assert_eq!(download_name("fox"), "fox");
        assert_eq!(download_name("   "), "pixel_art");
        assert_eq!(download_name(""), "pixel_art");
    }
}
