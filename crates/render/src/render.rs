//! Board-to-image rendering.

use crate::{RenderError, Result};
use ab_glyph::{FontRef, PxScale};
use aperture_pack_core::{BoardView, Error as CoreError};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);

const CAPTION_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Canvas geometry and overlays.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Canvas side in pixels.
    pub canvas: u32,
    /// Pixels per meter.
    pub scale: f64,
    /// Distance from the canvas edge to the board outline, px.
    pub padding: u32,
    /// Caption glyph height, px.
    pub font_size: f32,
    /// Draw the λ/2 neighborhood circle.
    pub draw_circle: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            canvas: 600,
            scale: 1e3,
            padding: 50,
            font_size: 14.0,
            draw_circle: true,
        }
    }
}

impl RenderOptions {
    /// Sets whether the neighborhood circle is drawn.
    pub fn with_circle(mut self, draw_circle: bool) -> Self {
        self.draw_circle = draw_circle;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.canvas == 0 {
            return Err(RenderError::InvalidOptions("canvas must be non-empty".into()));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(RenderError::InvalidOptions(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(RenderError::InvalidOptions(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        Ok(())
    }
}

fn px(meters: f64, scale: f64) -> i32 {
    (meters * scale) as i32
}

/// Outline with both corners inclusive.
fn outline(img: &mut RgbImage, (x, y): (i32, i32), side: i32, color: Rgb<u8>) {
    let extent = (side.max(0) + 1) as u32;
    draw_hollow_rect_mut(img, Rect::at(x, y).of_size(extent, extent), color);
}

fn caption(view: &BoardView<'_>) -> String {
    format!(
        "obj_size: {}, num_of_objs: {}, sep_dist: {}",
        view.object_size,
        view.apertures.len(),
        view.separation_distance
    )
}

/// Centers the caption over the canvas with its baseline at `padding / 2`.
fn draw_caption(img: &mut RgbImage, text: &str, options: &RenderOptions) -> Result<()> {
    let font = FontRef::try_from_slice(CAPTION_FONT)?;
    let scale = PxScale::from(options.font_size);
    let (width, height) = text_size(scale, &font, text);

    let x = (options.canvas as i32 / 2 - width as i32 / 2).max(0);
    let y = (options.padding as i32 / 2 - height as i32).max(0);
    draw_text_mut(img, WHITE, x, y, scale, &font, text);
    Ok(())
}

/// Renders a board.
///
/// The aperture grid is centered inside the board outline, and the circle
/// (if enabled) is centered on the aperture closest to the board center.
pub fn render_board(view: &BoardView<'_>, options: &RenderOptions) -> Result<RgbImage> {
    options.validate()?;

    let extent_row = view
        .apertures
        .iter()
        .map(|a| a.max_row())
        .reduce(f64::max)
        .ok_or(CoreError::EmptyBoard)?;
    let extent_col = view
        .apertures
        .iter()
        .map(|a| a.max_col())
        .reduce(f64::max)
        .ok_or(CoreError::EmptyBoard)?;

    let scale = options.scale;
    let padding = options.padding as i32;
    let board_px = px(view.side, scale);

    let offset_row = padding + ((board_px - px(extent_row, scale)) / 2).max(0);
    let offset_col = padding + ((board_px - px(extent_col, scale)) / 2).max(0);

    let mut img = RgbImage::from_pixel(options.canvas, options.canvas, BLACK);

    outline(&mut img, (padding, padding), board_px, RED);

    let size_px = px(view.object_size, scale);
    for a in view.apertures {
        let top_left = (
            offset_col + px(a.bbox_col, scale),
            offset_row + px(a.bbox_row, scale),
        );
        outline(&mut img, top_left, size_px, GREEN);
    }

    draw_caption(&mut img, &caption(view), options)?;

    if options.draw_circle {
        if let Some(center) = view.central_aperture() {
            let (row, col) = center.center();
            draw_hollow_circle_mut(
                &mut img,
                (offset_col + px(col, scale), offset_row + px(row, scale)),
                px(view.wavelength / 2.0, scale),
                YELLOW,
            );
        }
    }

    Ok(img)
}

/// Writes `<stem>.png` and `<stem>_with_circle.png` into `dir`.
///
/// Returns the written paths, plain image first.
pub fn save_board(
    view: &BoardView<'_>,
    dir: &Path,
    stem: &str,
    options: &RenderOptions,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let plain = dir.join(format!("{stem}.png"));
    let circled = dir.join(format!("{stem}_with_circle.png"));

    render_board(view, &options.clone().with_circle(false))?.save(&plain)?;
    render_board(view, &options.clone().with_circle(true))?.save(&circled)?;

    log::info!(
        "Rendered board ({}) to {} and {}",
        caption(view),
        plain.display(),
        circled.display()
    );

    Ok(vec![plain, circled])
}

#[cfg(test)]
mod tests {
    use super::*;
    use aperture_pack_core::Board;

    #[test]
    fn test_board_outline_and_apertures() {
        let board = Board::new(0.05, 0.05).unwrap();
        let img = render_board(&board.view(), &RenderOptions::default().with_circle(false)).unwrap();

        assert_eq!(img.dimensions(), (600, 600));
        // Board outline corners
        assert_eq!(*img.get_pixel(50, 50), RED);
        assert_eq!(*img.get_pixel(550, 550), RED);

        // Grid spans 450 px of 500, so it is shifted by 25 px.
        assert_eq!(*img.get_pixel(75, 75), GREEN);
        assert_eq!(*img.get_pixel(125, 75), GREEN);
        assert!(img.pixels().all(|p| *p != YELLOW));
    }

    #[test]
    fn test_circle_overlay() {
        let board = Board::new(0.05, 0.05).unwrap();
        let view = board.view();

        let plain = render_board(&view, &RenderOptions::default().with_circle(false)).unwrap();
        let circled = render_board(&view, &RenderOptions::default()).unwrap();

        assert_ne!(plain, circled);
        assert!(circled.pixels().any(|p| *p == YELLOW));
    }

    #[test]
    fn test_caption_above_board() {
        let board = Board::new(0.05, 0.05).unwrap();
        let options = RenderOptions::default().with_circle(false);
        let img = render_board(&board.view(), &options).unwrap();

        let lit: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|(_, y, p)| *y < options.padding && **p != BLACK)
            .map(|(x, y, p)| {
                // Anti-aliased white stays grey.
                assert!(p[0] == p[1] && p[1] == p[2], "({x}, {y}) = {p:?}");
                (x, y)
            })
            .collect();

        assert!(img
            .enumerate_pixels()
            .any(|(_, y, p)| y < options.padding && p[0] > 128));

        let min_x = lit.iter().map(|&(x, _)| x).min().unwrap();
        let max_x = lit.iter().map(|&(x, _)| x).max().unwrap();
        let mid = (min_x + max_x) / 2;
        assert!((290..=310).contains(&mid), "caption spans {min_x}..{max_x}");
    }

    #[test]
    fn test_caption_text() {
        let board = Board::new(0.05, 0.05).unwrap();
        assert_eq!(
            caption(&board.view()),
            "obj_size: 0.05, num_of_objs: 25, sep_dist: 0.05"
        );
    }

    #[test]
    fn test_empty_board_is_rejected() {
        let board = Board::new(0.8, 0.1).unwrap();
        let err = render_board(&board.view(), &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::Board(CoreError::EmptyBoard)));
    }

    #[test]
    fn test_invalid_options() {
        let board = Board::new(0.05, 0.05).unwrap();
        let options = RenderOptions {
            scale: 0.0,
            ..RenderOptions::default()
        };
        assert!(matches!(
            render_board(&board.view(), &options),
            Err(RenderError::InvalidOptions(_))
        ));

        let options = RenderOptions {
            font_size: 0.0,
            ..RenderOptions::default()
        };
        assert!(matches!(
            render_board(&board.view(), &options),
            Err(RenderError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_save_board_writes_both_images() {
        let dir = std::env::temp_dir().join(format!("aperture-pack-render-{}", std::process::id()));
        let board = Board::new(0.05, 0.05).unwrap();

        let paths = save_board(&board.view(), &dir, "100", &RenderOptions::default()).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("100.png"));
        assert!(paths[1].ends_with("100_with_circle.png"));
        assert!(paths.iter().all(|p| p.exists()));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
