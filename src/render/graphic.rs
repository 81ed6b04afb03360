use std::io::Cursor;

use ab_glyph::{FontVec, PxScale};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use tracing::debug;

use crate::error::Result;
use crate::rating::{AlbumSummary, RatingCategory};
use crate::render::fonts::Fonts;
use crate::render::layout::{
    self, ALBUM_BLOCK, ALBUM_TEXT, ARTIST_BLOCK, ARTIST_TEXT, BORDER_WIDTH, Block, CANVAS_SIZE,
    COVER_BLOCK, COVER_THUMB_SIZE, LEGEND_TEXT_X, RATING_BLOCK, RATING_TEXT, TRACK_BADGE_X,
    TRACK_TEXT_X,
};

const BACKGROUND_BLUR_SIGMA: f32 = 20.0;

const HEADER_SIZE: f32 = 24.0;
const TRACK_SIZE: f32 = 20.0;
const STROKE_WIDTH: i32 = 2;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const MOCCASIN: Rgb<u8> = Rgb([0xFF, 0xE4, 0xB5]);
const LEMON_CHIFFON: Rgb<u8> = Rgb([0xFF, 0xFA, 0xCD]);
const LAVENDER: Rgb<u8> = Rgb([0xE6, 0xE6, 0xFA]);
const FALLBACK_BACKGROUND: Rgb<u8> = Rgb([0x20, 0x20, 0x20]);

fn category_color(category: RatingCategory) -> Rgb<u8> {
    Rgb(category.rgb())
}

/// Composes the rating graphic from an album summary.
pub struct Renderer {
    fonts: Fonts,
}

impl Renderer {
    pub fn new(fonts: Fonts) -> Self {
        Self { fonts }
    }

    /// Draw the graphic. `cover` supplies both the blurred backdrop and the
    /// thumbnail; without one the backdrop is a flat dark fill.
    pub fn render(&self, summary: &AlbumSummary, cover: Option<&DynamicImage>) -> RgbImage {
        let mut canvas = match cover {
            Some(cover) => blurred_background(cover),
            None => RgbImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, FALLBACK_BACKGROUND),
        };

        self.draw_header(&mut canvas, summary);

        if let Some(cover) = cover {
            let thumbnail = cover
                .resize_exact(COVER_THUMB_SIZE, COVER_THUMB_SIZE, FilterType::Lanczos3)
                .to_rgb8();
            imageops::overlay(&mut canvas, &thumbnail, COVER_BLOCK.x as i64, COVER_BLOCK.y as i64);
        }
        draw_border(&mut canvas, COVER_BLOCK);

        self.draw_average(&mut canvas, summary);
        self.draw_tracklist(&mut canvas, summary);
        self.draw_legend(&mut canvas);

        canvas
    }

    /// Render and encode as PNG, decoding `cover_bytes` first when present.
    pub fn render_png(
        &self,
        summary: &AlbumSummary,
        cover_bytes: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        let cover = cover_bytes.map(decode_cover).transpose()?;
        let image = self.render(summary, cover.as_ref());
        encode_png(&image)
    }

    fn draw_header(&self, canvas: &mut RgbImage, summary: &AlbumSummary) {
        draw_box(canvas, ARTIST_BLOCK, MOCCASIN);
        if let Some(font) = self.fonts.face() {
            draw_stroked_text(canvas, ARTIST_TEXT, HEADER_SIZE, font, &summary.artist);
        }

        draw_box(canvas, ALBUM_BLOCK, LEMON_CHIFFON);
        self.text(canvas, ALBUM_TEXT, HEADER_SIZE, &summary.album);
    }

    fn draw_average(&self, canvas: &mut RgbImage, summary: &AlbumSummary) {
        draw_box(canvas, RATING_BLOCK, LAVENDER);
        let label = format!("Rating: {}/10", summary.rounded_average());
        self.text(canvas, RATING_TEXT, HEADER_SIZE, &label);
    }

    fn draw_tracklist(&self, canvas: &mut RgbImage, summary: &AlbumSummary) {
        let rows = layout::track_rows(summary.tracks.len());
        debug!(
            "Laying out {} tracks at {}px per row",
            rows.len(),
            layout::row_height(summary.tracks.len())
        );

        for (i, (track, row)) in summary.tracks.iter().zip(rows).enumerate() {
            draw_box(canvas, row, category_color(track.category()));

            let label = format!("{}. {}", i + 1, track.name);
            self.text(canvas, (TRACK_TEXT_X, row.y), TRACK_SIZE, &label);

            if track.rating.best {
                self.text(canvas, (TRACK_BADGE_X, row.y), HEADER_SIZE, "Best Song");
            } else if track.rating.worst {
                self.text(canvas, (TRACK_BADGE_X, row.y), HEADER_SIZE, "Worst Song");
            }
        }
    }

    fn draw_legend(&self, canvas: &mut RgbImage) {
        for (i, category) in RatingCategory::ALL.into_iter().enumerate() {
            let swatch = layout::legend_row(i);
            draw_box(canvas, swatch, category_color(category));

            let label = format!("{}: {}", category.label(), category.band());
            self.text(canvas, (LEGEND_TEXT_X, swatch.y + 5), HEADER_SIZE, &label);
        }
    }

    fn text(&self, canvas: &mut RgbImage, (x, y): (i32, i32), size: f32, text: &str) {
        if let Some(font) = self.fonts.face() {
            draw_text_mut(canvas, BLACK, x, y, PxScale::from(size), font, text);
        }
    }
}

fn blurred_background(cover: &DynamicImage) -> RgbImage {
    let resized = cover
        .resize_exact(CANVAS_SIZE, CANVAS_SIZE, FilterType::Triangle)
        .to_rgb8();
    imageops::fast_blur(&resized, BACKGROUND_BLUR_SIGMA)
}

/// Filled block with a black border drawn inside its edge.
fn draw_box(canvas: &mut RgbImage, block: Block, fill: Rgb<u8>) {
    draw_filled_rect_mut(canvas, block.rect(), fill);
    draw_border(canvas, block);
}

fn draw_border(canvas: &mut RgbImage, block: Block) {
    for i in 0..BORDER_WIDTH {
        let ring = block.inset(i);
        if ring.width == 0 || ring.height == 0 {
            break;
        }
        draw_hollow_rect_mut(canvas, ring.rect(), BLACK);
    }
}

fn draw_stroked_text(
    canvas: &mut RgbImage,
    (x, y): (i32, i32),
    size: f32,
    font: &FontVec,
    text: &str,
) {
    let scale = PxScale::from(size);

    for dx in -STROKE_WIDTH..=STROKE_WIDTH {
        for dy in -STROKE_WIDTH..=STROKE_WIDTH {
            if dx != 0 || dy != 0 {
                draw_text_mut(canvas, BLACK, x + dx, y + dy, scale, font, text);
            }
        }
    }
    draw_text_mut(canvas, WHITE, x, y, scale, font, text);
}

pub fn decode_cover(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::{RatedTrack, TrackRating};
    use crate::render::layout::{LEGEND_TOP, TRACKLIST_TOP};

    fn summary(ratings: &[TrackRating]) -> AlbumSummary {
        AlbumSummary {
            artist: "X".into(),
            album: "Y".into(),
            cover_url: None,
            tracks: ratings
                .iter()
                .enumerate()
                .map(|(i, r)| RatedTrack {
                    name: format!("Track {}", i + 1),
                    rating: *r,
                })
                .collect(),
        }
    }

    fn cover() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([200, 30, 90])))
    }

    #[test]
    fn test_canvas_is_fixed_size() {
        let renderer = Renderer::new(Fonts::none());
        let image = renderer.render(&summary(&[TrackRating::default()]), Some(&cover()));
        assert_eq!(image.dimensions(), (CANVAS_SIZE, CANVAS_SIZE));
    }

    #[test]
    fn test_rows_are_filled_with_category_color() {
        let renderer = Renderer::new(Fonts::none());
        let ratings = [
            TrackRating::scored(9.5).unwrap(),
            TrackRating::scored(1.0).unwrap(),
            TrackRating::skit(),
        ];
        let image = renderer.render(&summary(&ratings), None);

        let height = layout::row_height(3) as i32;
        for (i, rating) in ratings.iter().enumerate() {
            let y = (TRACKLIST_TOP + i as i32 * height + 10) as u32;
            assert_eq!(
                *image.get_pixel(300, y),
                category_color(rating.category()),
                "row {}",
                i
            );
        }
    }

    #[test]
    fn test_row_border_is_black() {
        let renderer = Renderer::new(Fonts::none());
        let image = renderer.render(&summary(&[TrackRating::default()]), None);

        assert_eq!(*image.get_pixel(30, TRACKLIST_TOP as u32 + 20), BLACK);
        assert_eq!(*image.get_pixel(32, TRACKLIST_TOP as u32 + 20), BLACK);
    }

    #[test]
    fn test_legend_lists_every_category() {
        let renderer = Renderer::new(Fonts::none());
        let image = renderer.render(&summary(&[]), None);

        for (i, category) in RatingCategory::ALL.into_iter().enumerate() {
            let y = (LEGEND_TOP + i as i32 * 40 + 15) as u32;
            assert_eq!(*image.get_pixel(650, y), category_color(category));
        }
    }

    #[test]
    fn test_rating_box_and_thumbnail() {
        let renderer = Renderer::new(Fonts::none());
        let image = renderer.render(&summary(&[TrackRating::default()]), Some(&cover()));

        assert_eq!(*image.get_pixel(740, 290), LAVENDER);
        assert_eq!(*image.get_pixel(650, 140), Rgb([200, 30, 90]));
        assert_eq!(*image.get_pixel(550, 140), BLACK);
    }

    #[test]
    fn test_png_round_trip_dimensions() {
        let renderer = Renderer::new(Fonts::none());
        let cover_png = encode_png(&cover().to_rgb8()).unwrap();

        let png = renderer
            .render_png(&summary(&[TrackRating::default()]), Some(&cover_png))
            .unwrap();

        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (CANVAS_SIZE, CANVAS_SIZE));
    }

    #[test]
    fn test_undecodable_cover_is_an_error() {
        let renderer = Renderer::new(Fonts::none());
        let result = renderer.render_png(&summary(&[]), Some(b"not an image"));
        assert!(result.is_err());
    }
}
