use crate::error::{StampError, StampResult};
use crate::intake::FileInput;
use crate::options::{WatermarkKind, WatermarkRequest};
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Base64 data URL ("data:<mime>;base64,<payload>")
pub type DataUrl = String;

/// Full-canvas tint, rgba(120, 200, 255, 0.1)
const TINT_RGB: [u8; 3] = [120, 200, 255];
const TINT_ALPHA: f32 = 0.1;

/// Faint text mark, rgba(255, 255, 255, 0.15) anchored at (20, 40)
const MARK_ALPHA: f32 = 0.15;
const MARK_ORIGIN: (u32, u32) = (20, 40);

/// Encode raw bytes as a data URL
pub fn data_url(mime: &str, bytes: &[u8]) -> DataUrl {
    format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Draw the illustrative overlay onto an image and export it as a PNG data URL
///
/// Presentation only, not part of any security guarantee: a translucent tint
/// across the whole canvas, plus a faint mark derived from the watermark text
/// for text-kind requests. Exports as PNG regardless of the input format.
pub fn render(file: &FileInput, request: &WatermarkRequest) -> StampResult<DataUrl> {
    let decoded = image::load_from_memory(&file.bytes)
        .map_err(|e| StampError::OverlayDecodeFailed(e.to_string()))?;
    let mut canvas = decoded.to_rgba8();

    tint_canvas(&mut canvas);

    if request.watermark_kind == WatermarkKind::Text {
        if let Some(text) = request.text.as_deref() {
            stamp_text_mark(&mut canvas, text);
        }
    }

    let mut png_data = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png)
        .map_err(|e| StampError::OverlayEncodeFailed(e.to_string()))?;

    Ok(data_url("image/png", &png_data))
}

fn blend(dst: u8, src: u8, alpha: f32) -> u8 {
    (dst as f32 * (1.0 - alpha) + src as f32 * alpha).round() as u8
}

fn tint_canvas(canvas: &mut RgbaImage) {
    for pixel in canvas.pixels_mut() {
        for (channel, tint) in pixel.0.iter_mut().take(3).zip(TINT_RGB) {
            *channel = blend(*channel, tint, TINT_ALPHA);
        }
    }
}

/// Stamp the text as a faint per-bit dot column per byte (the stack has no
/// font rasterizer; position and opacity follow the text mark this stands for)
fn stamp_text_mark(canvas: &mut RgbaImage, text: &str) {
    let (origin_x, origin_y) = MARK_ORIGIN;
    for (i, byte) in text.bytes().enumerate() {
        let x = origin_x + (i as u32) * 2;
        for bit in 0..8u32 {
            if byte & (1 << bit) == 0 {
                continue;
            }
            let y = origin_y + bit;
            if x < canvas.width() && y < canvas.height() {
                let pixel = canvas.get_pixel_mut(x, y);
                for channel in pixel.0.iter_mut().take(3) {
                    *channel = blend(*channel, 255, MARK_ALPHA);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TransformAlgorithm;
    use image::Rgba;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let canvas = RgbaImage::from_pixel(width, height, Rgba([100, 100, 100, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn image_request(text: Option<&str>) -> WatermarkRequest {
        WatermarkRequest {
            watermark_kind: if text.is_some() {
                WatermarkKind::Text
            } else {
                WatermarkKind::Image
            },
            text: text.map(|t| t.to_string()),
            algorithm: TransformAlgorithm::Dct,
            anchor_to_ledger: false,
            ar_enabled: false,
            ar_link: None,
            file_name: "photo.png".to_string(),
            file_mime: "image/png".to_string(),
        }
    }

    fn decode_data_url(url: &str) -> RgbaImage {
        let b64 = url.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = general_purpose::STANDARD.decode(b64).unwrap();
        image::load_from_memory(&bytes).unwrap().to_rgba8()
    }

    #[test]
    fn test_data_url_encoding() {
        assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_render_tints_every_pixel() {
        let file = FileInput::new("photo.png", "image/png", png_bytes(8, 8));

        let url = render(&file, &image_request(None)).unwrap();
        let output = decode_data_url(&url);

        // blend(100, tint, 0.1) per channel; alpha untouched
        assert_eq!(*output.get_pixel(0, 0), Rgba([102, 110, 116, 255]));
        assert_eq!(*output.get_pixel(7, 7), Rgba([102, 110, 116, 255]));
    }

    #[test]
    fn test_text_mark_brightens_pixels_at_origin() {
        let file = FileInput::new("photo.png", "image/png", png_bytes(64, 64));

        let plain = decode_data_url(&render(&file, &image_request(None)).unwrap());
        let marked = decode_data_url(&render(&file, &image_request(Some("A"))).unwrap());

        // 'A' = 0x41: bits 0 and 6 set
        let (x, y) = MARK_ORIGIN;
        assert!(marked.get_pixel(x, y).0[0] > plain.get_pixel(x, y).0[0]);
        assert!(marked.get_pixel(x, y + 6).0[0] > plain.get_pixel(x, y + 6).0[0]);
        assert_eq!(marked.get_pixel(x, y + 1), plain.get_pixel(x, y + 1));
    }

    #[test]
    fn test_mark_outside_canvas_is_skipped() {
        let file = FileInput::new("tiny.png", "image/png", png_bytes(4, 4));

        let url = render(&file, &image_request(Some("Confidential"))).unwrap();
        let output = decode_data_url(&url);

        assert_eq!(output.dimensions(), (4, 4));
    }

    #[test]
    fn test_render_rejects_undecodable_bytes() {
        let file = FileInput::new("broken.png", "image/png", vec![1, 2, 3, 4]);

        let result = render(&file, &image_request(None));
        assert!(matches!(result, Err(StampError::OverlayDecodeFailed(_))));
    }

    #[test]
    fn test_render_always_exports_png() {
        let file = FileInput::new("photo.jpg", "image/jpeg", png_bytes(8, 8));

        let url = render(&file, &image_request(None)).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }
}
