use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

pub const NAME_COLOR: Rgba<u8> = Rgba([0x99, 0x99, 0x99, 0xff]);
pub const BUBBLE_COLOR: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
pub const TEXT_COLOR: Rgba<u8> = Rgba([0x33, 0x33, 0x33, 0xff]);

/// Source-over blend of `color` scaled by `coverage` into the pixel at
/// `(x, y)`. Out-of-bounds writes are ignored.
pub fn blend_pixel(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage <= 0.0 {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);
    let sa = color[3] as f32 / 255.0 * coverage;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    *dst = Rgba([
        blend(color[0], dst[0]),
        blend(color[1], dst[1]),
        blend(color[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]);
}

/// Draw `src` scaled to a `size`×`size` square at `(x, y)`, clipped to the
/// circle at `center` with `radius`. Edge pixels are anti-aliased by the
/// distance of their centre to the circle.
pub fn draw_circle_clipped(
    img: &mut RgbaImage,
    src: &RgbaImage,
    x: f32,
    y: f32,
    size: f32,
    center: (f32, f32),
    radius: f32,
) {
    let side = size.round().max(1.0) as u32;
    let scaled = image::imageops::resize(src, side, side, FilterType::Triangle);
    let origin_x = x.round() as i32;
    let origin_y = y.round() as i32;

    for (sx, sy, px) in scaled.enumerate_pixels() {
        let dx = origin_x + sx as i32;
        let dy = origin_y + sy as i32;
        let cx = dx as f32 + 0.5 - center.0;
        let cy = dy as f32 + 0.5 - center.1;
        let coverage = radius - (cx * cx + cy * cy).sqrt() + 0.5;
        blend_pixel(img, dx, dy, *px, coverage);
    }
}

/// Fill the rounded rectangle `(x, y, width, height)` with corner `radius`.
pub fn fill_round_rect(
    img: &mut RgbaImage,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    radius: f32,
    color: Rgba<u8>,
) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    let radius = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    let min_x = x.floor().max(0.0) as i32;
    let min_y = y.floor().max(0.0) as i32;
    let max_x = ((x + width).ceil() as i32).min(img.width() as i32);
    let max_y = ((y + height).ceil() as i32).min(img.height() as i32);

    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let center = (x + half_w, y + half_h);

    for py in min_y..max_y {
        for px in min_x..max_x {
            // Signed distance from the pixel centre to the rounded box.
            let qx = (px as f32 + 0.5 - center.0).abs() - (half_w - radius);
            let qy = (py as f32 + 0.5 - center.1).abs() - (half_h - radius);
            let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
            let inside = qx.max(qy).min(0.0);
            let distance = outside + inside - radius;
            blend_pixel(img, px, py, color, 0.5 - distance);
        }
    }
}
