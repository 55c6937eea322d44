use ab_glyph::{point, Font, FontArc, FontVec, PxScale, ScaleFont};
use eframe::egui;
use fontdb::{Database, Family, Query};
use image::{Rgba, RgbaImage};
use unicode_segmentation::UnicodeSegmentation;

use crate::sticker::raster::blend_pixel;

/// Resolves CSS `font-family` lists to loaded fonts.
///
/// System fonts are looked up through `fontdb`; when nothing matches the
/// proportional font bundled with egui is used.
pub struct FontBook {
    db: Database,
    bundled: Option<FontArc>,
}

impl FontBook {
    /// Only the bundled font. Rendering is identical on every machine.
    pub fn bundled() -> Self {
        Self {
            db: Database::new(),
            bundled: bundled_font(),
        }
    }

    /// Bundled font plus every font installed on the system.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self {
            db,
            bundled: bundled_font(),
        }
    }

    pub fn resolve(&self, css_family: &str) -> Option<FontArc> {
        for name in parse_family_list(css_family) {
            let family = match generic_family(&name) {
                Some(generic) => generic,
                None => Family::Name(&name),
            };
            let query = Query {
                families: &[family],
                ..Query::default()
            };
            let Some(id) = self.db.query(&query) else {
                continue;
            };
            let loaded = self.db.with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index).ok()
            });
            if let Some(Some(font)) = loaded {
                return Some(FontArc::from(font));
            }
            tracing::warn!("font '{name}' matched but could not be parsed");
        }
        self.bundled.clone()
    }
}

fn bundled_font() -> Option<FontArc> {
    let definitions = egui::FontDefinitions::default();
    let family = definitions
        .families
        .get(&egui::FontFamily::Proportional)?;
    let font_name = family.first()?;
    let data = definitions.font_data.get(font_name)?;
    FontVec::try_from_vec_and_index(data.font.to_vec(), data.index)
        .map(FontArc::from)
        .ok()
}

/// Split a CSS family list into unquoted names.
pub fn parse_family_list(css: &str) -> Vec<String> {
    css.split(',')
        .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn generic_family(name: &str) -> Option<Family<'static>> {
    match name.to_ascii_lowercase().as_str() {
        "sans-serif" | "system-ui" | "ui-sans-serif" => Some(Family::SansSerif),
        "serif" | "ui-serif" => Some(Family::Serif),
        "monospace" | "ui-monospace" => Some(Family::Monospace),
        "cursive" => Some(Family::Cursive),
        "fantasy" => Some(Family::Fantasy),
        _ => None,
    }
}

/// Scale at which one em spans `px` pixels, as CSS font sizes do.
fn em_scale(font: &FontArc, px: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(px * font.height_unscaled() / upem),
        _ => PxScale::from(px),
    }
}

/// Advance width of `text` at font size `px`, kerning included.
pub fn measure(font: &FontArc, text: &str, px: f32) -> f32 {
    let scaled = font.as_scaled(em_scale(font, px));
    let mut width = 0.0;
    let mut previous = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

/// Draw `text` with its alphabetic baseline at `(x, baseline)`.
pub fn fill_text(
    img: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    x: f32,
    baseline: f32,
    px: f32,
    color: Rgba<u8>,
) {
    if text.is_empty() {
        return;
    }
    let scaled = font.as_scaled(em_scale(font, px));
    let mut caret = point(x, baseline);
    let mut previous = None;
    for ch in text.chars() {
        let mut glyph = scaled.scaled_glyph(ch);
        if let Some(prev) = previous {
            caret.x += scaled.kern(prev, glyph.id);
        }
        glyph.position = caret;
        caret.x += scaled.h_advance(glyph.id);
        previous = Some(glyph.id);
        if let Some(outlined) = scaled.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = gx as i32 + bounds.min.x as i32;
                let py = gy as i32 + bounds.min.y as i32;
                blend_pixel(img, px, py, color, coverage);
            });
        }
    }
}

/// Break `text` into lines no wider than `max_width` at font size `px`.
///
/// Breaks fall on Unicode word boundaries, so latin words stay whole and
/// ideographs may break between any two characters. Words wider than a line
/// break between grapheme clusters and `\n` always starts a new line.
pub fn wrap_lines(font: &FontArc, text: &str, max_width: f32, px: f32) -> Vec<String> {
    let fits = |line: &str| measure(font, line.trim_end(), px) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for token in tokenize(paragraph) {
            let candidate = format!("{line}{token}");
            if fits(&candidate) {
                line = candidate;
                continue;
            }
            if !line.trim().is_empty() {
                lines.push(line.trim_end().to_string());
                line.clear();
            }
            if fits(token) {
                line = token.to_string();
                continue;
            }
            for grapheme in token.graphemes(true) {
                let candidate = format!("{line}{grapheme}");
                if !line.is_empty() && !fits(&candidate) {
                    lines.push(line.trim_end().to_string());
                    line.clear();
                }
                line.push_str(grapheme);
            }
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// Wrap and draw `text`; the first baseline sits at `y` and each following
/// line `line_height` lower. Returns the number of lines drawn.
#[allow(clippy::too_many_arguments)]
pub fn wrap_text(
    img: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    x: f32,
    y: f32,
    max_width: f32,
    line_height: f32,
    px: f32,
    color: Rgba<u8>,
) -> usize {
    let lines = wrap_lines(font, text, max_width, px);
    for (i, line) in lines.iter().enumerate() {
        fill_text(img, font, line, x, y + line_height * i as f32, px, color);
    }
    lines.len()
}

/// Split a paragraph at word boundaries. Whitespace runs stay attached to
/// the word before them so a line never starts with a space.
fn tokenize(paragraph: &str) -> Vec<&str> {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    for (start, segment) in paragraph.split_word_bound_indices() {
        let end = start + segment.len();
        match spans.last_mut() {
            Some(last) if segment.trim().is_empty() => last.1 = end,
            _ => spans.push((start, end)),
        }
    }
    spans
        .into_iter()
        .map(|(start, end)| &paragraph[start..end])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> FontArc {
        FontBook::bundled().resolve("sans").expect("bundled font")
    }

    #[test]
    fn family_list_is_unquoted() {
        assert_eq!(
            parse_family_list(r#""Microsoft YaHei", 'PingFang SC', sans-serif"#),
            vec!["Microsoft YaHei", "PingFang SC", "sans-serif"]
        );
        assert!(parse_family_list(" , ").is_empty());
    }

    #[test]
    fn tokenizer_keeps_words_and_splits_cjk() {
        assert_eq!(tokenize("hello big world"), vec!["hello ", "big ", "world"]);
        assert_eq!(tokenize("你好abc"), vec!["你", "好", "abc"]);
        assert_eq!(tokenize("a  b"), vec!["a  ", "b"]);
    }

    #[test]
    fn combining_marks_stay_with_their_base() {
        let font = font();
        let max = measure(&font, "e", 14.0) + 0.1;
        let lines = wrap_lines(&font, "e\u{301}e\u{301}e\u{301}", max, 14.0);
        assert_eq!(lines, vec!["e\u{301}"; 3]);

        let thai = "สวัสดีครับสวัสดีครับ";
        let lines = wrap_lines(&font, thai, measure(&font, "สวั", 14.0), 14.0);
        assert_eq!(lines.concat(), thai);
        for line in &lines {
            let first = line.graphemes(true).next().unwrap_or_default();
            assert!(thai.graphemes(true).any(|g| g == first), "{line:?}");
            assert!(!line.starts_with('\u{e31}') && !line.starts_with('\u{e35}'));
        }
    }

    #[test]
    fn measure_grows_with_text() {
        let font = font();
        let one = measure(&font, "a", 14.0);
        let three = measure(&font, "aaa", 14.0);
        assert!(one > 0.0);
        assert!(three > one * 2.5);
        assert!(measure(&font, "aaa", 28.0) > three * 1.9);
        assert_eq!(measure(&font, "", 14.0), 0.0);
    }

    #[test]
    fn wrap_respects_width_and_newlines() {
        let font = font();
        let word = measure(&font, "word", 14.0);
        let lines = wrap_lines(&font, "word word word", word * 2.5, 14.0);
        assert_eq!(lines, vec!["word word", "word"]);

        let lines = wrap_lines(&font, "a\nb", 1000.0, 14.0);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn overlong_word_breaks_between_characters() {
        let font = font();
        let max = measure(&font, "abcd", 14.0);
        let lines = wrap_lines(&font, "abcdefgh", max, 14.0);
        assert!(lines.len() >= 2);
        assert_eq!(lines.concat(), "abcdefgh");
        for line in &lines {
            assert!(measure(&font, line, 14.0) <= max + 0.01);
        }
    }

    #[test]
    fn fill_text_marks_pixels_near_baseline() {
        let font = font();
        let mut img = RgbaImage::new(60, 30);
        fill_text(&mut img, &font, "Hi", 2.0, 20.0, 16.0, Rgba([0, 0, 0, 255]));
        let painted = img.pixels().filter(|p| p[3] > 0).count();
        assert!(painted > 10);
        let below = (22..30)
            .flat_map(|y| (0..60).map(move |x| (x, y)))
            .filter(|(x, y)| img.get_pixel(*x, *y)[3] > 0)
            .count();
        assert_eq!(below, 0);
    }
}
