use crate::host::AvatarSource;
use crate::sticker::layout::*;
use crate::sticker::raster::{
    draw_circle_clipped, fill_round_rect, BUBBLE_COLOR, NAME_COLOR, TEXT_COLOR,
};
use crate::sticker::text::{self, FontBook};
use crate::sticker::StickerSpec;
use anyhow::{anyhow, Context, Result};
use image::{ColorType, ImageEncoder, RgbaImage};
use std::collections::HashSet;

/// Renders [`StickerSpec`]s into PNG bytes.
pub struct StickerComposer<'a, A> {
    avatars: &'a A,
    fonts: &'a FontBook,
    high_resolution: bool,
}

impl<'a, A: AvatarSource> StickerComposer<'a, A> {
    pub fn new(avatars: &'a A, fonts: &'a FontBook, high_resolution: bool) -> Self {
        Self {
            avatars,
            fonts,
            high_resolution,
        }
    }

    pub async fn compose(&self, spec: &StickerSpec) -> Result<Vec<u8>> {
        let img = self.render(spec).await?;
        encode_png(&img)
    }

    pub async fn render(&self, spec: &StickerSpec) -> Result<RgbaImage> {
        let avatar = self.load_avatar(&spec.user_uid).await?;
        let font = self
            .fonts
            .resolve(&spec.font_family)
            .ok_or_else(|| anyhow!("no font available for '{}'", spec.font_family))?;

        let name_width = text::measure(&font, &spec.user_name, NAME_FONT_SIZE);
        let layout = StickerLayout::compute(spec, name_width, StickerLayout::zoom_for(self.high_resolution));
        let (width, height) = layout.pixel_size();
        tracing::debug!(?layout, width, height, "sticker layout");

        let z = |v: f32| layout.scale(v);
        let mut img = RgbaImage::new(width, height);

        draw_circle_clipped(
            &mut img,
            &avatar,
            z(AVATAR_OFFSET),
            z(AVATAR_OFFSET),
            z(AVATAR_SIZE),
            (z(AVATAR_CENTER), z(AVATAR_CENTER)),
            z(AVATAR_RADIUS),
        );
        text::fill_text(
            &mut img,
            &font,
            &spec.user_name,
            z(NAME_X),
            z(NAME_BASELINE),
            z(NAME_FONT_SIZE),
            NAME_COLOR,
        );
        fill_round_rect(
            &mut img,
            z(BUBBLE_X),
            z(BUBBLE_Y),
            z(spec.width + BUBBLE_PADDING_X),
            z(spec.height + BUBBLE_PADDING_Y),
            z(BUBBLE_RADIUS),
            BUBBLE_COLOR,
        );
        text::wrap_text(
            &mut img,
            &font,
            &spec.content,
            z(TEXT_X),
            z(TEXT_BASELINE),
            z(spec.width + TEXT_WRAP_SLACK),
            z(TEXT_LINE_HEIGHT),
            z(TEXT_FONT_SIZE),
            TEXT_COLOR,
        );
        Ok(img)
    }

    async fn load_avatar(&self, uid: &str) -> Result<RgbaImage> {
        let uids = HashSet::from([uid.to_string()]);
        let avatars = self
            .avatars
            .fetch_avatars(&uids)
            .await
            .context("fetch avatar")?;
        let path = avatars
            .get(uid)
            .ok_or_else(|| anyhow!("no avatar resolved for {uid}"))?;
        match image::open(path) {
            Ok(img) => Ok(img.to_rgba8()),
            Err(e) => {
                tracing::error!("failed to decode avatar {}: {e}", path.display());
                Err(anyhow!(e).context(format!("decode avatar {}", path.display())))
            }
        }
    }
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)
        .context("encode sticker png")?;
    Ok(bytes)
}
