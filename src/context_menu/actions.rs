use crate::context_menu::entries::{Activation, MenuAction};
use crate::host::{AvatarSource, HostServices};
use crate::sticker::save::sticker_file_name;
use crate::sticker::StickerComposer;
use anyhow::{anyhow, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Opened(String),
    Copied(PathBuf),
    Saved(PathBuf),
    /// Nothing to do, e.g. a submenu click that missed every row.
    Skipped,
}

/// Performs the side effect behind an [`Activation`].
pub struct ActionRunner<'a, S, A> {
    services: &'a S,
    composer: StickerComposer<'a, A>,
}

impl<'a, S: HostServices, A: AvatarSource> ActionRunner<'a, S, A> {
    pub fn new(services: &'a S, composer: StickerComposer<'a, A>) -> Self {
        Self { services, composer }
    }

    pub async fn run(&self, activation: &Activation) -> Result<ActionOutcome> {
        match &activation.action {
            MenuAction::OpenUrl(url) => {
                self.services.open_in_browser(url)?;
                tracing::info!("opened {url}");
                Ok(ActionOutcome::Opened(url.clone()))
            }
            MenuAction::SaveToFolder { source } => {
                let Some(folder) = activation
                    .item
                    .as_ref()
                    .and_then(|item| item.payload.get("path"))
                    .and_then(|path| path.as_str())
                else {
                    tracing::debug!("save activation without destination folder");
                    return Ok(ActionOutcome::Skipped);
                };
                let dest = destination_in(folder, source)?;
                self.services.copy_file(source, &dest)?;
                tracing::info!("copied {} to {}", source.display(), dest.display());
                Ok(ActionOutcome::Copied(dest))
            }
            MenuAction::ComposeSticker(spec) => {
                let bytes = self.composer.compose(spec).await?;
                let path = self
                    .services
                    .save_image_bytes(&sticker_file_name(Local::now()), &bytes)?;
                tracing::info!("saved sticker to {}", path.display());
                Ok(ActionOutcome::Saved(path))
            }
        }
    }

    /// Run and swallow failures; they are logged, never surfaced to the host.
    pub async fn run_logged(&self, activation: &Activation) -> Option<ActionOutcome> {
        match self.run(activation).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!("menu action failed: {e:#}");
                None
            }
        }
    }
}

fn destination_in(folder: &str, source: &Path) -> Result<PathBuf> {
    let name = source
        .file_name()
        .ok_or_else(|| anyhow!("{} has no file name", source.display()))?;
    Ok(Path::new(folder).join(name))
}
