use crate::context_menu::{ActionOutcome, ActionRunner, Activation, MenuSession, Platform};
use crate::host::{AvatarSource, DesktopServices};
use crate::logging;
use crate::options::Options;
use crate::sticker::text::FontBook;
use crate::sticker::StickerComposer;
use anyhow::Result;
use std::path::PathBuf;

/// Everything one host window needs: the menu session plus the services and
/// fonts activations run against, all configured from [`Options`].
pub struct LiteTools<A> {
    session: MenuSession,
    services: DesktopServices,
    fonts: FontBook,
    avatars: A,
}

impl<A: AvatarSource> LiteTools<A> {
    /// Load options from `options_path`, initialise logging and resolve fonts
    /// against the installed system fonts.
    pub fn start(options_path: &str, log_file: Option<PathBuf>, avatars: A) -> Result<Self> {
        let options = Options::load(options_path)?;
        logging::init(options.debug_logging, log_file);
        tracing::info!(path = options_path, "options loaded");
        Ok(Self::new(options, Platform::current(), FontBook::system(), avatars))
    }

    pub fn new(options: Options, platform: Platform, fonts: FontBook, avatars: A) -> Self {
        let services = DesktopServices::new(options.sticker_dir());
        Self {
            session: MenuSession::new(options, platform),
            services,
            fonts,
            avatars,
        }
    }

    pub fn options(&self) -> &Options {
        self.session.options()
    }

    /// Apply edited options. Stickers go to the new output folder from the
    /// next activation on.
    pub fn set_options(&mut self, options: Options) {
        self.services = DesktopServices::new(options.sticker_dir());
        self.session.set_options(options);
    }

    pub fn session(&self) -> &MenuSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut MenuSession {
        &mut self.session
    }

    pub fn services(&self) -> &DesktopServices {
        &self.services
    }

    pub fn runner(&self) -> ActionRunner<'_, DesktopServices, A> {
        let high_resolution = self.options().message_to_image.high_resolution;
        let composer = StickerComposer::new(&self.avatars, &self.fonts, high_resolution);
        ActionRunner::new(&self.services, composer)
    }

    /// Run an activation returned by [`MenuSession::click`]. Failures are
    /// logged and yield `None`.
    pub async fn activate(&self, activation: &Activation) -> Option<ActionOutcome> {
        self.runner().run_logged(activation).await
    }
}
