use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::blocking::Client;

use crate::engine::collaborator::{CancelToken, CollaboratorError, ImageCollaborator, RequestId};
use crate::engine::prompt_builder::PromptBuilder;
use crate::model::game_state::PortraitRef;
use crate::model::phase::GamePhase;
use crate::ui::settings::{ImageSettings, Settings};

const SEED_RANGE: std::ops::Range<u32> = 0..100_000;

/// Image collaborator backed by the Pollinations URL API. Every call rolls a
/// fresh seed, so the cache upstream is what makes portraits stable.
pub struct PollinationsClient {
    settings: ImageSettings,
    rng: StdRng,
    client: Option<Client>,
}

impl PollinationsClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, CollaboratorError> {
        let client = if settings.image.verify {
            Some(
                Client::builder()
                    .timeout(settings.request_timeout())
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            settings: settings.image.clone(),
            rng: StdRng::from_entropy(),
            client,
        })
    }

    /// URL-only client with a fixed seed sequence.
    pub fn seeded(settings: ImageSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: StdRng::seed_from_u64(seed),
            client: None,
        }
    }

    pub fn portrait_url(&self, phase: GamePhase, emotion: &str, seed: u32) -> String {
        let prompt = PromptBuilder::portrait_prompt(phase, emotion);
        format!(
            "{}/{}?width={}&height={}&seed={}&model={}&nologo=true",
            self.settings.endpoint.trim_end_matches('/'),
            urlencoding::encode(&prompt),
            self.settings.width,
            self.settings.height,
            seed,
            urlencoding::encode(&self.settings.model),
        )
    }
}

impl ImageCollaborator for PollinationsClient {
    fn generate_portrait(
        &mut self,
        id: RequestId,
        phase: GamePhase,
        emotion: &str,
        cancel: &CancelToken,
    ) -> Result<PortraitRef, CollaboratorError> {
        cancel.check()?;

        let seed = self.rng.gen_range(SEED_RANGE);
        let url = self.portrait_url(phase, emotion, seed);
        debug!("portrait {} {}/{} seed {}", id, phase, emotion, seed);

        if let Some(client) = &self.client {
            let status = client.get(&url).send()?.status();
            if !status.is_success() {
                return Err(CollaboratorError::Status(status.as_u16()));
            }
            cancel.check()?;
        }

        Ok(PortraitRef(url))
    }
}
