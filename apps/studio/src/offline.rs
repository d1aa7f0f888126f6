use async_trait::async_trait;
use galileo_core::{GenerationService, TextRequest};

/// Stand-in for hosts without a generation backend.
///
/// Every request fails; the CLI only renders payloads produced elsewhere.
pub struct OfflineService;

#[async_trait]
impl GenerationService for OfflineService {
    async fn generate_text(&self, request: TextRequest) -> anyhow::Result<String> {
        anyhow::bail!("no generation service configured ({} request)", request.model())
    }

    async fn generate_speech(&self, _text: &str, voice: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("no generation service configured (speech, voice {voice})")
    }

    async fn generate_image(&self, _prompt: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("no generation service configured (image)")
    }
}
