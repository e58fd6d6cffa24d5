use orbify_core::chat::discord::{DiscordClient, SignatureVerifier};
use orbify_core::{Config, PipelineOrchestrator, SanitizedConfig, SubmissionIntake};

/// Shared application state
pub struct AppState {
    config: Config,
    verifier: SignatureVerifier,
    discord: DiscordClient,
    intake: SubmissionIntake,
}

impl AppState {
    pub fn new(
        config: Config,
        verifier: SignatureVerifier,
        discord: DiscordClient,
        intake: SubmissionIntake,
    ) -> Self {
        Self {
            config,
            verifier,
            discord,
            intake,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn verifier(&self) -> &SignatureVerifier {
        &self.verifier
    }

    pub fn discord(&self) -> &DiscordClient {
        &self.discord
    }

    pub fn intake(&self) -> &SubmissionIntake {
        &self.intake
    }

    pub fn orchestrator(&self) -> &PipelineOrchestrator {
        self.intake.orchestrator()
    }
}
