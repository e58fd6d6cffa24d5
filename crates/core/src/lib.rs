pub mod acquisition;
pub mod chat;
pub mod config;
pub mod metrics;
pub mod pipeline;
pub mod queue;
pub mod testing;
pub mod toolchain;
pub mod workspace;

pub use acquisition::{
    AcquiredSource, AcquisitionError, HttpAcquirer, InputSource, SourceAcquirer,
};
pub use chat::{ChatError, ChatSession};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DiscordConfig,
    SanitizedConfig, ServerConfig, WorkspaceConfig,
};
pub use pipeline::{IntakeOutcome, PipelineError, PipelineOrchestrator, SubmissionIntake};
pub use queue::{Job, JobSnapshot, JobStatus, QueueAdvanced, QueueError, SubmissionQueue};
pub use toolchain::{ProcessToolchain, Toolchain, ToolchainConfig, ToolchainError};
pub use workspace::JobWorkspace;
