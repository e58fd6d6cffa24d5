//! Texts shown to submitters.

/// Initial acknowledgement, sent before the download starts.
pub const DOWNLOADING: &str = "Downloading your image...";

pub const CONVERTING: &str = "Converting your gif to a format that blender can use...";

pub const RENDERING: &str = "Orbifying your image with blender...";

pub const EXPORTING: &str = "Converting your orb into a gif...";

pub const UPLOADING: &str = "Uploading your orb...";

/// The single message sent when a job fails inside the pipeline.
pub const PIPELINE_FAILED: &str = "An error occurred while processing your request.";

/// File name of the posted artifact.
pub const RESULT_FILE_NAME: &str = "orb.gif";

pub fn queue_wait(position: usize) -> String {
    format!(
        "Hang on, I'm already working on an orb, you'll have to wait. Your place in queue is: `{}`.",
        position
    )
}

pub fn queue_advanced(position: usize) -> String {
    format!(
        "An orb ahead of you in the queue is complete! Your new place in the queue is: `{}`.",
        position
    )
}

pub fn result(mention: &str) -> String {
    format!("Here is your orb, {}!", mention)
}
