use thiserror::Error;

/// Contract violations raised at the edges of the layout engine.
///
/// The algorithms themselves never fail; these cover caller mistakes such as asking
/// for a layout that was never registered or handing in unusable settings.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Unknown layout: {0}")]
    UnknownLayout(String),
    #[error("Invalid layout settings: {0}")]
    InvalidSettings(String),
    #[error("Failed to parse layout settings: {0}")]
    SettingsParse(#[from] serde_json::Error),
}
