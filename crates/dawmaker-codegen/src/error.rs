use thiserror::Error;

/// Input contract violations detected while planning an export.
/// Generation itself performs no I/O, so these are the only failures.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("plugin name is empty")]
    MissingPluginName,
}
