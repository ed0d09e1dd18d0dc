pub mod identifier;
pub mod lint;
pub mod loader;
pub mod parser;
pub mod schema_def;
pub mod templates;
pub mod types;

// Re-exports
pub use loader::{load_layout, save_layout, LoadError};
pub use templates::ProjectTemplate;
pub use types::common::{Framework, PluginFormat, Severity};
pub use types::error::{ErrorEntry, ValidationReport};
pub use types::project::{LayoutDocument, ProjectMeta};
pub use types::style::{BuiltinStyle, Color, StyleSlot, WidgetStyle, BUILTIN_STYLES};
pub use types::widget::{
    Bounds, ControlRole, MidiBinding, TransportAction, TransportBehavior, WidgetDescriptor,
    WidgetKind,
};
