//! Plugins compiled into the binary

pub mod formatting;
pub mod text_case;

use std::sync::Arc;

use super::Plugin;

pub use formatting::FormattingPlugin;
pub use text_case::TextCasePlugin;

/// Fresh instances of every bundled plugin, in registration order
pub fn builtin_plugins() -> Vec<Arc<dyn Plugin>> {
    vec![
        Arc::new(TextCasePlugin::new()),
        Arc::new(FormattingPlugin::new()),
    ]
}
