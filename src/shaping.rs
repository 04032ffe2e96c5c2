/*!
 * Optional bidirectional text shaping capability.
 *
 * Connected scripts (Persian, Arabic) need letterform joining and
 * right-to-left reordering for correct display in environments without
 * native bidi support. The renderer takes this as an injected capability
 * with a pass-through default, so shaped output is never a hard dependency.
 */

use std::fmt::Debug;

/// Injectable text shaping capability
pub trait TextShaper: Send + Sync + Debug {
    /// Reshape text for display; implementations must return the input
    /// unchanged when they cannot shape it.
    fn shape(&self, text: &str) -> String;
}

/// Default shaper: passes text through unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopShaper;

impl TextShaper for NoopShaper {
    fn shape(&self, text: &str) -> String {
        text.to_string()
    }
}
