//! Prompt templates and rendering
//!
//! Templates ship embedded in the binary and are rendered with handlebars.

mod embedded;

pub use embedded::{ARCHITECT, CODER_SYSTEM, CODER_TASK, PLANNER};

use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

/// Render a template against a serializable context
///
/// HTML escaping is disabled - these are LLM prompts, and file contents
/// interpolated into them must arrive verbatim. Strict mode is off: a
/// missing context key renders empty rather than failing the run.
pub fn render<T: Serialize>(template: &str, context: &T) -> Result<String, handlebars::RenderError> {
    debug!(template_len = template.len(), "prompts::render: called");
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.render_template(template, context)
}
