//! Best-effort notation rendering.
//!
//! Rendering must never take down the surrounding page: an empty source or a
//! container the engine cannot resolve is logged and skipped, not raised.

use tracing::{error, warn};

use crate::engine::{NotationEngine, RenderOptions, WrapSpec};

/// Staff width used when the container's parent cannot be measured.
pub const DEFAULT_STAFF_WIDTH: f64 = 800.0;

/// Horizontal margin subtracted from the measured width.
const STAFF_MARGIN: f64 = 40.0;

/// Render notation source into the named container.
///
/// Failures are logged at error level and otherwise swallowed.
pub fn render<E: NotationEngine>(
    engine: &mut E,
    container_id: &str,
    source: &str,
    options: RenderOptions,
) {
    if source.is_empty() {
        error!(container = container_id, "no notation source to render");
        return;
    }
    if let Err(e) = engine.render(container_id, source, &options) {
        error!(container = container_id, error = %e, "render failed");
    }
}

/// Render with line wrapping sized to the container's parent.
///
/// The staff width is computed from the parent's live width at call time,
/// falling back to [`DEFAULT_STAFF_WIDTH`] when it cannot be measured.
pub fn render_wrapped<E: NotationEngine>(engine: &mut E, container_id: &str, source: &str) {
    let width = match engine.parent_width(container_id) {
        Some(width) => width,
        None => {
            warn!(
                container = container_id,
                "container parent not measurable, using default staff width"
            );
            DEFAULT_STAFF_WIDTH
        }
    };

    let options = RenderOptions {
        staff_width: Some(width - STAFF_MARGIN),
        wrap: Some(WrapSpec {
            min_spacing: 1.5,
            max_spacing: 2.5,
            preferred_measures_per_line: 4,
        }),
        ..RenderOptions::default()
    };
    render(engine, container_id, source, options);
}
