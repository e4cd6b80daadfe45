//! Internal constants for diagram rendering.

use std::time::Duration;

/// Default Graphviz executable.
pub const DEFAULT_COMMAND: &str = "dot";

/// Flag requesting SVG output from Graphviz.
pub const SVG_FLAG: &str = "-Tsvg";

/// Default time limit for one Graphviz invocation (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How often a running Graphviz process is polled for exit.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// URL prefix under which cached artifacts are served.
pub const DEFAULT_URL_PREFIX: &str = "/.diagram_cache/";

/// Image alt text when a diagram declares no title.
pub const FALLBACK_ALT: &str = "Graphviz diagram";
