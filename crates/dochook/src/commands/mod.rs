//! CLI command implementations.

mod inject;
mod lint;
mod prebuild;
mod render;
mod timestamps;

pub(crate) use inject::InjectArgs;
pub(crate) use lint::LintArgs;
pub(crate) use prebuild::PrebuildArgs;
pub(crate) use render::RenderArgs;
pub(crate) use timestamps::TimestampsArgs;
