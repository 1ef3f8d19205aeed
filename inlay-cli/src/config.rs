use inlay_nest::engine::NestConfig;
use inlay_nest::io::svg::SvgDrawOptions;
use serde::{Deserialize, Serialize};

/// Configuration of a nesting run from the command line
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct InlayConfig {
    /// Configuration of the nesting engine
    #[serde(default)]
    pub nest_config: NestConfig,
    /// Optional SVG drawing options
    #[serde(default)]
    pub svg_draw_options: SvgDrawOptions,
}
