use inlay_nest::io::ext_repr::{ExtInstance, ExtSolution};
use serde::{Deserialize, Serialize};

use crate::config::InlayConfig;

/// Everything needed to reproduce and inspect a nesting run
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NestOutput {
    #[serde(flatten)]
    pub instance: ExtInstance,
    pub solution: ExtSolution,
    pub config: InlayConfig,
}
