use serde::{Deserialize, Serialize};

/// Text model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Maximum transitions per generated reply. 0 disables the bound.
    pub max_generation_steps: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_generation_steps: 500,
        }
    }
}

impl ModelConfig {
    pub fn max_steps(&self) -> Option<usize> {
        (self.max_generation_steps > 0).then_some(self.max_generation_steps)
    }
}
