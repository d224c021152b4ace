//! Engine configuration: which grading scale to use and how the fee cycle runs

use crate::error::LoadError;
use crate::grading::{loader, GradingScale, ScaleId};
use crate::payment::PaymentConfig;
use crate::results::{Curriculum, ResultRegistry};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings shared by the CLI and the Lambda handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Scale used for result submissions (default: combined)
    #[serde(default = "default_scale")]
    pub scale: ScaleId,

    #[serde(default)]
    pub payment: PaymentConfig,

    /// Directory of scale tables; built-in tables are used when unset
    #[serde(default)]
    pub scales_path: Option<PathBuf>,

    /// Reject subjects outside the standard class curriculum
    #[serde(default)]
    pub check_curriculum: bool,
}

fn default_scale() -> ScaleId {
    ScaleId::Combined
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            payment: PaymentConfig::default(),
            scales_path: None,
            check_curriculum: false,
        }
    }
}

impl EngineConfig {
    /// Resolve the configured scale, from disk when a scales directory is set
    pub fn grading_scale(&self) -> Result<GradingScale, LoadError> {
        match &self.scales_path {
            Some(dir) => {
                debug!("loading {} scale from {}", self.scale, dir.display());
                loader::load_scale_from_dir(dir, self.scale)
            }
            None => Ok(GradingScale::builtin(self.scale)),
        }
    }

    /// Empty registry grading under the configured scale
    pub fn registry(&self) -> Result<ResultRegistry, LoadError> {
        let registry = ResultRegistry::new(self.grading_scale()?);
        Ok(if self.check_curriculum {
            registry.with_curriculum(Curriculum::standard())
        } else {
            registry
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::NeverPaidPolicy;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.scale, ScaleId::Combined);
        assert_eq!(config.payment.cycle_length_days, 30);
        assert_eq!(config.grading_scale().unwrap(), GradingScale::combined());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"scale": "simple", "payment": {"neverPaid": "due_immediately"}, "scalesPath": "data/scales"}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.scale, ScaleId::Simple);
        assert_eq!(config.payment.never_paid, NeverPaidPolicy::DueImmediately);
        assert_eq!(config.payment.cycle_length_days, 30);
        assert_eq!(config.grading_scale().unwrap(), GradingScale::simple());
    }

    #[test]
    fn test_missing_scales_dir() {
        let config = EngineConfig {
            scales_path: Some(PathBuf::from("data/no-such-dir")),
            ..EngineConfig::default()
        };
        assert!(matches!(config.grading_scale(), Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_registry_curriculum_flag() {
        let config = EngineConfig {
            check_curriculum: true,
            ..EngineConfig::default()
        };
        let registry = config.registry().unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.scale().name(), "combined");
    }
}
