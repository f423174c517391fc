//! JSON model artifacts.
//!
//! # Formats
//!
//! A linear model:
//! ```text
//! {"model": "linear", "features": ["winter_precip_mm", "winter_avg_temp_C"],
//!  "intercept": 0.21, "coefficients": [0.0021, -0.004]}
//! ```
//!
//! A random forest, the mean of its regression trees. Each tree is a flat
//! node list rooted at index 0; a split sends a row to `left` when its
//! feature value is `<= threshold`:
//! ```text
//! {"model": "random_forest", "features": ["winter_precip_mm", "winter_avg_temp_C"],
//!  "trees": [{"nodes": [{"feature": 0, "threshold": 120.0, "left": 1, "right": 2},
//!                       {"value": 0.38}, {"value": 0.61}]}]}
//! ```

use crate::predictor::{FeatureRow, Predictor};
use bloom_core::{BloomError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn evaluate(&self, values: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if values[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    /// Children must point forward so evaluation always terminates.
    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err(String::from("tree has no nodes"));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = *node
            {
                if feature >= n_features {
                    return Err(format!("node {idx} splits on unknown feature {feature}"));
                }
                for child in [left, right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(format!("node {idx} has invalid child {child}"));
                    }
                }
            }
        }
        Ok(())
    }
}

/// A serialized regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear {
        features: Vec<String>,
        intercept: f64,
        coefficients: Vec<f64>,
    },
    RandomForest {
        features: Vec<String>,
        trees: Vec<RegressionTree>,
    },
}

impl ModelArtifact {
    /// Load and validate an artifact from disk.
    pub fn load(path: &Path) -> Result<ModelArtifact> {
        let display = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|e| BloomError::ModelLoad {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        let artifact = ModelArtifact::from_json(&json).map_err(|reason| BloomError::ModelLoad {
            path: display.clone(),
            reason,
        })?;
        info!("Loaded model {}: {}", display, artifact.describe());
        Ok(artifact)
    }

    /// Parse and validate an artifact from a JSON string.
    pub fn from_json(json: &str) -> std::result::Result<ModelArtifact, String> {
        let artifact: ModelArtifact = serde_json::from_str(json).map_err(|e| e.to_string())?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn features(&self) -> &[String] {
        match self {
            ModelArtifact::Linear { features, .. } | ModelArtifact::RandomForest { features, .. } => {
                features
            }
        }
    }

    /// Short human-readable summary for logs.
    pub fn describe(&self) -> String {
        match self {
            ModelArtifact::Linear { features, .. } => {
                format!("linear regression over {} features", features.len())
            }
            ModelArtifact::RandomForest { trees, .. } => {
                format!("random forest with {} trees", trees.len())
            }
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let features = self.features();
        if features.is_empty() {
            return Err(String::from("model declares no features"));
        }
        if let Some(unknown) = features.iter().find(|f| !FeatureRow::is_known(f)) {
            return Err(format!("unknown feature {unknown:?}"));
        }
        match self {
            ModelArtifact::Linear { coefficients, .. } => {
                if coefficients.len() != features.len() {
                    return Err(format!(
                        "{} coefficients for {} features",
                        coefficients.len(),
                        features.len()
                    ));
                }
            }
            ModelArtifact::RandomForest { trees, .. } => {
                if trees.is_empty() {
                    return Err(String::from("random forest has no trees"));
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(features.len())
                        .map_err(|e| format!("tree {i}: {e}"))?;
                }
            }
        }
        Ok(())
    }

    fn feature_values(&self, row: &FeatureRow) -> Vec<f64> {
        // names are checked in validate()
        self.features()
            .iter()
            .map(|name| row.get(name).unwrap_or(f64::NAN))
            .collect()
    }
}

impl Predictor for ModelArtifact {
    fn predict(&self, rows: &[FeatureRow]) -> Vec<f64> {
        rows.iter()
            .map(|row| {
                let values = self.feature_values(row);
                match self {
                    ModelArtifact::Linear {
                        intercept,
                        coefficients,
                        ..
                    } => {
                        intercept
                            + coefficients
                                .iter()
                                .zip(&values)
                                .map(|(c, v)| c * v)
                                .sum::<f64>()
                    }
                    ModelArtifact::RandomForest { trees, .. } => {
                        trees.iter().map(|t| t.evaluate(&values)).sum::<f64>() / trees.len() as f64
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_core::site::ClimateInput;

    const FOREST: &str = r#"{
        "model": "random_forest",
        "features": ["winter_precip_mm", "winter_avg_temp_C"],
        "trees": [
            {"nodes": [
                {"feature": 0, "threshold": 120.0, "left": 1, "right": 2},
                {"value": 0.30},
                {"feature": 1, "threshold": 17.0, "left": 3, "right": 4},
                {"value": 0.70},
                {"value": 0.60}
            ]},
            {"nodes": [{"value": 0.50}]}
        ]
    }"#;

    const LINEAR: &str = r#"{
        "model": "linear",
        "features": ["winter_avg_temp_C", "winter_precip_mm"],
        "intercept": 0.1,
        "coefficients": [-0.01, 0.004]
    }"#;

    fn climate(precipitation_mm: f64, avg_temp_c: f64) -> ClimateInput {
        ClimateInput {
            precipitation_mm,
            avg_temp_c,
        }
    }

    #[test]
    fn test_forest_averages_trees() {
        let model = ModelArtifact::from_json(FOREST).unwrap();
        assert_eq!(model.describe(), "random forest with 2 trees");
        // wet and cool: (0.70 + 0.50) / 2
        assert!((model.predict_peak(&climate(150.0, 16.5)).unwrap() - 0.60).abs() < 1e-12);
        // wet and warm: (0.60 + 0.50) / 2
        assert!((model.predict_peak(&climate(150.0, 17.8)).unwrap() - 0.55).abs() < 1e-12);
        // dry, threshold is inclusive on the left: (0.30 + 0.50) / 2
        assert!((model.predict_peak(&climate(120.0, 30.0)).unwrap() - 0.40).abs() < 1e-12);
    }

    #[test]
    fn test_linear_uses_named_features() {
        let model = ModelArtifact::from_json(LINEAR).unwrap();
        // 0.1 - 0.01 * 17.8 + 0.004 * 145.2
        let expected = 0.1 - 0.178 + 0.5808;
        let got = model.predict_peak(&climate(145.2, 17.8)).unwrap();
        assert!((got - expected).abs() < 1e-9);
    }

    #[test]
    fn test_predict_batch_one_value_per_row() {
        let model = ModelArtifact::from_json(FOREST).unwrap();
        let rows: Vec<FeatureRow> = [climate(100.0, 15.0), climate(200.0, 15.0)]
            .iter()
            .map(FeatureRow::from)
            .collect();
        assert_eq!(model.predict(&rows).len(), 2);
        assert!(model.predict(&[]).is_empty());
    }

    #[test]
    fn test_rejects_malformed_artifacts() {
        let cases = [
            r#"{"model": "linear", "features": ["rainfall"], "intercept": 0.1, "coefficients": [1.0]}"#,
            r#"{"model": "linear", "features": ["winter_precip_mm"], "intercept": 0.1, "coefficients": []}"#,
            r#"{"model": "random_forest", "features": ["winter_precip_mm"], "trees": []}"#,
            r#"{"model": "random_forest", "features": ["winter_precip_mm"], "trees": [{"nodes": [{"feature": 0, "threshold": 1.0, "left": 0, "right": 1}, {"value": 0.2}]}]}"#,
            r#"{"model": "random_forest", "features": ["winter_precip_mm"], "trees": [{"nodes": [{"feature": 3, "threshold": 1.0, "left": 1, "right": 2}, {"value": 0.2}, {"value": 0.3}]}]}"#,
            r#"{"model": "gradient_boosting", "features": ["winter_precip_mm"]}"#,
            "not json",
        ];
        for json in cases {
            assert!(ModelArtifact::from_json(json).is_err(), "accepted {json}");
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = ModelArtifact::load(Path::new("fixtures/models/missing.json")).unwrap_err();
        assert!(matches!(err, BloomError::ModelLoad { .. }));
    }
}
