//! Fitted cluster-assignment model

use crate::error::{ForecastError, Result};
use crate::models::ClusterAssign;
use serde::{Deserialize, Serialize};

/// K-means style cluster model holding the fitted centroids.
///
/// Assignment is a nearest-centroid lookup in the scaled feature space; no
/// training logic lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeansModel {
    /// Cluster centroids, one row per cluster
    centroids: Vec<Vec<f64>>,
}

impl KMeansModel {
    /// Create a cluster model from fitted centroids
    pub fn new(centroids: Vec<Vec<f64>>) -> Result<Self> {
        let model = Self { centroids };
        model.validate()?;
        Ok(model)
    }

    /// Check the fitted centroids are usable
    pub fn validate(&self) -> Result<()> {
        let width = match self.centroids.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => {
                return Err(ForecastError::ArtifactError(
                    "Cluster model has no centroids".to_string(),
                ))
            }
        };

        if self.centroids.iter().any(|c| c.len() != width) {
            return Err(ForecastError::ArtifactError(
                "Cluster centroids have inconsistent widths".to_string(),
            ));
        }

        Ok(())
    }

    /// Number of clusters
    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }

    /// Number of features the model was fit on
    pub fn n_features(&self) -> usize {
        self.centroids.first().map_or(0, |c| c.len())
    }
}

impl ClusterAssign for KMeansModel {
    fn assign(&self, input: &[f64]) -> Result<usize> {
        if input.len() != self.n_features() {
            return Err(ForecastError::SchemaMismatch(format!(
                "Cluster model was fit on {} features but received {}",
                self.n_features(),
                input.len()
            )));
        }

        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, centroid) in self.centroids.iter().enumerate() {
            let distance: f64 = centroid
                .iter()
                .zip(input.iter())
                .map(|(c, v)| (c - v).powi(2))
                .sum();

            // Strict comparison keeps the lowest index on ties
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }

        Ok(best)
    }
}
