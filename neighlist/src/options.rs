use crate::Error;

/// Parameters controlling the construction of a neighbor list from a padded
/// configuration, see [`crate::neighbors::NeighborList::build_for`].
///
/// These options can be read from JSON:
///
/// ```
/// use neighlist::NeighborListOptions;
///
/// let options = NeighborListOptions::from_json(r#"{
///     "cutoffs": [3.36, 3.37],
///     "padding_need_neighbors": true
/// }"#)?;
///
/// assert_eq!(options.influence_distance(), 3.37);
/// # Ok::<(), neighlist::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NeighborListOptions {
    /// Cutoff radii, one neighbor list is created for each of them
    pub cutoffs: Vec<f64>,
    /// Size of the bins used to sort particles in space. This must be larger
    /// than all the cutoffs, and defaults to the largest cutoff.
    #[serde(default)]
    pub influence_distance: Option<f64>,
    /// Should padding particles also get their own list of neighbors?
    #[serde(default)]
    pub padding_need_neighbors: bool,
}

impl NeighborListOptions {
    /// Create options with the given `cutoffs` and default values for
    /// everything else
    pub fn new(cutoffs: Vec<f64>) -> NeighborListOptions {
        NeighborListOptions {
            cutoffs: cutoffs,
            influence_distance: None,
            padding_need_neighbors: false,
        }
    }

    /// Parse and validate options from a JSON string
    pub fn from_json(json: &str) -> Result<NeighborListOptions, Error> {
        let options = serde_json::from_str::<NeighborListOptions>(json)?;
        options.validate()?;
        return Ok(options);
    }

    /// Get the influence distance, either the one given explicitly or the
    /// largest cutoff
    pub fn influence_distance(&self) -> f64 {
        match self.influence_distance {
            Some(influence_distance) => influence_distance,
            None => self.cutoffs.iter().copied().fold(0.0, f64::max),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.cutoffs.is_empty() {
            return Err(Error::InvalidArgument(
                "expected at least one cutoff in neighbor list options".into()
            ));
        }

        for &cutoff in &self.cutoffs {
            if !(cutoff.is_finite() && cutoff > 0.0) {
                return Err(Error::InvalidArgument(format!(
                    "expected positive finite cutoffs, got {}", cutoff
                )));
            }
        }

        if let Some(influence_distance) = self.influence_distance {
            let max_cutoff = self.cutoffs.iter().copied().fold(0.0, f64::max);
            if !(influence_distance.is_finite() && influence_distance >= max_cutoff) {
                return Err(Error::InvalidArgument(format!(
                    "expected the influence distance to be finite and larger \
                    than all cutoffs ({}), got {}", max_cutoff, influence_distance
                )));
            }
        }

        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = NeighborListOptions::from_json(r#"{"cutoffs": [2.0, 3.5, 1.0]}"#).unwrap();
        assert_eq!(options, NeighborListOptions::new(vec![2.0, 3.5, 1.0]));
        assert_eq!(options.influence_distance(), 3.5);
        assert!(!options.padding_need_neighbors);

        let options = NeighborListOptions::from_json(r#"{
            "cutoffs": [2.0],
            "influence_distance": 4.0,
            "padding_need_neighbors": true
        }"#).unwrap();
        assert_eq!(options.influence_distance(), 4.0);
        assert!(options.padding_need_neighbors);

        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"cutoffs":[2.0],"influence_distance":4.0,"padding_need_neighbors":true}"#);
    }

    #[test]
    fn invalid() {
        let error = NeighborListOptions::from_json(r#"{"cutoffs": []}"#).unwrap_err();
        assert_eq!(error.to_string(), "invalid argument: expected at least one cutoff in neighbor list options");

        let error = NeighborListOptions::from_json(r#"{"cutoffs": [-2.0]}"#).unwrap_err();
        assert!(matches!(error, Error::InvalidArgument(_)));

        let error = NeighborListOptions::from_json(r#"{"cutoffs": [2.0], "influence_distance": 1.0}"#).unwrap_err();
        assert!(matches!(error, Error::InvalidArgument(_)));

        let error = NeighborListOptions::from_json(r#"{"cutoffs": [2.0], "skin": 1.0}"#).unwrap_err();
        assert!(matches!(error, Error::Json(_)));

        let error = NeighborListOptions::from_json(r#"{"influence_distance": 1.0}"#).unwrap_err();
        assert!(matches!(error, Error::Json(_)));
    }
}
