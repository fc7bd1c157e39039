// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The configuration of a path computation service, as read from YAML

use crate::errors::{ConfigError, ConfigResult};
use net::vlan::{VlanRange, parse_vlan_ranges};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracectl::TracingControl;
use tracing::{debug, info};

fn default_name() -> String {
    "pce".to_string()
}

fn default_vlans() -> String {
    "any".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PceConfig {
    #[serde(default = "default_name")]
    pub name: String,

    /// topology snapshot to serve requests from
    pub snapshot: Option<PathBuf>,

    /// tracing levels, as in `default=info,pce=debug`
    #[serde(default)]
    pub tracing: Option<String>,

    /// time budget of a computation, in milliseconds
    #[serde(default)]
    pub deadline_ms: Option<u64>,

    #[serde(default)]
    pub service_layer: bool,

    /// VLAN expression for fixtures that name no VLAN
    #[serde(default = "default_vlans")]
    pub default_vlans: String,
}

impl Default for PceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            snapshot: None,
            tracing: None,
            deadline_ms: None,
            service_layer: false,
            default_vlans: default_vlans(),
        }
    }
}

impl PceConfig {
    /// Parse a configuration from YAML
    ///
    /// # Errors
    ///
    /// Fails if the document is not a valid configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;
        let config = Self::from_yaml_str(&yaml)?;
        info!("Loaded configuration '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    ///
    /// Fails on an empty name, a zero deadline, an unparsable VLAN expression
    /// or a malformed tracing string.
    pub fn validate(&self) -> ConfigResult {
        debug!("Validating configuration '{}' ..", self.name);
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingParameter("name"));
        }
        if self.deadline_ms == Some(0) {
            return Err(ConfigError::InvalidDeadline("must be positive"));
        }
        self.vlan_ranges()?;
        if let Some(tracing) = &self.tracing {
            TracingControl::validate_config_string(tracing)
                .map_err(|e| ConfigError::InvalidTracing(tracing.clone(), e.to_string()))?;
        }
        Ok(())
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// The default VLANs as ranges. An expression meaning any VLAN yields no
    /// range at all.
    ///
    /// # Errors
    ///
    /// Fails if the expression does not parse.
    pub fn vlan_ranges(&self) -> Result<Vec<VlanRange>, ConfigError> {
        let ranges = parse_vlan_ranges(&self.default_vlans)
            .map_err(|e| ConfigError::InvalidVlans(self.default_vlans.clone(), e.to_string()))?;
        if ranges.contains(&VlanRange::ANY) {
            return Ok(vec![]);
        }
        Ok(ranges)
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use crate::errors::stringify;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
name: lab
snapshot: /etc/pce/topology.yaml
tracing: "default=info,pce=debug"
deadline_ms: 500
service_layer: true
default_vlans: "100-200,300"
"#;
        let config = PceConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.name, "lab");
        assert_eq!(config.snapshot, Some(PathBuf::from("/etc/pce/topology.yaml")));
        assert_eq!(config.deadline(), Some(Duration::from_millis(500)));
        assert!(config.service_layer);
        assert_eq!(config.vlan_ranges().unwrap().len(), 2);
        assert_eq!(stringify(&config.validate()), "Ok");
    }

    #[test]
    fn test_defaults() {
        let config = PceConfig::from_yaml_str("snapshot: topo.yaml").unwrap();
        assert_eq!(config.name, "pce");
        assert_eq!(config.deadline(), None);
        assert!(!config.service_layer);
        assert!(config.vlan_ranges().unwrap().is_empty());
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(PceConfig::default().default_vlans, "any");
    }

    #[test]
    fn test_validation_failures() {
        let mut config = PceConfig { name: " ".to_string(), ..PceConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::MissingParameter("name")));

        config.name = "pce".to_string();
        config.deadline_ms = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDeadline(_))));

        config.deadline_ms = Some(10);
        config.default_vlans = "10-x".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidVlans(_, _))));

        config.default_vlans = "any".to_string();
        config.tracing = Some("pce=loud".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTracing(_, _))));
    }

    #[test]
    #[traced_test]
    fn test_load_config_file() {
        let path = std::env::temp_dir().join(format!("pce-config-{}.yaml", std::process::id()));
        std::fs::write(&path, "name: lab\ndeadline_ms: 100\n").unwrap();
        let config = PceConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.name, "lab");
        assert!(logs_contain("Loaded configuration 'lab'"));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(matches!(PceConfig::from_yaml_str("colour: blue"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            PceConfig::load(Path::new("/nonexistent/pce.yaml")),
            Err(ConfigError::Io(_, _))
        ));
    }
}
