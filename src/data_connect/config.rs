use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::data_connect::constants::EMULATOR_HOST_ENV_VAR;
use crate::data_connect::error::{invalid_argument, not_initialized, DataConnectResult};

/// Default production host for the Data Connect REST API.
pub const DEFAULT_DATA_CONNECT_HOST: &str = "firebasedataconnect.googleapis.com";

/// Identifies one connector of one Data Connect service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ConnectorConfig {
    pub location: String,
    pub connector: String,
    pub service: String,
}

impl ConnectorConfig {
    pub fn new(
        location: impl Into<String>,
        connector: impl Into<String>,
        service: impl Into<String>,
    ) -> DataConnectResult<Self> {
        let config = Self {
            location: location.into(),
            connector: connector.into(),
            service: service.into(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DataConnectResult<()> {
        for (field, value) in [
            ("location", &self.location),
            ("connector", &self.connector),
            ("service", &self.service),
        ] {
            if value.trim().is_empty() {
                return Err(invalid_argument(format!("{field} is required")));
            }
        }
        Ok(())
    }

    /// Stable key for the service instance bound to this connector.
    pub fn identifier(&self) -> String {
        serde_json::json!({
            "location": self.location,
            "connector": self.connector,
            "service": self.service,
        })
        .to_string()
    }
}

impl Display for ConnectorConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.location, self.service, self.connector)
    }
}

/// Connector plus the project it lives in; known once an app is attached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConnectOptions {
    pub connector: ConnectorConfig,
    pub project_id: String,
}

impl DataConnectOptions {
    pub fn new(
        connector: ConnectorConfig,
        project_id: Option<String>,
    ) -> DataConnectResult<Self> {
        connector.validate()?;
        let project_id = project_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                not_initialized(
                    "Project ID must be provided. Did you pass in a proper project_id to initialize_app?",
                )
            })?;
        Ok(Self {
            connector,
            project_id,
        })
    }

    /// `projects/{p}/locations/{l}/services/{s}/connectors/{c}`
    pub fn resource_path(&self) -> String {
        format!(
            "projects/{}/locations/{}/services/{}/connectors/{}",
            self.project_id,
            self.connector.location,
            self.connector.service,
            self.connector.connector
        )
    }
}

/// Host/port/SSL tuple of the backend the transport talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportOptions {
    pub host: String,
    pub port: Option<u16>,
    pub ssl_enabled: bool,
}

impl TransportOptions {
    pub fn new(host: impl Into<String>, port: Option<u16>, ssl_enabled: bool) -> Self {
        Self {
            host: host.into(),
            port,
            ssl_enabled,
        }
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.ssl_enabled { "https" } else { "http" };
        match self.port {
            Some(port) => format!("{scheme}://{}:{port}", self.host),
            None => format!("{scheme}://{}", self.host),
        }
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_CONNECT_HOST, None, true)
    }
}

/// Parses an emulator host declaration such as `http://localhost:9399`.
pub fn parse_transport_options(declaration: &str) -> DataConnectResult<TransportOptions> {
    let (protocol, rest) = declaration.split_once("://").unwrap_or(("https", declaration));
    let ssl_enabled = match protocol {
        "http" => false,
        "https" => true,
        other => {
            return Err(invalid_argument(format!(
                "Unsupported protocol '{other}' in emulator host"
            )))
        }
    };

    let rest = rest.trim_end_matches('/');
    let (host, port) = match rest.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse::<u16>().map_err(|_| {
                invalid_argument("Port must be a number in emulator host declaration")
            })?;
            (host, Some(port))
        }
        None => (rest, None),
    };

    if host.trim().is_empty() {
        return Err(invalid_argument("Host is required for emulator connections"));
    }

    Ok(TransportOptions::new(host, port, ssl_enabled))
}

/// Reads the emulator declaration from the environment, if one is set.
pub fn emulator_from_env() -> DataConnectResult<Option<TransportOptions>> {
    match std::env::var(EMULATOR_HOST_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => parse_transport_options(value.trim()).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_config_requires_every_field() {
        let err = ConnectorConfig::new("us-east4", " ", "svc").unwrap_err();
        assert_eq!(err.code_str(), "data-connect/invalid-argument");
        assert!(err.message().contains("connector"));
    }

    #[test]
    fn identifier_is_stable_per_config() {
        let a = ConnectorConfig::new("us-east4", "goals", "svc").unwrap();
        let b = ConnectorConfig::new("us-east4", "goals", "svc").unwrap();
        let c = ConnectorConfig::new("us-east4", "other", "svc").unwrap();
        assert_eq!(a.identifier(), b.identifier());
        assert_ne!(a.identifier(), c.identifier());
        assert_eq!(a.to_string(), "us-east4/svc/goals");
    }

    #[test]
    fn options_require_project_id() {
        let connector = ConnectorConfig::new("us-east4", "goals", "svc").unwrap();
        let err = DataConnectOptions::new(connector.clone(), None).unwrap_err();
        assert_eq!(err.code_str(), "data-connect/not-initialized");

        let options = DataConnectOptions::new(connector, Some("demo".into())).unwrap();
        assert_eq!(
            options.resource_path(),
            "projects/demo/locations/us-east4/services/svc/connectors/goals"
        );
    }

    #[test]
    fn parses_emulator_hosts() {
        assert_eq!(
            parse_transport_options("http://localhost:9399").unwrap(),
            TransportOptions::new("localhost", Some(9399), false)
        );
        assert_eq!(
            parse_transport_options("example.com").unwrap().base_url(),
            "https://example.com"
        );
        assert!(parse_transport_options("ftp://host").is_err());
        assert!(parse_transport_options("http://host:port").is_err());
        assert!(parse_transport_options("http://:9399").is_err());
    }

    #[test]
    fn default_transport_targets_production() {
        assert_eq!(
            TransportOptions::default().base_url(),
            "https://firebasedataconnect.googleapis.com"
        );
    }
}
