use core::fmt;
use core::str::FromStr;

/// One running server instance, represented in the directory as a leaf node
/// named `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The cache/directory key: `"host:port"`.
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid endpoint {_0:?}: expected \"host:port\"")]
pub struct ParseEndpointError(#[error(ignore)] String);

impl FromStr for Endpoint {
    type Err = ParseEndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| ParseEndpointError(s.to_owned()))?;
        let port: u16 = port.parse().map_err(|_err| ParseEndpointError(s.to_owned()))?;
        if host.is_empty() {
            return Err(ParseEndpointError(s.to_owned()));
        }
        Ok(Self::new(host, port))
    }
}

/// The (possibly empty) ordered collection of endpoints for one interface
/// name, as read from the directory.
pub type ProviderSet = Vec<Endpoint>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_host_port() {
        let endpoint = Endpoint::new("10.0.0.1", 9000);
        assert_eq!(endpoint.to_string(), "10.0.0.1:9000");
        assert_eq!("10.0.0.1:9000".parse(), Ok(endpoint));
    }

    #[test]
    fn rejects_missing_port() {
        assert!("10.0.0.1".parse::<Endpoint>().is_err());
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!("10.0.0.1:abc".parse::<Endpoint>().is_err());
    }

    #[test]
    fn rejects_empty_host() {
        assert!(":9000".parse::<Endpoint>().is_err());
    }
}
