use std::{
    error::Error,
    fmt::{self, Display},
    str::FromStr,
};

const SCHEME: &str = "tcp://";
const ANY_HOST: &str = "*";
const ANY_ADDR: &str = "0.0.0.0";

/// Error returned when an endpoint string can't be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointErr {
    UnsupportedScheme(String),
    MissingPort(String),
    InvalidPort(String),
}

impl Display for EndpointErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointErr::UnsupportedScheme(s) => {
                write!(f, "unsupported endpoint {s:?}, only tcp:// is available")
            }
            EndpointErr::MissingPort(s) => write!(f, "endpoint {s:?} has no port"),
            EndpointErr::InvalidPort(s) => write!(f, "endpoint {s:?} has an invalid port"),
        }
    }
}

impl Error for EndpointErr {}

/// A tcp endpoint of the form `tcp://<host>:<port>`, where `*` stands for every interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Creates a new `Endpoint` from it's parts.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parses `tcp://host:port` or a bare `host:port`.
    pub fn parse(s: &str) -> Result<Self, EndpointErr> {
        let addr = match s.split_once("://") {
            Some(_) => s
                .strip_prefix(SCHEME)
                .ok_or_else(|| EndpointErr::UnsupportedScheme(s.to_string()))?,
            None => s,
        };

        let (host, port) = addr
            .rsplit_once(':')
            .filter(|(_, port)| !port.is_empty())
            .ok_or_else(|| EndpointErr::MissingPort(s.to_string()))?;

        let port = port
            .parse()
            .map_err(|_| EndpointErr::InvalidPort(s.to_string()))?;

        Ok(Self::new(host, port))
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The address to hand over to a listener, `*` resolves to every interface.
    pub fn bind_addr(&self) -> String {
        let host = match self.host.as_str() {
            ANY_HOST | "" => ANY_ADDR,
            host => host,
        };

        format!("{host}:{}", self.port)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(ANY_HOST, 8888)
    }
}

impl FromStr for Endpoint {
    type Err = EndpointErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}:{}", self.host, self.port)
    }
}
