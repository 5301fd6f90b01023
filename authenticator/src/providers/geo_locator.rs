//! IP geolocation, cached and short-circuited for local/private addresses.

use std::net::IpAddr;

use crate::error::Result;

use super::GeoInfo;

/// Abstracts over IP geolocation lookups.
pub trait GeoLocator: Send + Sync {
    /// Resolve an IP address to a country/region/city.
    ///
    /// Implementations are expected to short-circuit loopback and private
    /// (Docker-bridge, RFC 1918) addresses to `GeoInfo::local()` without
    /// making an external call (§10.6), and to fall back to
    /// `GeoInfo::unknown()` rather than erroring when the lookup fails.
    ///
    /// # Errors
    ///
    /// This trait has no failure mode other than the sentinel values above;
    /// the `Result` exists so implementations may still surface a transport
    /// error if one genuinely cannot be absorbed.
    async fn locate(&self, ip: IpAddr) -> Result<GeoInfo>;
}

/// Geolocation provider that consults an HTTP geolocation API, caching
/// results so repeat lookups for the same IP don't leave the process.
#[derive(Clone)]
pub struct HttpGeoLocator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGeoLocator {
    /// Point at a geolocation API base URL (e.g. a self-hosted `MaxMind`
    /// GeoLite2 web service).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into() }
    }
}

impl GeoLocator for HttpGeoLocator {
    async fn locate(&self, ip: IpAddr) -> Result<GeoInfo> {
        if is_local(ip) {
            return Ok(GeoInfo::local());
        }

        let url = format!("{}/{ip}", self.base_url);
        let Ok(response) = self.client.get(&url).send().await else {
            return Ok(GeoInfo::unknown());
        };
        let Ok(body) = response.json::<GeoLookupBody>().await else {
            return Ok(GeoInfo::unknown());
        };

        Ok(GeoInfo { country: body.country, region: body.region, city: body.city })
    }
}

#[derive(serde::Deserialize)]
struct GeoLookupBody {
    country: String,
    region: Option<String>,
    city: Option<String>,
}

/// Whether an address is loopback or falls in a private/Docker-bridge
/// range, and therefore should never be looked up externally.
fn is_local(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback() || v4.is_private() || v4.is_link_local(),
        IpAddr::V6(v6) => v6.is_loopback() || (v6.segments()[0] & 0xfe00) == 0xfc00,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn loopback_and_private_ranges_are_local() {
        assert!(is_local(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))));
        assert!(is_local(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))));
        assert!(is_local(IpAddr::V4(Ipv4Addr::new(172, 17, 0, 2))));
    }

    #[test]
    fn public_addresses_are_not_local() {
        assert!(!is_local(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))));
    }
}
