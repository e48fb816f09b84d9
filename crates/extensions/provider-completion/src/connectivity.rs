//! Network availability preflight.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4};

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::debug;

use searchlens_protocols::provider::Connectivity;

/// Public address used to ask the OS for an outbound route.
pub const DEFAULT_ROUTE_TARGET: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(1, 1, 1, 1), 53));

/// Reports online when the machine has a route towards `target`.
///
/// Connecting a UDP socket only selects a route; nothing is sent. The
/// completion endpoint is never consulted, so an endpoint host that fails to
/// resolve surfaces as a failure of the request itself, not as offline.
#[derive(Debug, Clone)]
pub struct RouteConnectivity {
    target: SocketAddr,
}

impl RouteConnectivity {
    pub fn new(target: SocketAddr) -> Self {
        Self { target }
    }

    fn unspecified(&self) -> SocketAddr {
        let ip = match self.target {
            SocketAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            SocketAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        };
        SocketAddr::new(ip, 0)
    }
}

impl Default for RouteConnectivity {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTE_TARGET)
    }
}

#[async_trait]
impl Connectivity for RouteConnectivity {
    async fn is_online(&self) -> bool {
        let socket = match UdpSocket::bind(self.unspecified()).await {
            Ok(socket) => socket,
            Err(e) => {
                debug!("Binding a probe socket failed: {}", e);
                return false;
            }
        };
        match socket.connect(self.target).await {
            Ok(()) => true,
            Err(e) => {
                debug!("No route to {}: {}", self.target, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_target_is_public() {
        let connectivity = RouteConnectivity::default();
        assert_eq!(connectivity.target, DEFAULT_ROUTE_TARGET);
        assert!(!connectivity.target.ip().is_loopback());
    }

    #[test]
    fn test_bind_address_follows_target_family() {
        let v6 = RouteConnectivity::new("[::1]:53".parse().unwrap());
        assert!(v6.unspecified().is_ipv6());
        assert!(RouteConnectivity::default().unspecified().is_ipv4());
    }

    #[tokio::test]
    async fn test_loopback_route_is_online() {
        let connectivity = RouteConnectivity::new("127.0.0.1:53".parse().unwrap());
        assert!(connectivity.is_online().await);
    }
}
