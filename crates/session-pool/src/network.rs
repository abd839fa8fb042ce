//! Network liveness probe
//!
//! Answers "is at least one non-loopback interface up with an address". The
//! pool asks this before classifying a failure: with no usable interface the
//! failure is a network outage, never a configuration problem.

use tracing::debug;

/// Source of the network liveness answer.
pub trait NetworkProbe: Send + Sync {
    fn is_up(&self) -> bool;
}

/// Fixed answer, for tests and hosts where enumeration is not wanted.
#[derive(Debug, Clone, Copy)]
pub struct StaticNetworkProbe(pub bool);

impl NetworkProbe for StaticNetworkProbe {
    fn is_up(&self) -> bool {
        self.0
    }
}

/// Probe backed by the operating system's interface list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNetworkProbe;

impl NetworkProbe for SystemNetworkProbe {
    fn is_up(&self) -> bool {
        let up = interfaces_up();
        debug!(up, "network interface check");
        up
    }
}

#[cfg(unix)]
fn interfaces_up() -> bool {
    use nix::ifaddrs::getifaddrs;

    match getifaddrs() {
        Ok(addrs) => addrs.into_iter().any(|ifa| {
            let has_ip = ifa
                .address
                .as_ref()
                .is_some_and(|a| a.as_sockaddr_in().is_some() || a.as_sockaddr_in6().is_some());
            usable(ifa.flags, has_ip)
        }),
        Err(e) => {
            tracing::error!(error = %e, "error listing network interfaces");
            false
        }
    }
}

#[cfg(not(unix))]
fn interfaces_up() -> bool {
    debug!("network interface enumeration not supported on this platform, assuming up");
    true
}

#[cfg(unix)]
fn usable(flags: nix::net::if_::InterfaceFlags, has_ip: bool) -> bool {
    use nix::net::if_::InterfaceFlags;

    flags.contains(InterfaceFlags::IFF_UP) && !flags.contains(InterfaceFlags::IFF_LOOPBACK) && has_ip
}
