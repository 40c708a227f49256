//! Network address types: INET, CIDR and the two MAC address widths.

use std::net::IpAddr;

/// Address family codes used by the inet/cidr wire layout. IPv4 matches the
/// server's `AF_INET`, IPv6 is that plus one.
pub(crate) const PGSQL_AF_INET: u8 = 2;
pub(crate) const PGSQL_AF_INET6: u8 = 3;

/// An INET value: a host address with an optional netmask prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Inet {
    pub addr: IpAddr,
    pub prefix: u8,
}

impl Inet {
    pub fn new(addr: IpAddr, prefix: u8) -> Self {
        Inet { addr, prefix }
    }

    /// A host address with the full-length prefix for its family.
    pub fn host(addr: IpAddr) -> Self {
        let prefix = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        Inet { addr, prefix }
    }
}

impl From<IpAddr> for Inet {
    fn from(addr: IpAddr) -> Self {
        Inet::host(addr)
    }
}

/// A CIDR network value. Shares the inet wire layout apart from the
/// `is_cidr` marker byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cidr {
    pub addr: IpAddr,
    pub prefix: u8,
}

impl Cidr {
    pub fn new(addr: IpAddr, prefix: u8) -> Self {
        Cidr { addr, prefix }
    }
}

/// A 6-byte MAC address (macaddr).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub fn octets(self) -> [u8; 6] {
        self.0
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        MacAddr(octets)
    }
}

/// An 8-byte EUI-64 MAC address (macaddr8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr8(pub [u8; 8]);

impl MacAddr8 {
    pub fn octets(self) -> [u8; 8] {
        self.0
    }
}

impl From<[u8; 8]> for MacAddr8 {
    fn from(octets: [u8; 8]) -> Self {
        MacAddr8(octets)
    }
}
