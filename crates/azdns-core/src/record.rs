//! Record model
//!
//! Maps a string-typed update request onto the record-set payload that is
//! submitted to the zone. Only A and AAAA are representable.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Wire name of the type, as used in record-set paths and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            other => Err(Error::unsupported_record_type(other)),
        }
    }
}

/// Record content, tagged by kind
///
/// Carries both the parsed address and the literal the caller supplied. The
/// literal is what gets submitted, so `2001:DB8::0001` reaches the zone as
/// written rather than in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A { address: Ipv4Addr, literal: String },
    Aaaa { address: Ipv6Addr, literal: String },
}

impl RecordData {
    /// Check that `value` is an address of the family `record_type` calls for
    ///
    /// A accepts dotted-quad literals, including zero-padded octets
    /// (`010.0.0.1`). AAAA accepts any IPv6 literal with an optional
    /// `%zone` suffix.
    pub fn parse(record_type: RecordType, value: &str) -> Result<Self> {
        match record_type {
            RecordType::A => parse_ipv4(value)
                .map(|address| RecordData::A {
                    address,
                    literal: value.to_string(),
                })
                .ok_or_else(|| {
                    Error::invalid_record_value("A", value, "not an IPv4 address literal")
                }),
            RecordType::Aaaa => parse_ipv6(value)
                .map(|address| RecordData::Aaaa {
                    address,
                    literal: value.to_string(),
                })
                .ok_or_else(|| {
                    Error::invalid_record_value("AAAA", value, "not an IPv6 address literal")
                }),
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A { .. } => RecordType::A,
            RecordData::Aaaa { .. } => RecordType::Aaaa,
        }
    }

    pub fn address(&self) -> IpAddr {
        match self {
            RecordData::A { address, .. } => IpAddr::V4(*address),
            RecordData::Aaaa { address, .. } => IpAddr::V6(*address),
        }
    }

    /// The address exactly as supplied
    pub fn literal(&self) -> &str {
        match self {
            RecordData::A { literal, .. } | RecordData::Aaaa { literal, .. } => literal,
        }
    }
}

impl From<IpAddr> for RecordData {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(address) => RecordData::A {
                address,
                literal: address.to_string(),
            },
            IpAddr::V6(address) => RecordData::Aaaa {
                address,
                literal: address.to_string(),
            },
        }
    }
}

fn parse_ipv4(value: &str) -> Option<Ipv4Addr> {
    if let Ok(addr) = value.parse::<Ipv4Addr>() {
        return Some(addr);
    }

    // Zero-padded octets, which the std parser refuses
    let mut octets = [0u8; 4];
    let mut parts = value.split('.');
    for octet in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

fn parse_ipv6(value: &str) -> Option<Ipv6Addr> {
    let base = match value.split_once('%') {
        Some((base, zone)) if !zone.is_empty() => base,
        Some(_) => return None,
        None => value,
    };
    base.parse().ok()
}

/// Record-set payload submitted by a create-or-update call
///
/// Holds exactly one record. Submitting it replaces whatever the zone held
/// for the same (name, type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    /// Record name as supplied by the caller
    pub name: String,
    /// Time-to-live in seconds
    pub ttl: i64,
    /// The single record of the set
    pub data: RecordData,
}

impl RecordSet {
    pub fn new(name: impl Into<String>, ttl: i64, data: RecordData) -> Self {
        Self {
            name: name.into(),
            ttl,
            data,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }
}

/// Addressing tuple of a create-or-update call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordSetKey {
    pub subscription_id: String,
    pub resource_group: String,
    pub zone_name: String,
    /// Record-set name relative to the zone (the `domain` argument of an update)
    pub relative_name: String,
    pub record_type: RecordType,
}

/// String-typed update request, as accepted from callers and config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub domain: String,
    pub record_type: String,
    pub record_name: String,
    pub record_value: String,
    pub ttl: i64,
}

impl UpdateRequest {
    pub fn new(
        domain: impl Into<String>,
        record_type: impl Into<String>,
        record_name: impl Into<String>,
        record_value: impl Into<String>,
        ttl: i64,
    ) -> Self {
        Self {
            domain: domain.into(),
            record_type: record_type.into(),
            record_name: record_name.into(),
            record_value: record_value.into(),
            ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_parsing() {
        assert_eq!("A".parse::<RecordType>().unwrap(), RecordType::A);
        assert_eq!("AAAA".parse::<RecordType>().unwrap(), RecordType::Aaaa);

        for unsupported in ["CNAME", "TXT", "MX", "a", "aaaa", "", " A"] {
            match unsupported.parse::<RecordType>() {
                Err(Error::UnsupportedRecordType(t)) => assert_eq!(t, unsupported),
                other => {
                    panic!("expected UnsupportedRecordType for {unsupported:?}, got {other:?}")
                }
            }
        }
    }

    #[test]
    fn test_record_type_display() {
        assert_eq!(RecordType::A.to_string(), "A");
        assert_eq!(RecordType::Aaaa.to_string(), "AAAA");
    }

    #[test]
    fn test_record_data_parse() {
        let a = RecordData::parse(RecordType::A, "203.0.113.5").unwrap();
        assert_eq!(a.address(), IpAddr::V4(Ipv4Addr::new(203, 0, 113, 5)));
        assert_eq!(a.record_type(), RecordType::A);

        let aaaa = RecordData::parse(RecordType::Aaaa, "2001:db8::1").unwrap();
        assert_eq!(aaaa.record_type(), RecordType::Aaaa);
        assert_eq!(aaaa.address(), "2001:db8::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_record_data_rejects_wrong_family() {
        let err = RecordData::parse(RecordType::A, "2001:db8::1").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRecordValue { ref record_type, .. } if record_type == "A"
        ));

        let err = RecordData::parse(RecordType::Aaaa, "203.0.113.5").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRecordValue { ref record_type, .. } if record_type == "AAAA"
        ));

        assert!(RecordData::parse(RecordType::A, "www.example.com").is_err());
        assert!(RecordData::parse(RecordType::A, "203.0.113").is_err());
        assert!(RecordData::parse(RecordType::A, "203.0.113.5.1").is_err());
        assert!(RecordData::parse(RecordType::A, "256.0.0.1").is_err());
        assert!(RecordData::parse(RecordType::Aaaa, "fe80::1%").is_err());
    }

    #[test]
    fn test_record_data_keeps_supplied_literal() {
        let aaaa = RecordData::parse(RecordType::Aaaa, "2001:DB8::0001").unwrap();
        assert_eq!(aaaa.literal(), "2001:DB8::0001");
        assert_eq!(aaaa.address(), "2001:db8::1".parse::<IpAddr>().unwrap());

        let padded = RecordData::parse(RecordType::A, "010.0.0.1").unwrap();
        assert_eq!(padded.literal(), "010.0.0.1");
        assert_eq!(padded.address(), IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));

        let scoped = RecordData::parse(RecordType::Aaaa, "fe80::1%eth0").unwrap();
        assert_eq!(scoped.literal(), "fe80::1%eth0");
        assert_eq!(scoped.address(), "fe80::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_record_set_type_follows_data() {
        let set = RecordSet::new("www", 300, RecordData::from("::1".parse::<IpAddr>().unwrap()));
        assert_eq!(set.record_type(), RecordType::Aaaa);
        assert_eq!(set.ttl, 300);
    }
}
