//! Link, network and encapsulation headers needed to find the transport protocol
//!
//! Only the fields used for classification are decoded. All parsers work on complete
//! buffers: a short input is an error, never a partial read.

use nom::bytes::complete::take;
use nom::combinator::verify;
use nom::number::complete::{be_u16, be_u32, be_u8};
use nom::IResult;

use crate::protocol::*;

/// IEEE 802.1Q tag following the outer EtherType
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VlanTag {
    /// Priority code point, drop eligible indicator and VLAN identifier
    pub tci: u16,
    /// EtherType of the encapsulated frame
    pub ethertype: EtherType,
}

/// Fields of the IPv4 header used to walk to the transport layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ipv4Header {
    /// Header length in bytes (IHL * 4)
    pub header_len: usize,
    pub total_length: u16,
    pub protocol: IpProtocol,
}

/// Fields of the fixed IPv6 header used to walk to the transport layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ipv6Header {
    pub payload_length: u16,
    pub next_header: IpProtocol,
}

/// IPv6 fragment extension header (RFC 8200 section 4.5)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentHeader {
    pub next_header: IpProtocol,
    /// Offset of this fragment, in 8-byte units
    pub fragment_offset: u16,
    pub more_fragments: bool,
    pub identification: u32,
}

/// ESP header (RFC 4303)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EspHeader {
    pub spi: u32,
    pub sequence: u32,
}

/// ESP trailer, read from the end of the packet
///
/// The integrity check value is assumed to be `ESP_AUTH_LEN` bytes long.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EspTrailer<'a> {
    pub pad_length: u8,
    /// Protocol of the encapsulated payload
    pub next_header: IpProtocol,
    pub icv: &'a [u8],
}

/// Read an Ethernet II header, returning the EtherType
pub fn parse_ethernet_header(i: &[u8]) -> IResult<&[u8], EtherType> {
    let (i, _addresses) = take(12usize)(i)?;
    let (i, ethertype) = be_u16(i)?;
    Ok((i, EtherType(ethertype)))
}

/// Read an IEEE 802.1Q tag (the 4 bytes following the 0x8100 EtherType)
pub fn parse_vlan_tag(i: &[u8]) -> IResult<&[u8], VlanTag> {
    let (i, tci) = be_u16(i)?;
    let (i, ethertype) = be_u16(i)?;
    let tag = VlanTag {
        tci,
        ethertype: EtherType(ethertype),
    };
    Ok((i, tag))
}

/// Read an IPv4 header, including options
pub fn parse_ipv4_header(i: &[u8]) -> IResult<&[u8], Ipv4Header> {
    let (i, version_ihl) = verify(be_u8, |&b: &u8| b >> 4 == 4 && b & 0x0f >= 5)(i)?;
    let (i, _tos) = be_u8(i)?;
    let (i, total_length) = be_u16(i)?;
    let (i, _identification) = be_u16(i)?;
    let (i, _flags_fragment) = be_u16(i)?;
    let (i, _ttl) = be_u8(i)?;
    let (i, protocol) = be_u8(i)?;
    let (i, _checksum) = be_u16(i)?;
    let (i, _addresses) = take(8usize)(i)?;
    let header_len = ((version_ihl & 0x0f) as usize) * 4;
    let (i, _options) = take(header_len - IPV4_MIN_HEADER_LEN)(i)?;
    let header = Ipv4Header {
        header_len,
        total_length,
        protocol: IpProtocol(protocol),
    };
    Ok((i, header))
}

/// Read the fixed part of an IPv6 header
pub fn parse_ipv6_header(i: &[u8]) -> IResult<&[u8], Ipv6Header> {
    let (i, _vtcfl) = verify(be_u32, |&w: &u32| w >> 28 == 6)(i)?;
    let (i, payload_length) = be_u16(i)?;
    let (i, next_header) = be_u8(i)?;
    let (i, _hop_limit) = be_u8(i)?;
    let (i, _addresses) = take(32usize)(i)?;
    let header = Ipv6Header {
        payload_length,
        next_header: IpProtocol(next_header),
    };
    Ok((i, header))
}

/// Read an IPv6 fragment extension header
pub fn parse_ipv6_fragment_header(i: &[u8]) -> IResult<&[u8], FragmentHeader> {
    let (i, next_header) = be_u8(i)?;
    let (i, _reserved) = be_u8(i)?;
    let (i, offset_flags) = be_u16(i)?;
    let (i, identification) = be_u32(i)?;
    let header = FragmentHeader {
        next_header: IpProtocol(next_header),
        fragment_offset: offset_flags >> 3,
        more_fragments: offset_flags & 1 != 0,
        identification,
    };
    Ok((i, header))
}

/// Read a TCP header, returning the header length from the data offset field
///
/// Options are skipped. Fails if the data offset is below 5 words.
pub fn parse_tcp_header(i: &[u8]) -> IResult<&[u8], usize> {
    let (_, fixed) = verify(take(TCP_MIN_HEADER_LEN), |h: &[u8]| h[12] >> 4 >= 5)(i)?;
    let header_len = usize::from(fixed[12] >> 4) * 4;
    let (i, _) = take(header_len)(i)?;
    Ok((i, header_len))
}

/// Read an ESP header
pub fn parse_esp_header(i: &[u8]) -> IResult<&[u8], EspHeader> {
    let (i, spi) = be_u32(i)?;
    let (i, sequence) = be_u32(i)?;
    Ok((i, EspHeader { spi, sequence }))
}

/// Read an ESP trailer: pad length, next header, then the integrity check value
pub fn parse_esp_trailer(i: &[u8]) -> IResult<&[u8], EspTrailer> {
    let (i, pad_length) = be_u8(i)?;
    let (i, next_header) = be_u8(i)?;
    let (i, icv) = take(ESP_AUTH_LEN)(i)?;
    let trailer = EspTrailer {
        pad_length,
        next_header: IpProtocol(next_header),
        icv,
    };
    Ok((i, trailer))
}

/// Locate and decode the ESP trailer at the end of `packet`
///
/// Returns `None` if the packet is shorter than the trailer.
pub fn esp_trailer(packet: &[u8]) -> Option<EspTrailer> {
    let start = packet.len().checked_sub(ESP_TRAILER_LEN)?;
    parse_esp_trailer(&packet[start..]).ok().map(|(_, trailer)| trailer)
}
