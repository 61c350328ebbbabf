use rusticata_macros::newtype_enum;

/// Ethernet frame payload type
///
/// See <https://www.iana.org/assignments/ieee-802-numbers/ieee-802-numbers.xhtml>
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EtherType(pub u16);

newtype_enum! {
impl display EtherType {
    IPV4 = 0x0800,
    // IEEE 802.1Q VLAN tag
    VLAN = 0x8100,
    IPV6 = 0x86dd,
}
}

/// IP protocol number (IPv4 `protocol` field, IPv6 `next header` field)
///
/// See <https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml>
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IpProtocol(pub u8);

newtype_enum! {
impl display IpProtocol {
    TCP = 6,
    UDP = 17,
    // IPv6 fragment extension header
    IPV6_FRAGMENT = 44,
    // IPsec Encapsulating Security Payload
    ESP = 50,
}
}

/// Length of an Ethernet II header (destination, source, ethertype)
pub const ETHERNET_HEADER_LEN: usize = 14;
/// Length of an IEEE 802.1Q tag
pub const VLAN_TAG_LEN: usize = 4;
/// Minimum length of an IPv4 header (no options)
pub const IPV4_MIN_HEADER_LEN: usize = 20;
/// Length of the fixed IPv6 header
pub const IPV6_HEADER_LEN: usize = 40;
/// Length of the IPv6 fragment extension header
pub const IPV6_FRAGMENT_HEADER_LEN: usize = 8;
/// Length of the ESP header (SPI + sequence number)
pub const ESP_HEADER_LEN: usize = 8;
/// Length of the ESP integrity check value appended after the trailer
pub const ESP_AUTH_LEN: usize = 12;
/// ESP trailer as seen from the end of the packet: pad length, next header, ICV
pub const ESP_TRAILER_LEN: usize = ESP_AUTH_LEN + 2;
/// Length of a UDP header
pub const UDP_HEADER_LEN: usize = 8;
/// Minimum length of a TCP header (no options)
pub const TCP_MIN_HEADER_LEN: usize = 20;
/// Minimum length of an RTP header
pub const RTP_MIN_HEADER_LEN: usize = 12;
