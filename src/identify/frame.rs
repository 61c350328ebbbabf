use crate::identify::headers::{parse_ethernet_header, parse_vlan_tag};
use crate::protocol::{EtherType, ETHERNET_HEADER_LEN, VLAN_TAG_LEN};

/// A borrowed view on one Ethernet frame
///
/// The frame is never copied nor modified. The VLAN flag decides whether a 802.1Q tag sits
/// between the Ethernet header and the network layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    data: &'a [u8],
    vlan: bool,
}

impl<'a> Frame<'a> {
    /// Build a frame view, detecting a single 802.1Q tag from the outer EtherType
    pub fn new(data: &'a [u8]) -> Self {
        let vlan = matches!(parse_ethernet_header(data), Ok((_, EtherType::VLAN)));
        Frame { data, vlan }
    }

    /// Build a frame view with the VLAN flag supplied by a link-layer parser
    pub fn with_vlan(data: &'a [u8], vlan: bool) -> Self {
        Frame { data, vlan }
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn has_vlan(&self) -> bool {
        self.vlan
    }

    /// Offset of the network layer header
    pub fn l3_offset(&self) -> usize {
        if self.vlan {
            ETHERNET_HEADER_LEN + VLAN_TAG_LEN
        } else {
            ETHERNET_HEADER_LEN
        }
    }

    /// EtherType of the network layer (the inner one if the frame is tagged)
    ///
    /// Returns `None` if the frame is too short to hold the link-layer headers.
    pub fn ethertype(&self) -> Option<EtherType> {
        let (rem, ethertype) = parse_ethernet_header(self.data).ok()?;
        if self.vlan {
            parse_vlan_tag(rem).ok().map(|(_, tag)| tag.ethertype)
        } else {
            Some(ethertype)
        }
    }

    /// Bytes starting at the network layer header
    pub fn l3_data(&self) -> Option<&'a [u8]> {
        self.data.get(self.l3_offset()..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn vlan_autodetect() {
        let tagged = hex!("00 11 22 33 44 55 66 77 88 99 aa bb 81 00 00 64 86 dd 60");
        let frame = Frame::new(&tagged);
        assert!(frame.has_vlan());
        assert_eq!(frame.l3_offset(), 18);
        assert_eq!(frame.ethertype(), Some(EtherType::IPV6));
        assert_eq!(frame.l3_data(), Some(&tagged[18..]));

        let untagged = hex!("00 11 22 33 44 55 66 77 88 99 aa bb 08 00 45");
        let frame = Frame::new(&untagged);
        assert!(!frame.has_vlan());
        assert_eq!(frame.ethertype(), Some(EtherType::IPV4));
    }

    #[test]
    fn short_frames() {
        let frame = Frame::new(&[0u8; 6]);
        assert!(!frame.has_vlan());
        assert_eq!(frame.ethertype(), None);
        assert_eq!(frame.l3_data(), None);
        // flag says tagged but the tag is missing
        let frame = Frame::with_vlan(&[0u8; 15], true);
        assert_eq!(frame.ethertype(), None);
    }
}
