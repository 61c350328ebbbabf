use criterion::{criterion_group, criterion_main, Criterion};
use hex_literal::hex;
use voip_parser::classifier::SignalingClassifier;
use voip_parser::identify::{identify, Frame};

// Ethernet / IPv4 / UDP / RTP PT 8
const IPV4_RTP: &[u8] = &hex!(
    "
00 11 22 33 44 55 66 77 88 99 aa bb 08 00 45 00
00 2c 00 01 00 00 40 11 00 00 0a 00 00 01 0a 00
00 02 9c 40 9c 42 00 18 00 00 80 08 00 01 00 00
00 a0 12 34 56 78 d5 d5 d5 d5"
);

// Ethernet / 802.1Q / IPv6 / ESP / TCP
const VLAN_IPV6_ESP_TCP: &[u8] = &hex!(
    "
00 11 22 33 44 55 66 77 88 99 aa bb 81 00 00 64
86 dd 60 00 00 00 00 2a 32 40 20 01 0d b8 00 00
00 00 00 00 00 00 00 00 00 01 20 01 0d b8 00 00
00 00 00 00 00 00 00 00 00 02 00 00 10 01 00 00
00 07 13 c4 13 c4 00 00 00 01 00 00 00 00 50 18
ff ff 00 00 00 00 00 06 a5 a5 a5 a5 a5 a5 a5 a5
a5 a5 a5 a5"
);

fn bench_identify(c: &mut Criterion) {
    c.bench_function("identify ipv4 rtp", |b| {
        b.iter(|| identify(&Frame::new(IPV4_RTP)))
    });
    c.bench_function("identify vlan ipv6 esp tcp", |b| {
        b.iter(|| identify(&Frame::new(VLAN_IPV6_ESP_TCP)))
    });
}

fn bench_classifier(c: &mut Criterion) {
    let invite = std::fs::read("assets/invite.sip").unwrap();
    let classifier = SignalingClassifier::new().unwrap();
    let mut scratch = classifier.scratch();
    c.bench_function("is_signaling_candidate invite", |b| {
        b.iter(|| classifier.is_signaling_candidate(&invite, &mut scratch))
    });
    let noise = vec![0xd5u8; 1400];
    c.bench_function("is_signaling_candidate 1400 bytes noise", |b| {
        b.iter(|| classifier.is_signaling_candidate(&noise, &mut scratch))
    });
}

criterion_group!(benches, bench_identify, bench_classifier);
criterion_main!(benches);
