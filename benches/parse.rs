use criterion::{criterion_group, criterion_main, Criterion};
use std::fs;
use voip_parser::sip::{parse_sip, MediaParseMode, ParserConfig, SipParser};

fn bench_parse_sip(c: &mut Criterion) {
    let invite = fs::read("assets/invite.sip").unwrap();
    let ringing = fs::read("assets/ringing.sip").unwrap();
    c.bench_function("parse_sip invite", |b| b.iter(|| parse_sip(&invite)));
    c.bench_function("parse_sip ringing", |b| b.iter(|| parse_sip(&ringing)));

    let parser = SipParser::new(ParserConfig {
        keep_source: false,
        skip_sdp: false,
        media_mode: MediaParseMode::Full,
    });
    c.bench_function("parse_sip invite full media, no source", |b| {
        b.iter(|| parser.parse(&invite))
    });
}

criterion_group!(benches, bench_parse_sip);
criterion_main!(benches);
