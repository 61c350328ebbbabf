use voip_parser::sip::*;

static INVITE: &[u8] = b"INVITE sip:+971543220428@ims.etisalat.ae;user=phone SIP/2.0\r\n\
Via: SIP/2.0/TCP 10.238.235.250:5082;branch=z9hG4bK1602159045-231147484\r\n\
Route: <sip:3Zqkv7%25bqGiaaaaaesxUI6aUWY55KhndapjxCoyicWaasip%3A%2B97143402069%40ims.etisalat.aeOQ7scGeaebC@10.238.235.245:5060;lr>\r\n\
Max-Forwards: 67\r\n\
Allow: REGISTER,REFER,NOTIFY,SUBSCRIBE,PRACK,PUBLISH,INFO,UPDATE,INVITE,ACK,OPTIONS,CANCEL,BYE\r\n\
From: sip:+97142323337@ims.etisalat.ae;tag=p65552t1566904455m976145c672395355s1_1602159063-1917554917\r\n\
To: <sip:0543220428@ims.etisalat.ae;user=phone>\r\n\
Call-ID: p65552t1566904455m976145c672395355s2\r\n\
CSeq: 1 INVITE\r\n\
Min-SE: 900\r\n\
Session-Expires: 1800\r\n\
Supported: timer,replaces\r\n\
Contact: sip:p65552t1566904455m976145c672395355s1@10.238.235.250:5082;+g.3gpp.icsi-ref=\"urn%3Aurn-7%3A3gpp-service.ims.icsi.mmtel\"\r\n\
Privacy: none\r\n\
P-Visited-Network-ID: ims.etisalat.ae\r\n\
P-Served-User: sip:+97143402069@ims.etisalat.ae;sescase=orig;regstate=reg\r\n\
Session-ID:589f328469aa6aabb25618691a776b74\
Accept-Contact: *;+g.3gpp.icsi-ref=\"urn%3Aurn-7%3A3gpp-service.ims.icsi.mmtel\"\r\n\
P-Early-Media: supported\r\n\
Accept: application/sdp\r\n\
P-Charging-Function-Addresses: ccf=\"aaa://mmec.ims.etisalat.ae:3868;transport=tcp\"\r\n\
P-Charging-Vector: icid-value=sbg03-sgc4.ims.etisalat.ae-1566-904455-981125;icid-generated-at=sbg03-sgc4.ims.etisalat.ae;orig-ioi=ims.etisalat.ae\r\n\
P-Asserted-Identity: <sip:+97142323337@ims.etisalat.ae>\r\n\
P-Access-Network-Info: ADSL2+;sbc-domain=ims.etisalat.ae;ue-ip=10.130.61.63;network-provided;e2down.ims.etisalat.ae\r\n\
Allow-Events: hold,talk\r\n\
Content-Type: application/sdp\r\n\
Content-Length: 260\r\n\
v=0\r\n\
o=- 78109303 1602158753 IN IP4 10.238.235.250\r\n\
s=Session SDP\r\n\
c=IN IP4 10.238.238.46\r\n\
t=0 0\r\n\
m=audio 48008 RTP/AVP 8 18 101\r\n\
a=rtpmap:8 PCMA/8000\r\n\
a=rtpmap:18 G729/8000\r\n\
a=fmtp:18 annexb=no\r\n\
a=rtpmap:101 telephone-event/8000\r\n\
a=fmtp:101 0-15\r\n\
a=ptime:20\r\n";

static RINGING: &[u8] = b"SIP/2.0 180 Ringing\r\n\
Via: SIP/2.0/UDP 10.10.1.13:5060;branch=z9hG4bK-524287-1---5e0b2e5c9a3b8e42\r\n\
f: \"Alice\" <sip:alice@ims.example.net>;tag=1928301774\r\n\
t: <tel:+15551230000>;tag=a6c85cf\r\n\
i: a84b4c76e66710@pc33.ims.example.net\r\n\
P-Access-Network-Info: 3GPP-UTRAN-FDD; utran-cell-id-3gpp=23415D0FCE11;\"cgi-3gpp=2341\"\r\n\
P-Access-Network-Info: 3GPP-E-UTRAN-FDD; utran-cell-id-3gpp=99999999999999\r\n\
Content-Length: 0\r\n\r\n";

#[test]
fn invite_with_sdp() {
    let sip = parse_sip(INVITE);

    assert!(sip.is_sip());
    assert_eq!(sip.request.method, b"INVITE");
    assert_eq!(sip.request.user, b"+971543220428");
    assert_eq!(sip.request.host, b"ims.etisalat.ae");
    assert_eq!(sip.request.user_type, b"phone");
    assert_eq!(sip.to.user, b"0543220428");
    assert_eq!(sip.to.user_type, b"phone");
    assert_eq!(sip.from.user, b"+97142323337");
    assert_eq!(sip.from.host, b"ims.etisalat.ae");
    assert_eq!(
        sip.from.tag,
        &b"p65552t1566904455m976145c672395355s1_1602159063-1917554917"[..]
    );
    assert_eq!(sip.call_id.value, b"p65552t1566904455m976145c672395355s2");
    // P-Access-Network-Info is present, but carries no cell id
    assert_eq!(sip.cell_id.value, b"");
    assert!(sip.cell_id.src.starts_with(b"ADSL2+;"));
    assert_eq!(sip.sdp.conn_data.conn_addr, b"10.238.238.46");
    assert_eq!(sip.sdp.conn_data.addr_type, b"IP4");
    assert_eq!(sip.sdp.media_desc.media_type, b"audio");
    assert_eq!(sip.sdp.media_desc.port, b"48008");
    assert_eq!(sip.sdp.media_desc.proto, b"");
}

#[test]
fn response_with_compact_headers_and_cell_id() {
    let sip = parse_sip(RINGING);

    assert!(sip.request.is_response());
    assert_eq!(sip.request.status_code, b"180");
    assert_eq!(sip.request.status_desc, b"Ringing");
    assert_eq!(sip.from.name, b"Alice");
    assert_eq!(sip.from.user, b"alice");
    assert_eq!(sip.from.tag, b"1928301774");
    assert_eq!(sip.to.uri_type, Some(UriType::Tel));
    assert_eq!(sip.to.user, b"+15551230000");
    assert_eq!(sip.to.tag, b"a6c85cf");
    assert_eq!(sip.call_id.value, b"a84b4c76e66710@pc33.ims.example.net");
    // first cell id wins
    assert_eq!(sip.cell_id.value, b"23415D0FCE11");
    assert!(sip.cell_id.src.starts_with(b"3GPP-UTRAN-FDD;"));
    assert_eq!(sip.sdp, SdpMessage::default());
}

#[test]
fn short_cell_id_is_ignored() {
    let data = b"MESSAGE sip:user2@domain.com SIP/2.0\r\n\
P-Access-Network-Info: 3GPP-UTRAN-FDD;utran-cell-id-3gpp=234150D0F\r\n\
P-Access-Network-Info: 3GPP-UTRAN-FDD;utran-cell-id-3gpp=234150D0FC\r\n";
    let sip = parse_sip(data);
    assert_eq!(sip.cell_id.value, b"234150D0FC");
}

#[test]
fn parser_config() {
    let parser = SipParser::new(ParserConfig {
        keep_source: false,
        skip_sdp: false,
        media_mode: MediaParseMode::Full,
    });
    let sip = parser.parse(INVITE);
    assert_eq!(sip.request.src, b"");
    assert_eq!(sip.to.src, b"");
    assert_eq!(sip.call_id.src, b"");
    assert_eq!(sip.cell_id.src, b"");
    assert_eq!(sip.sdp.media_desc.src, b"");
    assert_eq!(sip.sdp.media_desc.proto, b"RTP/AVP");
    assert_eq!(sip.sdp.media_desc.fmt, b"8 18 101");
    assert_eq!(sip.call_id.value, b"p65552t1566904455m976145c672395355s2");

    let sip = parse_sip(INVITE);
    assert_eq!(sip.to.src, b"<sip:0543220428@ims.etisalat.ae;user=phone>");
    assert_eq!(sip.call_id.src, sip.call_id.value);
    assert_eq!(sip.sdp.conn_data.src, b"IN IP4 10.238.238.46");

    let parser = SipParser::new(ParserConfig {
        skip_sdp: true,
        ..ParserConfig::default()
    });
    let sip = parser.parse(INVITE);
    assert_eq!(sip.sdp, SdpMessage::default());
    assert_eq!(sip.to.user, b"0543220428");
}

#[test]
fn last_sdp_line_wins() {
    let data = b"INVITE sip:bob@example.com SIP/2.0\r\n\
Content-Type: application/sdp\r\n\
\r\n\
v=0\r\n\
c=IN IP4 192.0.2.1\r\n\
m=audio 49170 RTP/AVP 0\r\n\
c=IN IP6 2001:db8::1\r\n\
m=video 51372 RTP/AVP 99\r\n";
    let sip = parse_sip(data);
    assert_eq!(sip.sdp.conn_data.addr_type, b"IP6");
    assert_eq!(sip.sdp.conn_data.conn_addr, b"2001:db8::1");
    assert_eq!(sip.sdp.media_desc.media_type, b"video");
    assert_eq!(sip.sdp.media_desc.port, b"51372");
}

#[test]
fn update_renegotiates_media() {
    let data = b"UPDATE sip:+971543220428@10.238.235.250:5082 SIP/2.0\r\n\
From: <sip:+97142323337@ims.etisalat.ae>;tag=p65552t1566904455\r\n\
To: <sip:0543220428@ims.etisalat.ae;user=phone>;tag=sbg03\r\n\
Call-ID: p65552t1566904455m976145c672395355s2\r\n\
Content-Type: application/sdp\r\n\
\r\n\
v=0\r\n\
c=IN IP4 10.238.238.47\r\n\
m=audio 48010 RTP/AVP 8 101\r\n";
    let sip = parse_sip(data);
    assert!(sip.request.is_request());
    assert_eq!(sip.request.method, b"UPDATE");
    assert_eq!(sip.request.port, b"5082");
    assert_eq!(sip.from.tag, b"p65552t1566904455");
    assert_eq!(sip.to.user_type, b"phone");
    assert_eq!(sip.to.tag, b"sbg03");
    assert_eq!(sip.call_id.value, b"p65552t1566904455m976145c672395355s2");
    assert_eq!(sip.sdp.conn_data.conn_addr, b"10.238.238.47");
    assert_eq!(sip.sdp.media_desc.port, b"48010");
}

#[test]
fn non_sip_input_stops_after_first_line() {
    let data = b"\x01\x02 garbage\r\nCall-ID: should-not-be-read\r\nc=IN IP4 192.0.2.1\r\n";
    let sip = parse_sip(data);
    assert!(!sip.is_sip());
    assert_eq!(sip.call_id.value, b"");
    assert_eq!(sip.sdp.conn_data.conn_addr, b"");

    for data in [&b""[..], &b"\r\n\r\n"[..], &b"sip"[..], &b"\xff\xfe\xfd"[..]] {
        let sip = parse_sip(data);
        assert!(!sip.is_sip());
        assert_eq!(sip.to, SipNameAddr::default());
    }
}

#[test]
fn every_prefix_parses() {
    for len in 0..INVITE.len() {
        let sip = parse_sip(&INVITE[..len]);
        if len >= 7 {
            assert_eq!(sip.request.method, b"INVITE");
        }
    }
}

#[test]
fn field_dump() {
    let dump = parse_sip(RINGING).to_string();
    assert!(dump.starts_with("-SIP ---"));
    assert!(dump.contains("    [StatusCode] => 180\n"));
    assert!(dump.contains("  [TO]\n    [UriType] => tel\n"));
    assert!(dump.contains("    [Value] => 23415D0FCE11\n"));
}
