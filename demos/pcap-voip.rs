use pcap_parser::data::{get_packetdata, PacketData};
use pcap_parser::*;
use std::env;
use std::error::Error;
use std::fs::File;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use voip_parser::classifier::SignalingClassifier;
use voip_parser::identify::{Classification, Frame};
use voip_parser::sip::ParserConfig;
use voip_parser::worker::{Verdict, Worker};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // a bad pattern table is a startup error
    let classifier = match SignalingClassifier::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("could not build signaling classifier: {}", e);
            std::process::exit(1);
        }
    };
    for arg in env::args().skip(1) {
        if let Err(e) = process_file(&arg, &classifier) {
            eprintln!("{}: {}", arg, e);
        }
    }
}

fn process_file(arg: &str, classifier: &SignalingClassifier) -> Result<(), Box<dyn Error>> {
    println!("Name: {}", arg);

    let file = File::open(arg)?;
    let mut reader = create_reader(65536, file)?;
    let mut worker = Worker::new(classifier, ParserConfig::default());
    // pcapng interfaces, by id
    let mut if_linktypes = Vec::new();
    let mut legacy_linktype = Linktype::ETHERNET;
    let mut skipped = 0u64;

    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let packet = match block {
                    PcapBlockOwned::LegacyHeader(header) => {
                        legacy_linktype = header.network;
                        None
                    }
                    PcapBlockOwned::Legacy(b) => Some((b.data, legacy_linktype, b.caplen)),
                    PcapBlockOwned::NG(Block::SectionHeader(_)) => {
                        if_linktypes.clear();
                        None
                    }
                    PcapBlockOwned::NG(Block::InterfaceDescription(idb)) => {
                        if_linktypes.push(idb.linktype);
                        None
                    }
                    PcapBlockOwned::NG(Block::EnhancedPacket(epb)) => if_linktypes
                        .get(epb.if_id as usize)
                        .map(|&linktype| (epb.data, linktype, epb.caplen)),
                    PcapBlockOwned::NG(Block::SimplePacket(spb)) => if_linktypes
                        .first()
                        .map(|&linktype| (spb.data, linktype, spb.origlen)),
                    PcapBlockOwned::NG(_) => None,
                };
                if let Some((data, linktype, caplen)) = packet {
                    let caplen = (caplen as usize).min(data.len());
                    match get_packetdata(data, linktype, caplen) {
                        Some(PacketData::L2(frame)) => handle_frame(&mut worker, frame),
                        _ => {
                            debug!("skipping packet with linktype {}", linktype);
                            skipped += 1;
                        }
                    }
                }
                reader.consume(offset);
            }
            Err(PcapError::Eof) => break,
            Err(PcapError::Incomplete(_)) => {
                if let Err(e) = reader.refill() {
                    warn!("could not refill reader: {:?}", e);
                    break;
                }
            }
            Err(e) => {
                warn!("error while reading: {:?}", e);
                break;
            }
        }
    }

    let stats = worker.stats();
    println!("\tframes: {}", stats.frames());
    println!("\t\tRTP: {}", stats.class(Classification::Rtp));
    println!("\t\tTCP: {}", stats.class(Classification::Tcp));
    println!("\t\tNON_TCP: {}", stats.class(Classification::NonTcp));
    println!("\tsignaling candidates: {}", stats.signaling());
    println!("\tskipped (not ethernet): {}", skipped);

    Ok(())
}

fn handle_frame(worker: &mut Worker, data: &[u8]) {
    if let Verdict::Signaling { transport, message } = worker.process(&Frame::new(data)) {
        if message.is_sip() {
            println!("\t{} signaling:", transport);
            println!("{}", message);
        }
    }
}
