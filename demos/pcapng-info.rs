use pcapng_codec::*;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    let env_filter = EnvFilter::try_from_env("PCAPNG_LOG")
        .unwrap_or_else(|_| EnvFilter::from_default_env().add_directive(Level::WARN.into()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .init();

    for arg in env::args().skip(1) {
        if let Err(e) = print_pcapng_info(&arg) {
            eprintln!("{}: {}", arg, e);
        }
    }
}

fn print_pcapng_info(arg: &str) -> Result<(), Box<dyn Error>> {
    println!("Name: {}", arg);

    let file = File::open(arg)?;
    let file_size = file.metadata()?.len();
    println!("\tfile size: {}", file_size);

    let mut reader = PcapNGReader::new(BufReader::new(file));
    let info = reader.open()?;
    print_section_info(&info.section);
    print_interface_info(&info.interface);
    println!("\tData Link Type: {}", info.get_datalink());
    println!("\tsnaplen: {}", info.get_snaplen());
    println!("\tprecision: {:?}", info.get_ts_precision());

    let mut num_packets = 0;
    let mut num_bytes = 0u64;
    loop {
        match reader.next_packet() {
            Ok((offset, record)) => {
                println!(
                    "\t\t{:>8} {}.{} caplen {} origlen {}",
                    offset, record.ts_sec, record.ts_frac, record.caplen, record.origlen
                );
                if let Some(comment) = &record.comment {
                    println!("\t\t\tcomment: {}", comment);
                }
                num_packets += 1;
                num_bytes += u64::from(record.caplen);
            }
            Err(PcapError::Eof) => break,
            Err(e) => {
                println!("\tstopped on error: {}", e);
                break;
            }
        }
    }

    println!("\tnum_packets: {}", num_packets);
    println!("\tcaptured bytes: {}", num_bytes);

    Ok(())
}

fn print_section_info(shb: &SectionHeaderBlock) {
    println!("\tformat: Pcap-NG file");
    println!("\tVersion: {}.{}", shb.major_version, shb.minor_version);
    println!("\tbyte-swapped: {}", shb.byte_swapped);
    if let Some(hardware) = &shb.hardware {
        println!("\tshb_hardware: {}", hardware);
    }
    if let Some(os) = &shb.os {
        println!("\tshb_os: {}", os);
    }
    if let Some(user_appl) = &shb.user_appl {
        println!("\tshb_userappl: {}", user_appl);
    }
}

fn print_interface_info(idb: &InterfaceDescriptionBlock) {
    if let Some(name) = &idb.if_name {
        println!("\tif_name: {}", name);
    }
    if let Some(description) = &idb.if_description {
        println!("\tif_description: {}", description);
    }
    if let Some(os) = &idb.if_os {
        println!("\tif_os: {}", os);
    }
    if let Some(speed) = idb.if_speed {
        println!("\tif_speed: {}", speed);
    }
    println!("\tif_tsresol: {}", idb.if_tsresol);
    if idb.if_fcslen >= 0 {
        println!("\tif_fcslen: {}", idb.if_fcslen);
    }
}
