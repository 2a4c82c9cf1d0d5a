use hex_literal::hex;
use pcapng_codec::*;
use std::io::Cursor;

// Section Header Block, little-endian, V1.0, no options
const SHB_LE: &[u8] = &hex!(
    "0a 0d 0d 0a 1c 00 00 00 4d 3c 2b 1a 01 00 00 00
     ff ff ff ff ff ff ff ff 1c 00 00 00"
);
// Section Header Block, big-endian, V1.0, no options
const SHB_BE: &[u8] = &hex!(
    "0a 0d 0d 0a 00 00 00 1c 1a 2b 3c 4d 00 01 00 00
     ff ff ff ff ff ff ff ff 00 00 00 1c"
);
// Section Header Block, little-endian, V2.0
const SHB_V2_LE: &[u8] = &hex!(
    "0a 0d 0d 0a 1c 00 00 00 4d 3c 2b 1a 02 00 00 00
     ff ff ff ff ff ff ff ff 1c 00 00 00"
);
// Interface Description Block, little-endian, ethernet, snaplen 65535
const IDB_LE: &[u8] = &hex!("01 00 00 00 14 00 00 00 01 00 00 00 ff ff 00 00 14 00 00 00");
// Interface Description Block, big-endian, ethernet, snaplen 65535
const IDB_BE: &[u8] = &hex!("00 00 00 01 00 00 00 14 00 01 00 00 00 00 ff ff 00 00 00 14");
// Interface Description Block, little-endian, snaplen 70000
const IDB_SNAPLEN_LE: &[u8] = &hex!("01 00 00 00 14 00 00 00 01 00 00 00 70 11 01 00 14 00 00 00");
// Interface Description Block, little-endian, if_fcslen 4
const IDB_FCS_LE: &[u8] = &hex!(
    "01 00 00 00 20 00 00 00 01 00 00 00 ff ff 00 00
     0d 00 01 00 04 00 00 00 00 00 00 00 20 00 00 00"
);
// Interface Description Block, little-endian: comment "abc", end of options, then if_name
// "eth0", still inside the declared length
const IDB_END_OPT_LE: &[u8] = &hex!(
    "01 00 00 00 28 00 00 00 01 00 00 00 ff ff 00 00
     01 00 03 00 61 62 63 00 00 00 00 00
     02 00 04 00 65 74 68 30 28 00 00 00"
);
// Simple Packet Block, little-endian, 4 bytes of data
const SPB_LE: &[u8] = &hex!("03 00 00 00 14 00 00 00 04 00 00 00 de ad be ef 14 00 00 00");
// Enhanced Packet Block, little-endian, caplen 5
const EPB_LE: &[u8] = &hex!(
    "06 00 00 00 28 00 00 00 00 00 00 00 00 00 00 00
     00 00 00 00 05 00 00 00 05 00 00 00 01 02 03 04
     05 00 00 00 28 00 00 00"
);
// Enhanced Packet Block, big-endian, caplen 5
const EPB_BE: &[u8] = &hex!(
    "00 00 00 06 00 00 00 28 00 00 00 00 00 00 00 00
     00 00 00 00 00 00 00 05 00 00 00 05 01 02 03 04
     05 00 00 00 00 00 00 28"
);

fn reader(parts: &[&[u8]]) -> PcapNGReader<Cursor<Vec<u8>>> {
    PcapNGReader::new(Cursor::new(parts.concat()))
}

#[test]
fn test_epb_round_trip() {
    let mut file = Vec::new();
    let mut writer = PcapNGWriter::new(&mut file, Linktype::RAW, 1500).expect("writer");
    let record = PacketRecord {
        caplen: 7,
        origlen: 1200,
        ts_sec: 1_700_000_000,
        ts_frac: 123_456,
        comment: Some("first".to_owned()),
        flags: Some(0x1),
        drop_count: Some(12),
        ..PacketRecord::default()
    };
    let payload = b"\x45\x00\x00\x1c\xaa\xbb\xcc";
    writer.write_packet(&record, payload).expect("write_packet");
    let bytes_dumped = writer.bytes_dumped();
    drop(writer);
    assert_eq!(bytes_dumped, file.len() as u64);

    let mut reader = PcapNGReader::from_reader(Cursor::new(file)).expect("open");
    let info = reader.info().expect("info");
    assert_eq!(info.get_datalink(), Linktype::RAW);
    assert_eq!(info.get_snaplen(), 1500);
    let (_, read) = reader.next_packet().expect("packet");
    assert_eq!(reader.data(), &payload[..]);
    assert_eq!(read.caplen, record.caplen);
    assert_eq!(read.origlen, record.origlen);
    assert_eq!((read.ts_sec, read.ts_frac), (record.ts_sec, record.ts_frac));
    assert_eq!(read.comment, record.comment);
    assert_eq!(read.flags, record.flags);
    assert_eq!(read.drop_count, record.drop_count);
    assert!(matches!(reader.next_packet(), Err(PcapError::Eof)));
}

#[test]
fn test_epb_round_trip_nanoseconds() {
    let mut file = Vec::new();
    let mut writer =
        PcapNGWriter::with_precision(&mut file, Linktype::ETHERNET, 65535, TsPrecision::Nano)
            .expect("writer");
    let record = PacketRecord {
        caplen: 1,
        origlen: 1,
        ts_sec: 1_340_954_905,
        ts_frac: 298_858_123,
        ..PacketRecord::default()
    };
    writer.write_packet(&record, &[0xff]).expect("write_packet");
    drop(writer);
    let mut reader = PcapNGReader::from_reader(Cursor::new(file)).expect("open");
    assert_eq!(reader.info().unwrap().ts_precision, TsPrecision::Nano);
    let (_, read) = reader.next_packet().expect("packet");
    assert_eq!((read.ts_sec, read.ts_frac), (1_340_954_905, 298_858_123));
}

#[test]
fn test_padding_before_trailer() {
    for caplen in 0..=9usize {
        let data: Vec<u8> = (1..=caplen as u8).collect();
        let pb = PacketBlock::enhanced(0, 0, caplen as u32, caplen as u32);
        let mut out = Vec::new();
        let sz = write_block(&mut out, &Block::Packet(pb), &data).expect("write_block");
        assert_eq!(sz, out.len());
        assert_eq!(out.len() % 4, 0);
        let expected_padding = (4 - caplen % 4) % 4;
        // header (8) + fixed (20) + data + padding + trailer (4)
        assert_eq!(out.len(), 32 + caplen + expected_padding);
        let padding = &out[28 + caplen..out.len() - 4];
        assert_eq!(padding.len(), expected_padding);
        assert!(padding.iter().all(|&b| b == 0));
    }
}

#[test]
fn test_caplen_5_has_3_padding_bytes() {
    let pb = PacketBlock::enhanced(0, 0, 5, 5);
    let mut out = Vec::new();
    write_block(&mut out, &Block::Packet(pb), &[1, 2, 3, 4, 5]).expect("write_block");
    assert_eq!(&out[28..33], &[1, 2, 3, 4, 5]);
    assert_eq!(&out[33..36], &[0, 0, 0]);
    assert_eq!(&out[36..40], &40u32.to_ne_bytes());
}

#[test]
fn test_byte_order_magic() {
    for (parts, be) in &[([SHB_LE, IDB_LE, EPB_LE], false), ([SHB_BE, IDB_BE, EPB_BE], true)] {
        let mut r = reader(parts);
        r.open().expect("open");
        let swapped = *be != cfg!(target_endian = "big");
        assert_eq!(r.session().byte_swapped, swapped);
        assert_eq!(r.info().unwrap().section.byte_swapped, swapped);
        assert_eq!(r.info().unwrap().linktype, Linktype::ETHERNET);
        assert_eq!(r.info().unwrap().snaplen, 65535);
        let (offset, record) = r.next_packet().expect("packet");
        assert_eq!(offset, 48);
        assert_eq!(record.caplen, 5);
        assert_eq!(record.origlen, 5);
        assert_eq!(r.data(), &[1, 2, 3, 4, 5]);
    }
}

#[test]
fn test_unsupported_version() {
    let mut r = reader(&[SHB_V2_LE, IDB_LE]);
    let res = r.open();
    assert!(matches!(
        res,
        Err(PcapError::UnsupportedVersion { major: 2, minor: 0 })
    ));
    assert_eq!(r.state(), ReaderState::Closed);
    assert!(r.info().is_none());
}

#[test]
fn test_snaplen_too_large() {
    let mut r = reader(&[SHB_LE, IDB_SNAPLEN_LE]);
    let res = r.open();
    assert!(matches!(res, Err(PcapError::SnaplenTooLarge(70000))));
    assert!(res.unwrap_err().is_format_error());
    assert_eq!(r.state(), ReaderState::Closed);
}

#[test]
fn test_options_stop_at_end_marker() {
    let mut r = reader(&[SHB_LE, IDB_END_OPT_LE, EPB_LE]);
    let info = r.open().expect("open");
    assert_eq!(info.interface.comment.as_deref(), Some("abc"));
    assert_eq!(info.interface.if_name, None);
    // the trailer was found after the ignored bytes
    let (offset, _) = r.next_packet().expect("packet");
    assert_eq!(offset, 28 + 40);
}

#[test]
fn test_open_minimal_file() {
    let mut r = reader(&[SHB_LE, IDB_LE]);
    assert_eq!(r.state(), ReaderState::Unopened);
    let info = r.open().expect("open");
    assert_eq!(info.linktype, Linktype::ETHERNET);
    assert_eq!(info.linktype.0, 1);
    assert_eq!(info.ts_precision, TsPrecision::Micro);
    assert_eq!(info.section.section_len, -1);
    assert_eq!(info.interface.if_fcslen, -1);
    assert_eq!(r.state(), ReaderState::Ready);
    assert_eq!(r.session().version_major, 1);
    assert!(matches!(r.next_packet(), Err(PcapError::Eof)));
}

#[test]
fn test_open_second_block_not_idb() {
    let mut r = reader(&[SHB_LE, SPB_LE, IDB_LE]);
    let res = r.open();
    assert!(matches!(
        res,
        Err(PcapError::UnexpectedBlock {
            found: SPB_MAGIC,
            ..
        })
    ));
    assert_eq!(r.state(), ReaderState::Closed);
    assert!(matches!(
        r.next_packet(),
        Err(PcapError::InvalidState(_))
    ));
}

#[test]
fn test_open_first_block_not_shb() {
    let mut r = reader(&[IDB_LE, SHB_LE]);
    let res = r.open();
    assert!(matches!(
        res,
        Err(PcapError::UnexpectedBlock {
            found: IDB_MAGIC,
            ..
        })
    ));
}

#[test]
fn test_fcs_len_from_interface() {
    let idb_fcs2: Vec<u8> = {
        let mut v = IDB_FCS_LE.to_vec();
        v[20] = 2;
        v
    };
    let mut r = reader(&[SHB_LE, IDB_FCS_LE, EPB_LE, EPB_LE, &idb_fcs2[..], EPB_LE]);
    let info = r.open().expect("open");
    assert_eq!(info.interface.if_fcslen, 4);
    let (_, p1) = r.next_packet().expect("packet");
    let (_, p2) = r.next_packet().expect("packet");
    assert_eq!(p1.fcs_len, 4);
    assert_eq!(p2.fcs_len, 4);
    let (_, p3) = r.next_packet().expect("packet");
    assert_eq!(p3.fcs_len, 2);
    assert_eq!(r.session().fcs_len, 2);
}

#[test]
fn test_read_block_sequence() {
    let file = [SHB_LE, IDB_LE, SPB_LE, EPB_LE].concat();
    let mut input = Cursor::new(file);
    let mut state = SessionState::new();
    let config = ReaderConfig::default();
    let mut data = Vec::new();
    let mut types = Vec::new();
    let mut total = 0;
    loop {
        match read_block(&mut input, &mut state, &config, &mut data) {
            Ok((block, sz)) => {
                types.push(block.block_type());
                total += sz;
            }
            Err(PcapError::Eof) => break,
            Err(e) => panic!("error while reading: {:?}", e),
        }
    }
    assert_eq!(types, vec![SHB_MAGIC, IDB_MAGIC, SPB_MAGIC, EPB_MAGIC]);
    assert_eq!(total, 28 + 20 + 20 + 40);
    assert_eq!(data, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_option_too_long() {
    let mut r = PcapNGReader::with_config(
        Cursor::new([SHB_LE, IDB_END_OPT_LE].concat()),
        ReaderConfig::default().with_max_option_len(2),
    );
    let res = r.open();
    assert!(matches!(
        res,
        Err(PcapError::OptionTooLong {
            code: 1,
            len: 3,
            max: 2
        })
    ));
}

#[test]
fn test_write_header_blocks() {
    let shb = SectionHeaderBlock {
        hardware: Some("x86_64".to_owned()),
        os: Some("Linux".to_owned()),
        user_appl: Some("pcapng-codec".to_owned()),
        ..SectionHeaderBlock::default()
    };
    let idb = InterfaceDescriptionBlock {
        if_name: Some("eth0".to_owned()),
        if_description: Some("wired".to_owned()),
        if_os: Some("Linux 6.1".to_owned()),
        if_speed: Some(1_000_000_000),
        if_fcslen: 4,
        ..InterfaceDescriptionBlock::new(Linktype::ETHERNET, 262144)
    };
    let mut file = Vec::new();
    write_block(&mut file, &Block::SectionHeader(shb.clone()), &[]).expect("SHB");
    write_block(&mut file, &Block::InterfaceDescription(idb.clone()), &[]).expect("IDB");

    let mut r = PcapNGReader::with_config(
        Cursor::new(file),
        ReaderConfig::default().with_max_snaplen(262144),
    );
    let info = r.open().expect("open");
    assert_eq!(info.section, shb);
    assert_eq!(info.interface, idb);
    assert_eq!(r.session().fcs_len, 4);
}
