use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pcapng_codec::{Linktype, PacketRecord, PcapError, PcapNGReader, PcapNGWriter};
use std::io::Cursor;

const NUM_PACKETS: usize = 5000;

fn build_file(packet_size: usize) -> Vec<u8> {
    let mut file = Vec::new();
    let mut writer =
        PcapNGWriter::new(&mut file, Linktype::ETHERNET, 65535).expect("could not create writer");
    let data: Vec<u8> = (0..packet_size).map(|i| i as u8).collect();
    for i in 0..NUM_PACKETS {
        let record = PacketRecord {
            caplen: packet_size as u32,
            origlen: packet_size as u32,
            ts_sec: 1_600_000_000 + i as u32,
            ..PacketRecord::default()
        };
        writer.write_packet(&record, &data).expect("write_packet");
    }
    drop(writer);
    file
}

fn do_reader_pcapng(bytes: &[u8]) {
    let mut num_packets = 0;
    let mut reader = PcapNGReader::from_reader(Cursor::new(bytes)).expect("could not create reader");
    loop {
        match reader.next_packet() {
            Ok(_) => num_packets += 1,
            Err(PcapError::Eof) => break,
            Err(e) => panic!("unexpected error {:?}", e),
        }
    }
    assert_eq!(num_packets, NUM_PACKETS);
}

fn bench_reader_pcapng(c: &mut Criterion) {
    let bytes = build_file(342);
    c.bench_function("reader_pcapng 5000 packets", |b| {
        b.iter(|| do_reader_pcapng(&bytes))
    });
}

fn bench_reader_pcapng_packet_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_pcapng packet_size");
    for packet_size in [64usize, 342, 1514, 9000].iter() {
        let bytes = build_file(*packet_size);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(packet_size),
            &bytes,
            |b, bytes| b.iter(|| do_reader_pcapng(bytes)),
        );
    }
}

fn bench_writer_pcapng(c: &mut Criterion) {
    c.bench_function("writer_pcapng 5000 packets", |b| b.iter(|| build_file(342)));
}

criterion_group!(
    benches,
    bench_reader_pcapng,
    bench_reader_pcapng_packet_size,
    bench_writer_pcapng
);
criterion_main!(benches);
