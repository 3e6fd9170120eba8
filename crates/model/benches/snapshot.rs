//! Benchmarks for snapshot building
//!
//! Measures how long a full list rebuild takes for buses of different sizes,
//! and how long the endpoint detail listing takes for a wide interface.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use model::{Device, DeviceMap, Endpoint, EndpointListing, Interface, Snapshot};

fn make_bus(device_count: u32) -> DeviceMap {
    (1..=device_count)
        .map(|i| {
            let interfaces = (0..4u8)
                .rev()
                .map(|id| Interface {
                    device_id: i,
                    id,
                    alternate_setting: 0,
                    class: 0x03,
                    subclass: 0x01,
                    protocol: 0x02,
                    endpoints: vec![
                        Endpoint::new(0x82, 0x03, 10, 8),
                        Endpoint::new(0x81, 0x03, 10, 8),
                    ],
                })
                .collect();
            let name = format!("/dev/bus/usb/{:03}/{:03}", i / 128 + 1, i % 128);
            (
                name.clone(),
                Device {
                    id: i,
                    name,
                    vendor_id: 0x046d,
                    product_id: 0xc52b,
                    class: 0,
                    subclass: 0,
                    protocol: 0,
                    interfaces,
                },
            )
        })
        .collect()
}

fn benchmark_snapshot_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_build");

    for count in [1u32, 16, 127] {
        let bus = make_bus(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &bus, |b, bus| {
            b.iter(|| Snapshot::build(black_box(bus)))
        });
    }

    group.finish();
}

fn benchmark_endpoint_listing(c: &mut Criterion) {
    let iface = Interface {
        device_id: 1,
        id: 0,
        alternate_setting: 0,
        class: 0xff,
        subclass: 0,
        protocol: 0,
        endpoints: (1..=15u8)
            .rev()
            .flat_map(|n| [Endpoint::new(n | 0x80, 0x02, 0, 512), Endpoint::new(n, 0x02, 0, 512)])
            .collect(),
    };

    c.bench_function("endpoint_listing_30", |b| {
        b.iter(|| EndpointListing::build(black_box(&iface)))
    });
}

criterion_group!(benches, benchmark_snapshot_build, benchmark_endpoint_listing);
criterion_main!(benches);
