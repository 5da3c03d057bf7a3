use std::hint::black_box;
use std::time::Instant;

use motorway_common::DriveConfig;
use motorway_stream::{CullRules, StreamController, WorldPools, cull};

fn bench_populate(iterations: usize) {
    let config = DriveConfig::default();
    let start = Instant::now();
    for _ in 0..iterations {
        let mut controller = StreamController::new(&config);
        let mut pools = WorldPools::new();
        black_box(controller.populate(&mut pools));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  populate ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_drive(distance: f32, step: f32) {
    let config = DriveConfig::default();
    let rules = CullRules::from_config(&config);
    let mut controller = StreamController::new(&config);
    let mut pools = WorldPools::new();
    controller.populate(&mut pools);

    let mut z = 0.0;
    let mut updates = 0usize;
    let start = Instant::now();
    while z < distance {
        z += step;
        black_box(controller.update(black_box(z), &mut pools));
        black_box(cull(&mut pools, z, &rules));
        updates += 1;
    }
    let elapsed = start.elapsed();
    let per_update = elapsed / updates as u32;
    println!(
        "  drive {distance} units at {step}/tick ({updates} updates): {per_update:?}/update, total {elapsed:?}, live props {}",
        pools.prop_count()
    );
}

fn main() {
    println!("=== Streaming Benchmarks ===\n");

    println!("Initial window:");
    bench_populate(100);
    bench_populate(1000);

    println!("\nStreaming + culling:");
    bench_drive(10_000.0, 1.0);
    bench_drive(100_000.0, 1.0);
    bench_drive(100_000.0, 0.25);

    println!("\n=== Done ===");
}
