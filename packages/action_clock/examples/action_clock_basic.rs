//! Demonstrates nested action timing with `action_clock`.
//!
//! Set `ACTION_CLOCK_OUTPUT` to a file path to write the timings there instead of stdout.
//! Set `RUST_LOG=debug` to also see every start and close through the `log` facade.
//!
//! Run with: `cargo run --example action_clock_basic`.
#![expect(
    clippy::unseparated_literal_suffix,
    reason = "this is example code that does not need production-level polish"
)]

use std::collections::HashMap;
use std::env;
use std::fmt::Write;
use std::hint::black_box;
use std::time::Duration;

use action_clock::Session;

fn main() {
    env_logger::init();

    let session = Session::new();

    if let Ok(path) = env::var("ACTION_CLOCK_OUTPUT") {
        session.set_output_file_or_exit(path);
    }

    let rate = session.calibrate_cycle_rate(Duration::from_millis(50));
    println!("Cycle counter runs at {rate}");

    {
        let mut registry = session
            .registry_builder()
            .detailed_output(true)
            .initial_action("whole_run")
            .build();

        // Track string formatting.
        {
            let _formatting = registry.scope("string_formatting");
            let mut result = String::new();
            for i in 0..20_000 {
                write!(result, "String number {i} with some content. ").unwrap();
            }
            black_box(result);
        }

        // Track hashmap creation, with lookups nested inside.
        registry.start("hashmap");
        let mut map = HashMap::new();
        for i in 0..10_000 {
            map.insert(format!("key{i}"), i);
        }
        registry.start("lookups");
        for i in 0..10_000 {
            black_box(map.get(&format!("key{i}")));
        }
        registry.log("lookups");
        registry.log("hashmap");

        // Repeated actions accumulate into one total.
        for round in 0..5u64 {
            registry.start("computation");
            let mut sum = 0u64;
            for j in 0..200_000 {
                sum = sum.wrapping_mul(1_103_515_245).wrapping_add(j ^ round);
            }
            black_box(sum);
            registry.log("computation");
        }

        // Closing a name that was never started only warns.
        registry.log("never_started");

        // "whole_run" is still open and gets force-closed when the registry is dropped.
    }

    println!("Registry dropped; totals were reported above.");
}
