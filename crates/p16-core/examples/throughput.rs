//! Throughput harness for the P16 core.
//!
//! Runs independent simulator instances on several threads and reports
//! retired instructions per second.
//!
//! ## Usage
//!
//! ```sh
//! cargo run -p p16-core --example throughput
//! ```

#![allow(clippy::pedantic)]

use p16_core::{run, AluOp, CoreConfig, CoreState, DecodedInstruction, GeneralRegister, JumpCondition};
use proptest as _;
use rstest as _;
use thiserror as _;
use tracing as _;

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

const NUM_THREADS: usize = 4;
const STEPS_PER_BATCH: u64 = 10_000;

#[derive(Debug, Clone, Copy)]
struct BenchmarkResult {
    name: &'static str,
    instructions_per_second: f64,
}

fn nop_loop() -> Vec<u16> {
    vec![
        DecodedInstruction::Nop.encode(),
        DecodedInstruction::Jump {
            condition: JumpCondition::Always,
            offset: -2,
        }
        .encode(),
    ]
}

fn alu_loop() -> Vec<u16> {
    use GeneralRegister::{R0, R1};

    let alu = |op| DecodedInstruction::Alu { op, rd: R0, rs: R0, rt: R1 }.encode();
    vec![
        alu(AluOp::Add),
        alu(AluOp::Sub),
        alu(AluOp::Mul),
        alu(AluOp::Xor),
        DecodedInstruction::Jump {
            condition: JumpCondition::Always,
            offset: -8,
        }
        .encode(),
    ]
}

fn benchmark(name: &'static str, program: &[u16], duration: Duration) -> BenchmarkResult {
    let (tx, rx) = mpsc::channel();

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|_| {
            let tx = tx.clone();
            let program = program.to_vec();
            thread::spawn(move || {
                let mut state = CoreState::default();
                state.load_program((0_u16..).step_by(2).zip(program));
                let config = CoreConfig::with_max_steps(STEPS_PER_BATCH);

                let mut total_instructions = 0_u64;
                let start = Instant::now();
                while start.elapsed() < duration {
                    total_instructions += run(&mut state, &config).steps;
                }

                tx.send(total_instructions).ok();
            })
        })
        .collect();

    for handle in handles {
        handle.join().ok();
    }
    drop(tx);

    let total_instructions: u64 = rx.iter().sum();

    BenchmarkResult {
        name,
        instructions_per_second: total_instructions as f64 / duration.as_secs_f64(),
    }
}

fn main() {
    let duration = Duration::from_secs(2);

    println!("P16 core throughput ({NUM_THREADS} threads, {duration:?} per benchmark)");
    for result in [
        benchmark("nop_loop", &nop_loop(), duration),
        benchmark("alu_loop", &alu_loop(), duration),
    ] {
        println!(
            "{:<10} {:>14.0} instructions/s",
            result.name, result.instructions_per_second
        );
    }
}
