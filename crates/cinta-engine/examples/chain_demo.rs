//! Run a sine through the tape chain and print the level at each
//! parameter setting.
//!
//! ```sh
//! cargo run -p cinta-engine --example chain_demo
//! ```

use cinta_engine::{ParamId, TapeChain};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK: usize = 512;

fn rms(buf: &[f32]) -> f32 {
    (buf.iter().map(|s| s * s).sum::<f32>() / buf.len() as f32).sqrt()
}

fn run_seconds(chain: &mut TapeChain, seconds: f32) -> f32 {
    let frames = (SAMPLE_RATE as f32 * seconds) as usize;
    let mut out_rms = 0.0;
    let mut phase = 0.0_f32;
    for _ in 0..(frames / BLOCK) {
        let mut buf: Vec<f32> = (0..BLOCK)
            .map(|i| {
                let t = phase + i as f32;
                0.5 * (core::f32::consts::TAU * 440.0 * t / SAMPLE_RATE as f32).sin()
            })
            .collect();
        phase += BLOCK as f32;
        let mut block: [&mut [f32]; 1] = [&mut buf];
        chain.process(&mut block);
        out_rms = rms(&buf);
    }
    out_rms
}

fn main() {
    let mut chain = TapeChain::new();
    chain
        .prepare(SAMPLE_RATE, BLOCK, 1)
        .expect("valid configuration");

    println!("440 Hz sine at 0.5 through the tape chain (input RMS 0.354)");
    println!();

    for drive in [0.0, 0.25, 0.5, 1.0] {
        chain.set_parameter(ParamId::Drive, drive);
        let level = run_seconds(&mut chain, 1.0);
        println!("drive {drive:.2}  ->  output RMS {level:.3}");
    }

    chain.set_parameter(ParamId::Drive, 0.0);
    for tone in [-1.0, 0.0, 1.0] {
        chain.set_parameter(ParamId::Tone, tone);
        let level = run_seconds(&mut chain, 1.0);
        println!("tone {tone:+.1}   ->  output RMS {level:.3}");
    }

    chain.set_parameter(ParamId::Tone, 0.0);
    chain.set_parameter(ParamId::WowDepth, 0.6);
    let level = run_seconds(&mut chain, 4.0);
    println!("wow 0.60   ->  output RMS {level:.3} (pitch wobbles at 0.5 Hz)");
}
