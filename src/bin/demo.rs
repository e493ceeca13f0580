//! gamebeat demo: play the procedural soundtrack, firing each cue.
//!
//! Usage:
//!   cargo run --bin gamebeat-demo                 (live playback, ~12s)
//!   cargo run --bin gamebeat-demo -- --wav out.wav

use gamebeat::{render_to_wav, EffectKind, SoundEngine};
use std::time::Duration;
use std::{env, fs};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let wav_path = args
        .iter()
        .position(|a| a == "--wav")
        .and_then(|i| args.get(i + 1))
        .cloned();

    match wav_path {
        Some(path) => export_wav(&path),
        None => play_live(),
    }
}

fn export_wav(path: &str) {
    const SAMPLE_RATE: u32 = 44100;
    // Twelve seconds of loop with each cue fired along the way
    let effects = [
        (3 * SAMPLE_RATE as usize, EffectKind::Success),
        (6 * SAMPLE_RATE as usize, EffectKind::Failure),
        (9 * SAMPLE_RATE as usize, EffectKind::Impact),
    ];
    let wav = render_to_wav(SAMPLE_RATE, 12, &effects);

    if let Err(e) = fs::write(path, &wav) {
        eprintln!("Failed to write {}: {}", path, e);
        std::process::exit(1);
    }
    println!("Wrote {} ({} bytes)", path, wav.len());
}

fn play_live() {
    let mut engine = SoundEngine::new();

    println!("Starting ambient loop...");
    engine.start_ambient();
    std::thread::sleep(Duration::from_secs(3));

    for kind in [EffectKind::Success, EffectKind::Failure, EffectKind::Impact] {
        println!("Cue: {:?}", kind);
        engine.play_effect(kind);
        std::thread::sleep(Duration::from_secs(3));
    }

    println!("Stopping.");
    engine.stop_ambient();
    std::thread::sleep(Duration::from_millis(500));
}
