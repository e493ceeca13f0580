//! gamebeat: procedural background music and sound effects for game UIs.
//!
//! The whole soundtrack is synthesized from oscillator and noise
//! primitives; there are no audio assets. `SoundEngine` is the only
//! surface the surrounding game consumes: start the ambient loop, stop
//! it, fire a one-shot cue. Everything returns immediately; synthesis
//! runs on a dedicated render thread feeding the audio device, and a
//! missing or broken device degrades every call to a logged no-op.

mod wav;

use gb_audio::{AudioOutput, CpalOutput};
use gb_engine::Engine;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

// Re-export what callers need so they don't depend on gb-engine directly.
pub use gb_engine::{EffectKind, Engine as RenderEngine, Frame};
pub use wav::{frames_to_wav, write_wav};

/// Capacity of the game-thread → render-thread command queue.
const COMMAND_QUEUE_LEN: usize = 64;

/// Commands crossing to the render thread.
#[derive(Clone, Copy, Debug)]
enum Command {
    StartAmbient,
    StopAmbient,
    PlayEffect(EffectKind),
}

/// The engine facade: owns the render thread and the command queue.
pub struct SoundEngine {
    backend: Option<Backend>,
}

struct Backend {
    commands: HeapProd<Command>,
    stop_signal: Arc<AtomicBool>,
    /// Cleared by the render thread when it exits (device failure or stop).
    alive: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SoundEngine {
    /// Create the facade without touching the audio device. The device is
    /// brought up lazily on the first operation, which should happen in
    /// response to a real user interaction.
    pub fn new() -> Self {
        Self { backend: None }
    }

    /// Begin the procedural ambient loop. No-op if already running.
    pub fn start_ambient(&mut self) {
        self.send(Command::StartAmbient);
    }

    /// Stop the ambient loop and release its voices. Safe when not running.
    pub fn stop_ambient(&mut self) {
        // Don't bring the device up just to stop nothing.
        if self.backend_alive() {
            self.send(Command::StopAmbient);
        }
    }

    /// Fire a one-shot cue, ducking the ambient loop for the cue's fixed
    /// duration.
    pub fn play_effect(&mut self, kind: EffectKind) {
        self.send(Command::PlayEffect(kind));
    }

    /// Tear down the render thread. Called automatically on drop.
    pub fn shutdown(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            backend.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = backend.thread.take() {
                let _ = handle.join();
            }
        }
    }

    fn backend_alive(&self) -> bool {
        self.backend
            .as_ref()
            .is_some_and(|b| b.alive.load(Ordering::Relaxed))
    }

    /// Push a command, (re)starting the render thread first if it is not
    /// running, the equivalent of resuming a suspended audio context.
    /// Failures are logged and swallowed: silent gameplay beats a crash.
    fn send(&mut self, command: Command) {
        self.ensure_backend();
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if backend.commands.try_push(command).is_err() {
            log::warn!("audio command queue full; dropping {:?}", command);
        }
    }

    fn ensure_backend(&mut self) {
        if self.backend_alive() {
            return;
        }
        // A dead backend (device failure) is joined and replaced; every
        // entry point retries, so audio recovers if a device appears.
        self.shutdown();

        let rb = HeapRb::<Command>::new(COMMAND_QUEUE_LEN);
        let (producer, consumer) = rb.split();
        let stop_signal = Arc::new(AtomicBool::new(false));
        let alive = Arc::new(AtomicBool::new(true));

        let stop = stop_signal.clone();
        let live = alive.clone();
        let thread = std::thread::spawn(move || {
            render_thread(consumer, stop, live);
        });

        self.backend = Some(Backend {
            commands: producer,
            stop_signal,
            alive,
            thread: Some(thread),
        });
    }
}

impl Default for SoundEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SoundEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn render_thread(
    mut commands: HeapCons<Command>,
    stop_signal: Arc<AtomicBool>,
    alive: Arc<AtomicBool>,
) {
    let backend = CpalOutput::new().and_then(|(mut output, frames)| {
        output.build_stream(frames)?;
        output.start()?;
        Ok(output)
    });
    let mut output = match backend {
        Ok(output) => output,
        Err(e) => {
            log::warn!("audio device unavailable, sound disabled: {}", e);
            alive.store(false, Ordering::Relaxed);
            return;
        }
    };

    let mut engine = Engine::new(output.sample_rate());

    while !stop_signal.load(Ordering::Relaxed) {
        while let Some(command) = commands.try_pop() {
            match command {
                Command::StartAmbient => engine.start_ambient(),
                Command::StopAmbient => engine.stop_ambient(),
                Command::PlayEffect(kind) => engine.play_effect(kind),
            }
        }
        // The blocking write paces this thread against the device callback.
        output.write(&[engine.render_frame()]);
    }

    // Flush a short silent tail so teardown doesn't click.
    for _ in 0..output.sample_rate() / 10 {
        output.write(&[Frame::silence()]);
    }
    let _ = output.stop();
    alive.store(false, Ordering::Relaxed);
}

/// Render the engine offline (no audio device): run the ambient loop for
/// `frames`, firing each effect at its frame offset. This is the
/// deterministic path the demo binary and the integration tests use.
pub fn render_offline(
    sample_rate: u32,
    frames: usize,
    effects: &[(usize, EffectKind)],
) -> Vec<Frame> {
    let mut engine = Engine::new(sample_rate);
    engine.start_ambient();

    let mut out = Vec::with_capacity(frames);
    for i in 0..frames {
        for (at, kind) in effects {
            if *at == i {
                engine.play_effect(*kind);
            }
        }
        out.push(engine.render_frame());
    }
    out
}

/// Offline render straight to an in-memory WAV (16-bit stereo PCM).
pub fn render_to_wav(
    sample_rate: u32,
    seconds: u32,
    effects: &[(usize, EffectKind)],
) -> Vec<u8> {
    let frames = render_offline(sample_rate, (sample_rate * seconds) as usize, effects);
    wav::frames_to_wav(&frames, sample_rate)
}
