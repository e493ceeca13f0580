//! Allocation-free render path tests.
//!
//! These verify that `Engine::render_frame()` does not allocate during the
//! realtime phase. Voice pools and envelopes are fixed-capacity, so a few
//! seconds of loop plus every cue kind should never touch the heap.
//!
//! Just run `cargo test`; no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use gamebeat::{EffectKind, RenderEngine};

const SAMPLE_RATE: u32 = 44100;

#[test]
fn ambient_loop_renders_alloc_free() {
    let mut engine = RenderEngine::new(SAMPLE_RATE);
    engine.start_ambient();

    assert_no_alloc(|| {
        for _ in 0..SAMPLE_RATE * 5 {
            engine.render_frame();
        }
    });
}

#[test]
fn effects_render_alloc_free() {
    let mut engine = RenderEngine::new(SAMPLE_RATE);
    engine.start_ambient();

    assert_no_alloc(|| {
        for kind in [EffectKind::Success, EffectKind::Failure, EffectKind::Impact] {
            engine.play_effect(kind);
            for _ in 0..SAMPLE_RATE * 2 {
                engine.render_frame();
            }
        }
    });
}

#[test]
fn start_stop_cycles_alloc_free() {
    let mut engine = RenderEngine::new(SAMPLE_RATE);

    assert_no_alloc(|| {
        for _ in 0..4 {
            engine.start_ambient();
            for _ in 0..SAMPLE_RATE / 2 {
                engine.render_frame();
            }
            engine.stop_ambient();
            for _ in 0..SAMPLE_RATE / 10 {
                engine.render_frame();
            }
        }
    });
}
