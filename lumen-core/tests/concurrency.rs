//! Concurrent scenarios for the render loop and the UI lock
//!
//! The first two scenarios run every actor on one simulated clock; the last
//! runs the render loop and a contending locker on real OS threads.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use embassy_futures::block_on;
use embassy_futures::join::{join, join5};
use embassy_futures::yield_now;

use lumen_core::config::{CounterConfig, RenderConfig};
use lumen_core::render::drive_engine_clock;
use lumen_core::{
    DemoCounter, EngineError, PointerEvent, PointerSource, RenderEngine, RenderLoop, RunFlag,
    SecondaryTask, TaskClock, UiDocument, UiLock,
};

/// Clock advancing one millisecond per poll round of [`SimClock::run_for`]
struct SimClock {
    now: Cell<u64>,
    halted: Cell<bool>,
}

impl SimClock {
    fn new() -> Self {
        Self {
            now: Cell::new(0),
            halted: Cell::new(false),
        }
    }

    async fn run_for(&self, until_ms: u64) {
        while self.now.get() < until_ms {
            yield_now().await;
            self.now.set(self.now.get() + 1);
        }
        self.halted.set(true);
    }
}

impl TaskClock for SimClock {
    async fn sleep_ms(&self, ms: u32) {
        let deadline = self.now.get() + ms as u64;
        while self.now.get() < deadline && !self.halted.get() {
            yield_now().await;
        }
    }

    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Wall-clock scheduler time for the threaded scenario
struct StdClock {
    origin: Instant,
}

impl TaskClock for StdClock {
    async fn sleep_ms(&self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }

    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

struct NoPointer;

impl PointerSource for NoPointer {
    fn read_pointer(&mut self) -> PointerEvent {
        PointerEvent::default()
    }
}

/// Engine double that flags any overlapping entry
#[derive(Default)]
struct Engine {
    steps: u32,
    elapsed_ms: u64,
    pokes: u32,
    readouts: Vec<String>,
    inside: Arc<AtomicBool>,
    overlaps: Arc<AtomicU32>,
}

impl Engine {
    fn enter(&self) {
        if self.inside.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        for _ in 0..64 {
            std::hint::spin_loop();
        }
        self.inside.store(false, Ordering::SeqCst);
    }
}

impl RenderEngine for Engine {
    fn handle_timers(&mut self, _pointer: Option<&mut dyn PointerSource>) -> Result<u32, EngineError> {
        self.enter();
        self.steps += 1;
        Ok(7)
    }

    fn set_readout(&mut self, text: &str) -> Result<(), EngineError> {
        self.enter();
        self.readouts.push(String::from(text));
        Ok(())
    }

    fn tick_inc(&mut self, elapsed_ms: u32) {
        self.enter();
        self.elapsed_ms += elapsed_ms as u64;
    }
}

type Document = UiDocument<Engine, NoPointer>;

/// Render loop clock that records whether the lock was held at each sleep
struct SleepProbe<'a> {
    clock: &'a SimClock,
    lock: &'a UiLock<Document>,
    sleeps: Cell<u32>,
    held_at_sleep: Cell<u32>,
}

impl TaskClock for SleepProbe<'_> {
    async fn sleep_ms(&self, ms: u32) {
        self.sleeps.set(self.sleeps.get() + 1);
        if self.lock.is_held() {
            self.held_at_sleep.set(self.held_at_sleep.get() + 1);
        }
        self.clock.sleep_ms(ms).await
    }

    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

#[test]
fn render_secondary_and_engine_clock_share_the_lock() {
    let lock = UiLock::new(UiDocument::new(Engine::default(), None::<NoPointer>));
    let clock = SimClock::new();
    let run = RunFlag::new();
    let probe = SleepProbe {
        clock: &clock,
        lock: &lock,
        sleeps: Cell::new(0),
        held_at_sleep: Cell::new(0),
    };

    let mut render = RenderLoop::new(
        &lock,
        &probe,
        DemoCounter::new(CounterConfig::default()),
        RenderConfig::default(),
        &run,
    );
    let mut secondary = SecondaryTask::new(&clock, 500, &run);

    // Short non-blocking entries from an interrupt-adjacent path
    let contender = async {
        let mut entered = 0u32;
        while run.is_running() {
            if let Some(mut doc) = lock.try_lock() {
                doc.engine_mut().pokes += 1;
                entered += 1;
            }
            clock.sleep_ms(3).await;
        }
        entered
    };

    let timekeeper = async {
        clock.run_for(10_000).await;
        run.stop();
    };

    let (ticks, advances, entered, iterations, ()) = block_on(join5(
        render.run(),
        drive_engine_clock(&lock, &clock, 5, &run),
        contender,
        secondary.run(),
        timekeeper,
    ));

    // No deadlock: every actor made progress
    assert!(ticks > 1_000, "render ticks: {}", ticks);
    assert!(advances > 1_000, "engine clock advances: {}", advances);
    assert!(entered > 1_000, "contender entries: {}", entered);

    // 500 ms period over 10 s
    assert!((19..=21).contains(&iterations), "secondary iterations: {}", iterations);

    // The render loop never slept with the lock held
    assert_eq!(probe.sleeps.get(), ticks);
    assert_eq!(probe.held_at_sleep.get(), 0);
    assert!(!lock.is_held());

    let doc = lock.into_inner();
    let engine = doc.engine();
    assert_eq!(engine.steps, ticks);
    assert_eq!(engine.readouts.len() as u32, ticks);
    assert_eq!(engine.elapsed_ms, advances as u64 * 5);
    assert_eq!(engine.pokes, entered);
    assert_eq!(engine.overlaps.load(Ordering::SeqCst), 0);
}

#[test]
fn greedy_holder_delays_but_never_interleaves() {
    let lock = UiLock::new(UiDocument::new(Engine::default(), None::<NoPointer>));
    let clock = SimClock::new();
    let run = RunFlag::new();

    let mut render = RenderLoop::new(
        &lock,
        &clock,
        DemoCounter::new(CounterConfig::default()),
        RenderConfig::default(),
        &run,
    );

    // Holds the lock across its own sleeps
    let holder = async {
        let mut holds = 0u32;
        while run.is_running() {
            {
                let doc = lock.lock().await;
                let steps = doc.engine().steps;
                let readouts = doc.engine().readouts.len();
                clock.sleep_ms(20).await;
                assert_eq!(doc.engine().steps, steps);
                assert_eq!(doc.engine().readouts.len(), readouts);
                holds += 1;
            }
            clock.sleep_ms(30).await;
        }
        holds
    };

    let timekeeper = async {
        clock.run_for(5_000).await;
        run.stop();
    };

    let (ticks, (holds, ())) = block_on(join(render.run(), join(holder, timekeeper)));

    assert!(holds >= 90, "holds: {}", holds);
    // Render is slowed by the holder but keeps ticking
    assert!(ticks > 100, "render ticks: {}", ticks);
    assert!(ticks < 5_000 / 7, "render ticks: {}", ticks);
    assert!(!lock.is_held());
}

#[test]
fn threaded_render_loop_keeps_single_writer() {
    let inside = Arc::new(AtomicBool::new(false));
    let overlaps = Arc::new(AtomicU32::new(0));
    let engine = Engine {
        inside: inside.clone(),
        overlaps: overlaps.clone(),
        ..Engine::default()
    };

    let lock = UiLock::new(UiDocument::new(engine, None::<NoPointer>));
    let clock = StdClock {
        origin: Instant::now(),
    };
    let run = RunFlag::new();
    let config = RenderConfig {
        min_delay_ms: 1,
        max_delay_ms: 5,
        engine_tick_ms: 5,
    };

    let (ticks, hammered) = std::thread::scope(|s| {
        let render = s.spawn(|| {
            let counter = DemoCounter::new(CounterConfig::default());
            let mut render = RenderLoop::new(&lock, &clock, counter, config, &run);
            block_on(render.run())
        });

        let hammer = s.spawn(|| {
            let mut entries = 0u32;
            while run.is_running() {
                let mut doc = block_on(lock.lock());
                doc.engine_mut().tick_inc(1);
                drop(doc);
                entries += 1;
                std::thread::yield_now();
            }
            entries
        });

        std::thread::sleep(Duration::from_millis(200));
        run.stop();

        (render.join().unwrap(), hammer.join().unwrap())
    });

    assert!(ticks > 0);
    assert!(hammered > 0);
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    assert!(!lock.is_held());

    let doc = lock.into_inner();
    assert_eq!(doc.engine().steps, ticks);
    assert_eq!(doc.engine().elapsed_ms, hammered as u64);
}
