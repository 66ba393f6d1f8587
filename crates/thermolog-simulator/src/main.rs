//! Desktop simulator for the thermolog temperature recorder.
//!
//! Drives the exact core state machines the firmware ships, with
//! synthetic ADC bursts in place of hardware and stdin/stdout in place of
//! the console UART. Time is compressed: one simulated minute elapses per
//! real second, so the 15-minute sampling period fires every 15 seconds.
//!
//! # Commands
//!
//! Single characters on stdin (newline-delimited input is fine):
//!
//! | Key | Action              |
//! |-----|---------------------|
//! | p   | Ping                |
//! | r   | Report the history  |
//! | c   | Clear the history   |
//! | q   | Quit the simulator  |

use std::io::{BufRead, Stdout, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use thermolog_core::calib::Calibration;
use thermolog_core::clock::CycleClock;
use thermolog_core::command::{Command, PING_REPLY};
use thermolog_core::config::{
    JIFFIES_PER_MINUTE, LOG_CAPACITY, OVERSAMPLE, SAMPLE_PERIOD_JIFFIES, SAMPLE_PERIOD_MINUTES,
};
use thermolog_core::recorder::Recorder;

// ---------------------------------------------------------------------------
// Timing constants
// ---------------------------------------------------------------------------

/// Simulated jiffies advanced per wall-clock second (one simulated minute
/// per real second).
const TIME_COMPRESSION: u32 = JIFFIES_PER_MINUTE;

/// Wall-clock duration of one simulation step (= one jiffy).
const STEP: Duration = Duration::from_millis(1000 / TIME_COMPRESSION as u64);

/// Factory codes of the simulated sensor die.
const SIM_T30: u16 = 673;
const SIM_T85: u16 = 830;

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Generates raw ADC bursts that wander like a real room.
struct MockBurstGenerator {
    /// Simulated minutes since boot, advanced once per sampling cycle.
    elapsed_minutes: f64,
}

impl MockBurstGenerator {
    fn new() -> Self {
        Self {
            elapsed_minutes: 0.0,
        }
    }

    /// Produce one conversion burst around 20–26 °C with slow drift,
    /// expressed in the raw codes of the simulated die.
    fn next_burst(&mut self, dt_minutes: f64) -> [u16; OVERSAMPLE] {
        self.elapsed_minutes += dt_minutes;
        let t = self.elapsed_minutes;

        let degrees = 23.0 + 3.0 * (t / 120.0).sin() + 0.5 * (t / 37.0).cos();

        // Invert the two-point line: code = t30 + (degrees - 30) * span / 55.
        let span = (SIM_T85 - SIM_T30) as f64;
        let code = SIM_T30 as f64 + (degrees - 30.0) * span / 55.0;

        let mut burst = [0u16; OVERSAMPLE];
        for (i, slot) in burst.iter_mut().enumerate() {
            // Per-conversion noise, so the oversampling average matters.
            let noise = ((t * 7.3 + i as f64).sin() * 1.5) as i32;
            *slot = (code as i32 + noise).max(0) as u16;
        }
        burst
    }
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// Dispatch one received byte. stdout completes synchronously, so the
/// ready-for-next-line pacing of a report collapses into a plain loop.
fn handle_byte(
    byte: u8,
    recorder: &mut Recorder<LOG_CAPACITY>,
    clock: &CycleClock,
    stdout: &Stdout,
) {
    let mut out = stdout.lock();
    match Command::parse(byte) {
        Some(Command::Ping) => {
            let _ = out.write_all(PING_REPLY.as_bytes());
        }
        Some(Command::Report) => {
            let header = recorder.start_report(clock.since_cycle_start());
            let _ = out.write_all(header.as_bytes());
            while let Some(line) = recorder.next_report_line() {
                let _ = out.write_all(line.as_bytes());
            }
        }
        Some(Command::Clear) => recorder.clear(),
        None => {}
    }
    let _ = out.flush();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("starting thermolog simulator");
    info!(
        "time compression {}x: {} min sampling period fires every {} s",
        TIME_COMPRESSION, SAMPLE_PERIOD_MINUTES, SAMPLE_PERIOD_JIFFIES / TIME_COMPRESSION
    );
    info!("commands: p=ping  r=report  c=clear  q=quit");

    let calibration =
        Calibration::from_factory(SIM_T30, SIM_T85).expect("simulated factory codes are valid");
    info!(
        "calibration ready: scale={} offset={}",
        calibration.scale(),
        calibration.offset()
    );

    let clock = CycleClock::new(SAMPLE_PERIOD_JIFFIES);
    let mut recorder: Recorder<LOG_CAPACITY> = Recorder::new();
    let mut generator = MockBurstGenerator::new();

    // stdin reader thread; the main loop polls the channel between ticks,
    // the synchronous stand-in for the receive interrupt.
    let (byte_tx, byte_rx) = mpsc::channel::<u8>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            for byte in line.bytes() {
                if byte_tx.send(byte).is_err() {
                    return;
                }
            }
        }
    });

    let stdout = std::io::stdout();
    let mut sample_due = true;

    loop {
        let step_start = Instant::now();

        // Pending command bytes first, like the receive interrupt would.
        for byte in byte_rx.try_iter() {
            if byte == b'q' {
                info!("simulator exiting");
                return;
            }
            handle_byte(byte, &mut recorder, &clock, &stdout);
        }

        // One jiffy per step; the tick is what ends a sampling cycle.
        clock.tick();
        if clock.since_cycle_start() >= SAMPLE_PERIOD_JIFFIES {
            sample_due = true;
        }

        if sample_due {
            sample_due = false;
            clock.begin_cycle();

            let burst = generator.next_burst(SAMPLE_PERIOD_MINUTES as f64);
            let mut raw_sum: i32 = burst.iter().map(|&code| i32::from(code)).sum();
            raw_sum += (OVERSAMPLE / 2) as i32;
            let degrees = calibration.convert(raw_sum) as u8;

            recorder.record(degrees);
            debug!("sampled {degrees} °C (raw sum {raw_sum})");
        }

        let elapsed = step_start.elapsed();
        if elapsed < STEP {
            thread::sleep(STEP - elapsed);
        }
    }
}
