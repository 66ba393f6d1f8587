//! The embassy tasks the recorder runs on: a periodic timer tick, the
//! sampling loop, and the serial console split across receive, report
//! pacing, and transmit.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use embedded_io_async::{Read, Write};
use esp_hal::Async;
use esp_hal::gpio::Output;
use esp_hal::uart::{UartRx, UartTx};

use thermolog_core::clock::CycleClock;
use thermolog_core::command::{Command, PING_REPLY};
use thermolog_core::config::{JIFFY_HZ, LOG_CAPACITY, SAMPLE_PERIOD_JIFFIES};
use thermolog_core::recorder::Recorder;
use thermolog_core::report::Line;
use thermolog_core::sampler::Sampler;

use crate::adc::SenseAdc;

/// Jiffy clock; ticked by [`tick`], consulted everywhere else.
pub static CLOCK: CycleClock = CycleClock::new(SAMPLE_PERIOD_JIFFIES);

/// Shared recorder state. The sampling task writes the log; the console
/// tasks drive the reporter. Lock scopes stay a few instructions long.
pub static RECORDER: Mutex<CriticalSectionRawMutex, RefCell<Recorder<LOG_CAPACITY>>> =
    Mutex::new(RefCell::new(Recorder::new()));

/// Outgoing protocol lines. Capacity 1, so the report pump only renders a
/// line once the previous one has been handed to the UART — the async
/// form of the tx-ready callback chain.
pub static TX_LINES: Channel<CriticalSectionRawMutex, Line, 1> = Channel::new();

/// Raised on every report trigger; the pump drains whatever is in flight.
static REPORT_KICK: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// The periodic timer: one jiffy per tick, nothing else.
#[embassy_executor::task]
pub async fn tick() {
    let mut ticker = Ticker::every(Duration::from_hz(JIFFY_HZ as u64));
    loop {
        ticker.next().await;
        CLOCK.tick();
    }
}

/// The sampling cycle: stamp the interval, blink, sample, store, wait.
#[embassy_executor::task]
pub async fn sample_loop(mut sampler: Sampler<SenseAdc<'static>>, mut led: Output<'static>) {
    loop {
        CLOCK.begin_cycle();
        led.toggle();

        let degrees = sampler.sample().await;
        RECORDER.lock(|r| r.borrow_mut().record(degrees));
        log::debug!("sampled {degrees} °C");

        CLOCK.next_cycle().await;
    }
}

/// Receive side of the console. Handles one byte at a time and never
/// waits on the sampling loop.
#[embassy_executor::task]
pub async fn console_rx(mut rx: UartRx<'static, Async>) {
    let mut byte = [0u8; 1];
    loop {
        if rx.read_exact(&mut byte).await.is_err() {
            continue;
        }
        match Command::parse(byte[0]) {
            Some(Command::Ping) => {
                let mut reply = Line::new();
                let _ = reply.push_str(PING_REPLY);
                TX_LINES.send(reply).await;
            }
            Some(Command::Report) => {
                // Header goes out synchronously with the trigger; data
                // lines are paced by the pump.
                let header =
                    RECORDER.lock(|r| r.borrow_mut().start_report(CLOCK.since_cycle_start()));
                TX_LINES.send(header).await;
                REPORT_KICK.signal(());
            }
            Some(Command::Clear) => RECORDER.lock(|r| r.borrow_mut().clear()),
            None => {}
        }
    }
}

/// Streams the report, one line per completed transmission.
#[embassy_executor::task]
pub async fn report_pump() {
    loop {
        REPORT_KICK.wait().await;
        while let Some(line) = RECORDER.lock(|r| r.borrow_mut().next_report_line()) {
            TX_LINES.send(line).await;
        }
    }
}

/// Transmit side of the console.
#[embassy_executor::task]
pub async fn console_tx(mut tx: UartTx<'static, Async>) {
    loop {
        let line = TX_LINES.receive().await;
        if tx.write_all(line.as_bytes()).await.is_err() {
            log::error!("uart tx failed, line dropped");
        }
    }
}
