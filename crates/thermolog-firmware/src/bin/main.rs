//! ESP32-C3 entry point: bring up the peripherals, derive the factory
//! calibration, and spawn the recorder tasks.

#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{self, Uart};
use rtt_target::rprintln;

use thermolog_core::calib::Calibration;
use thermolog_core::sampler::Sampler;
use thermolog_firmware::adc::SenseAdc;
use thermolog_firmware::tasks;

/// Factory calibration codes, baked in by the build script (override via
/// `THERMOLOG_CAL_T30` / `THERMOLOG_CAL_T85`, see `build.rs`).
const CAL_T30: &str = env!("THERMOLOG_CAL_T30");
const CAL_T85: &str = env!("THERMOLOG_CAL_T85");

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
esp_bootloader_esp_idf::esp_app_desc!();

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // A defective calibration segment is fatal; initialization stops here.
    let t30: u16 = CAL_T30.parse().expect("THERMOLOG_CAL_T30 is not a raw ADC code");
    let t85: u16 = CAL_T85.parse().expect("THERMOLOG_CAL_T85 is not a raw ADC code");
    let calibration =
        Calibration::from_factory(t30, t85).expect("factory calibration segment is defective");
    log::info!(
        "calibration ready: scale={} offset={}",
        calibration.scale(),
        calibration.offset()
    );

    // Liveness LED on the devkit.
    let led = Output::new(peripherals.GPIO8, Level::Low, OutputConfig::default());

    // Console UART, split so receive and transmit run as separate tasks.
    let uart = Uart::new(peripherals.UART0, uart::Config::default())
        .expect("UART0 init failed")
        .with_rx(peripherals.GPIO20)
        .with_tx(peripherals.GPIO21)
        .into_async();
    let (uart_rx, uart_tx) = uart.split();

    let sampler = Sampler::new(
        SenseAdc::new(peripherals.ADC1, peripherals.GPIO2),
        calibration,
    );

    spawner.must_spawn(tasks::tick());
    spawner.must_spawn(tasks::sample_loop(sampler, led));
    spawner.must_spawn(tasks::console_rx(uart_rx));
    spawner.must_spawn(tasks::report_pump());
    spawner.must_spawn(tasks::console_tx(uart_tx));

    rprintln!("thermolog running");

    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
