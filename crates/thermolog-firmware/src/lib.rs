//! ESP32-C3 specific glue for the thermolog recorder.
//!
//! This crate contains the code that cannot compile on desktop targets:
//! the ADC burst adapter and the embassy tasks wiring the core recorder
//! to the C3's timer, ADC, UART, and status LED.

#![no_std]

pub mod adc;
pub mod tasks;
