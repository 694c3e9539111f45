//! pedal-firmware
//!
//! Single-channel effects pedal on the Raspberry Pi Pico 2. Three contexts
//! share one `PedalController`:
//!
//! 1. The audio task runs on a high-priority interrupt executor, paced at
//!    the sample rate. Each tick converts one input sample, runs the active
//!    effect's block callback inside the controller lock, and writes the
//!    result to the PWM output.
//! 2. The control task runs on the thread executor. It reads the control
//!    surface outside the lock, then locks the controller to poll it (which
//!    may hand off to another effect) and copies out the indicator frame.
//! 3. In interrupt tap mode, the tap task wakes on the tap button's rising
//!    edge and records the tap directly in the shared `TapTempo`.

#![no_std]
#![no_main]

mod board;
mod config;

use core::cell::RefCell;

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::adc::{self, Adc};
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::pwm::Pwm;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Instant, Ticker};
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use pedal_controls::{tap_button_task, Button};
use pedal_effects::{PedalController, Registry, SingleEcho, TapSource, TapTempo};

use crate::board::{audio_config, led_config, AudioIo, ControlSurface};

// ---------------------------------------------------------------------------
// Boot block
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

type Pedal = PedalController<Registry<'static>>;
type SharedPedal = Mutex<CriticalSectionRawMutex, RefCell<Option<Pedal>>>;

/// The controller, shared by the audio and control tasks. Filled in by
/// `main` before either task is spawned.
static PEDAL: SharedPedal = Mutex::new(RefCell::new(None));

/// Tap tempo, shared by the echo and (in interrupt mode) the tap task.
static TAP_TEMPO: StaticCell<TapTempo> = StaticCell::new();

/// Longest tap-tempo delay at the configured sample rate.
const DELAY_SAMPLES: usize = config::tempo_config().max_delay_samples();

/// One second of audio (400 KB at 100 kHz), placed in .bss.
static DELAY_BUFFER: ConstStaticCell<[f32; DELAY_SAMPLES]> =
    ConstStaticCell::new([0.0; DELAY_SAMPLES]);

static AUDIO_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    AUDIO_EXECUTOR.on_interrupt()
}

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Real-time audio path: one sample per tick.
#[embassy_executor::task]
async fn audio_task(mut io: AudioIo, pedal: &'static SharedPedal) {
    let mut ticker = Ticker::every(Duration::from_hz(u64::from(config::SAMPLE_RATE)));
    let mut output = [0.0f32; config::BLOCK_SIZE];

    loop {
        ticker.next().await;

        let input = [io.read_sample(); config::BLOCK_SIZE];
        pedal.lock(|cell| {
            if let Some(pedal) = cell.borrow_mut().as_mut() {
                let channels_in: [&[f32]; 1] = [&input];
                let mut channels_out: [&mut [f32]; 1] = [&mut output];
                pedal.audio_callback(&channels_in, &mut channels_out);
            }
        });
        io.write_sample(output[0]);
        io.scan_pots();
    }
}

/// Low-priority control loop.
#[embassy_executor::task]
async fn control_task(mut surface: ControlSurface, pedal: &'static SharedPedal) {
    info!("Control loop started");
    let mut ticker = Ticker::every(Duration::from_millis(config::CONTROL_PERIOD_MS));

    loop {
        let controls = surface.snapshot(now_ms());

        let frame = pedal.lock(|cell| {
            let mut guard = cell.borrow_mut();
            let pedal = guard.as_mut()?;
            pedal.poll(&controls);
            Some(*pedal.indicators())
        });
        if let Some(frame) = frame {
            surface.show(&frame);
        }

        ticker.next().await;
    }
}

/// Concrete wrapper around the generic `tap_button_task`.
#[embassy_executor::task]
async fn tap_task(pin: Input<'static>, tempo: &'static TapTempo) {
    let debounce_ms = config::echo_config().tap_debounce_ms;
    tap_button_task(pin, Button::new(debounce_ms), |now_ms| {
        tempo.tap(now_ms);
    })
    .await;
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("pedal-firmware starting");

    // ── Control surface (see board.rs for the pin table) ──────────────────
    let tap_pin = Input::new(p.PIN_6, Pull::Down);
    let (tap, interrupt_tap) = match config::TAP_SOURCE {
        TapSource::Polled => (Some(tap_pin), None),
        TapSource::Interrupt => (None, Some(tap_pin)),
    };

    let mut surface = ControlSurface {
        selector: [
            Input::new(p.PIN_2, Pull::Down),
            Input::new(p.PIN_3, Pull::Down),
            Input::new(p.PIN_4, Pull::Down),
            Input::new(p.PIN_5, Pull::Down),
        ],
        tap,
        spst: [
            Input::new(p.PIN_7, Pull::Down),
            Input::new(p.PIN_8, Pull::Down),
            Input::new(p.PIN_9, Pull::Down),
        ],
        spdt: [
            [Input::new(p.PIN_10, Pull::Down), Input::new(p.PIN_11, Pull::Down)],
            [Input::new(p.PIN_12, Pull::Down), Input::new(p.PIN_13, Pull::Down)],
        ],
        leds: [
            Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, led_config(0)),
            Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, led_config(0)),
            Pwm::new_output_a(p.PWM_SLICE2, p.PIN_20, led_config(0)),
            Pwm::new_output_a(p.PWM_SLICE3, p.PIN_22, led_config(0)),
        ],
        _power_led: Output::new(p.PIN_25, Level::High),
    };

    // ── Audio path ────────────────────────────────────────────────────────
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let mut audio = AudioIo::new(
        adc,
        adc::Channel::new_pin(p.PIN_26, Pull::None),
        [
            adc::Channel::new_pin(p.PIN_27, Pull::None),
            adc::Channel::new_pin(p.PIN_28, Pull::None),
            adc::Channel::new_pin(p.PIN_29, Pull::None),
        ],
        Pwm::new_output_a(p.PWM_SLICE7, p.PIN_14, audio_config(0.0)),
    );
    audio.scan_all_pots();

    // ── Effects ───────────────────────────────────────────────────────────
    let tempo: &'static TapTempo = TAP_TEMPO.init(unwrap!(TapTempo::new(config::tempo_config())));
    let echo = unwrap!(SingleEcho::new(
        config::echo_config(),
        DELAY_BUFFER.take(),
        tempo,
    ));

    let controls = surface.snapshot(now_ms());
    let pedal = PedalController::start(Registry::new(echo), config::pedal_config(), &controls);
    surface.show(pedal.indicators());
    PEDAL.lock(|cell| cell.replace(Some(pedal)));

    // ── Tasks ─────────────────────────────────────────────────────────────
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let audio_spawner = AUDIO_EXECUTOR.start(interrupt::SWI_IRQ_1);
    audio_spawner.spawn(unwrap!(audio_task(audio, &PEDAL)));

    spawner.spawn(unwrap!(control_task(surface, &PEDAL)));

    if let Some(pin) = interrupt_tap {
        spawner.spawn(unwrap!(tap_task(pin, tempo)));
    }
}
