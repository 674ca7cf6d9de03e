#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_jog::{
    axis::JogAxis,
    controller::{DEFAULT_SAMPLE_PERIOD_MS, JogController},
    counter::PulseCounter,
    scale::ScaleSelector,
};
use embassy_stm32::{
    gpio::{Input, Level, Output, OutputType, Pull, Speed},
    time::khz,
    timer::{
        GeneralInstance4Channel,
        qei::{Qei, QeiPin},
        simple_pwm::{PwmPin, SimplePwm},
    },
};
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use panic_probe as _;

/// A timer peripheral in quadrature decode mode, read as a signed count.
struct EncoderCounter<'d, T: GeneralInstance4Channel> {
    qei: Qei<'d, T>,
}

impl<T: GeneralInstance4Channel> PulseCounter for EncoderCounter<'_, T> {
    fn count(&mut self) -> i16 {
        self.qei.count() as i16
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Booting...");
    let p = embassy_stm32::init(Default::default());

    // One encoder-mode timer per axis.
    let mut enc_x = EncoderCounter {
        qei: Qei::new(p.TIM2, QeiPin::new_ch1(p.PA0), QeiPin::new_ch2(p.PA1)),
    };
    let mut enc_y = EncoderCounter {
        qei: Qei::new(p.TIM3, QeiPin::new_ch1(p.PA6), QeiPin::new_ch2(p.PA7)),
    };
    let mut enc_z = EncoderCounter {
        qei: Qei::new(p.TIM4, QeiPin::new_ch1(p.PB6), QeiPin::new_ch2(p.PB7)),
    };

    // Three step outputs on one 5 kHz PWM timer.
    let pwm = SimplePwm::new(
        p.TIM1,
        Some(PwmPin::new_ch1(p.PE9, OutputType::PushPull)),
        Some(PwmPin::new_ch2(p.PE11, OutputType::PushPull)),
        Some(PwmPin::new_ch3(p.PE13, OutputType::PushPull)),
        None,
        khz(5),
        Default::default(),
    );
    let channels = pwm.split();
    let mut step_x = channels.ch1;
    let mut step_y = channels.ch2;
    let mut step_z = channels.ch3;
    step_x.enable();
    step_y.enable();
    step_z.enable();

    let dir_x = Output::new(p.PD0, Level::Low, Speed::VeryHigh);
    let dir_y = Output::new(p.PD1, Level::Low, Speed::VeryHigh);
    let dir_z = Output::new(p.PD2, Level::Low, Speed::VeryHigh);

    let selector: ScaleSelector<ThreadModeRawMutex, Input<'_>> = ScaleSelector::new(
        Input::new(p.PC0, Pull::Down),
        Input::new(p.PC1, Pull::Down),
        Input::new(p.PC2, Pull::Down),
    );

    let axes = [
        JogAxis::new(&mut enc_x as &mut dyn PulseCounter, dir_x, step_x).unwrap(),
        JogAxis::new(&mut enc_y as &mut dyn PulseCounter, dir_y, step_y).unwrap(),
        JogAxis::new(&mut enc_z as &mut dyn PulseCounter, dir_z, step_z).unwrap(),
    ];

    let mut controller = JogController::new(axes, selector, DEFAULT_SAMPLE_PERIOD_MS).unwrap();
    controller.run().await
}
