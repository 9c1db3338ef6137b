//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC channel, GPIO directions, the LEDC timer/channel and
//! the per-pin GPIO ISR service using raw ESP-IDF sys calls. Called once
//! from `main()` before any task is spawned; the first failure aborts
//! startup.
//!
//! On non-espidf targets every entry point is a logging no-op so the same
//! boot sequence runs in simulation.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

use crate::drivers::button::EdgeLines;
use crate::error::InitError;
#[cfg(target_os = "espidf")]
use crate::error::{ActuatorError, SensorError};
#[cfg(target_os = "espidf")]
use crate::pins;

/// LEDC channel driven by the sample consumer.
pub const LEDC_CH_SAMPLE: u32 = 0;

#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t, err: fn(i32) -> InitError) -> Result<(), InitError> {
    if ret == ESP_OK as i32 { Ok(()) } else { Err(err(ret)) }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), InitError> {
    // SAFETY: Called once from main() before any task exists.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), InitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: `ADC1_HANDLE` is written once by `init_adc()` before the
/// producer task is spawned; afterwards it is only read.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), InitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    check(unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) }, InitError::Adc)?;

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    check(
        unsafe { adc_oneshot_config_channel(adc1_handle(), pins::SAMPLE_ADC_CHANNEL, &chan_cfg) },
        InitError::Adc,
    )?;

    info!("hw_init: ADC1 CH{} configured (12-bit)", pins::SAMPLE_ADC_CHANNEL);
    Ok(())
}

/// One raw ADC1 reading. Errors are surfaced, never masked as zero.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract; only the producer task reads.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed(ret));
    }
    Ok(raw.max(0) as u16)
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), InitError> {
    for (pin, _) in pins::BUTTON_LINES {
        // Input-only pins have no internal pulls; the board provides pull-downs.
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
        };
        check(unsafe { gpio_config(&cfg) }, InitError::Gpio)?;
    }
    info!("hw_init: button inputs configured (rising edge)");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), InitError> {
    for pin in [pins::RED_LED_GPIO, pins::GREEN_LED_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        check(unsafe { gpio_config(&cfg) }, InitError::Gpio)?;
        check(unsafe { gpio_set_level(pin, 0) }, InitError::Gpio)?;
    }
    info!("hw_init: LED outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    // SAFETY: pin was configured as an output in init_gpio_outputs().
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::GpioWriteFailed);
    }
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), InitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: pins::PWM_RESOLUTION_BITS,
        freq_hz: pins::SAMPLE_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    check(unsafe { ledc_timer_config(&timer) }, InitError::Pwm)?;

    let channel = ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_SAMPLE,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::SAMPLE_PWM_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    check(unsafe { ledc_channel_config(&channel) }, InitError::Pwm)?;

    info!(
        "hw_init: LEDC CH{} on GPIO{} ({} Hz, {}-bit)",
        LEDC_CH_SAMPLE,
        pins::SAMPLE_PWM_GPIO,
        pins::SAMPLE_PWM_FREQ_HZ,
        pins::PWM_RESOLUTION_BITS
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) -> Result<(), ActuatorError> {
    // SAFETY: channel was configured in init_ledc(); only the consumer
    // task writes its duty register.
    unsafe {
        if ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty) != ESP_OK as i32 {
            return Err(ActuatorError::PwmWriteFailed);
        }
        if ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel) != ESP_OK as i32 {
            return Err(ActuatorError::PwmWriteFailed);
        }
    }
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn edge_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` was registered by install_edge_isrs() as a pointer into
    // a `'static` EdgeLines table that is never moved or dropped.
    let source = unsafe { &*(arg as *const crate::drivers::button::EdgeEventSource<'static>) };
    if source.on_edge() {
        esp_idf_svc::hal::task::do_yield();
    }
}

/// Install the per-pin ISR service and hook every line in `lines`.
/// Call after init_peripherals() and before any edge can matter.
#[cfg(target_os = "espidf")]
pub fn install_edge_isrs(lines: &'static EdgeLines<'static>) -> Result<(), InitError> {
    // SAFETY: ESP_ERR_INVALID_STATE means the service is already installed.
    // Each handler argument points into `lines`, which lives forever.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(InitError::Isr(ret));
        }

        for source in lines.iter() {
            let line = source.line();
            check(gpio_set_intr_type(line, gpio_int_type_t_GPIO_INTR_POSEDGE), InitError::Isr)?;
            let arg = source as *const _ as *mut core::ffi::c_void;
            check(gpio_isr_handler_add(line, Some(edge_isr), arg), InitError::Isr)?;
            check(gpio_intr_enable(line), InitError::Isr)?;
        }
    }
    info!("hw_init: ISR service installed ({} line(s))", lines.len());
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn install_edge_isrs(lines: &EdgeLines<'_>) -> Result<(), InitError> {
    log::info!("hw_init(sim): {} edge line(s), ISR service skipped", lines.len());
    Ok(())
}
