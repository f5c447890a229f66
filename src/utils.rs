use crate::device::Device;
use crate::values::OverrideMode;
use std::fmt::Write;

/// One-line human summary of a device for the poll log, e.g.
/// `Heating [HEATING] temp=19.5°C target=21°C mode=SCHEDULE`.
///
/// Only display values are used. Features the device lacks are skipped.
pub fn summarize_device(device: &Device) -> String {
    let mut line = format!("{} [{}]", device.name, device.product_type);

    // `write!` into a String cannot fail.
    if let Some(sensor) = device.temperature_sensor() {
        let _ = write!(line, " temp={}", sensor.temperature.display_value());
    }
    if let Some(heating) = device.heating_thermostat() {
        let _ = write!(
            line,
            " target={} mode={} state={}",
            heating.target_heat_temperature.display_value(),
            heating.operating_mode.display_value(),
            heating.operating_state.display_value()
        );
        if *heating.temporary_operating_mode_override.display_value() == OverrideMode::Transient {
            line.push_str(" boost");
            if let Some(boost) = device.heating_boost() {
                let _ = write!(line, "={}", boost.boost_target_temperature.display_value());
            }
        }
    }
    if let Some(water) = device.water_heater() {
        let on = if *water.is_on.display_value() { "on" } else { "off" };
        let _ = write!(line, " hot_water={} mode={}", on, water.operating_mode.display_value());
    }
    if let Some(plug) = device.on_off() {
        let _ = write!(line, " power={}", plug.mode.display_value());
    }
    if let Some(light) = device.dimmable_light() {
        let _ = write!(line, " brightness={}", light.brightness.display_value());
    }
    if let Some(battery) = device.battery() {
        let _ = write!(line, " battery={}", battery.battery_level.display_value());
    }
    if device.has_pending_targets() {
        line.push_str(" (pending)");
    }
    line
}
