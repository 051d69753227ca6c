use crate::reading::Reading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
    Co2,
    Light,
}

impl Metric {
    /// Priority and display order.
    pub const ALL: [Metric; 4] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Co2,
        Metric::Light,
    ];

    pub fn value(self, reading: &Reading) -> f64 {
        match self {
            Metric::Temperature => reading.temperature_c,
            Metric::Humidity => reading.humidity_percent,
            Metric::Co2 => reading.co2_ppm,
            Metric::Light => reading.light_lux,
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Metric::Temperature => "TEMPERATURE",
            Metric::Humidity => "HUMIDITY",
            Metric::Co2 => "CO2 LEVEL",
            Metric::Light => "LIGHT LEVEL",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Co2 => "CO2",
            Metric::Light => "Light",
        }
    }

    /// Identifier used in alert types, e.g. `co2` in `co2_high`.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Co2 => "co2",
            Metric::Light => "light",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => "C",
            Metric::Humidity => "%",
            Metric::Co2 => "ppm",
            Metric::Light => "lux",
        }
    }

    pub fn precision(self) -> usize {
        match self {
            Metric::Temperature | Metric::Humidity => 1,
            Metric::Co2 | Metric::Light => 0,
        }
    }

    /// Bar gauge scale. These are rendering bounds, not alert thresholds.
    pub fn display_domain(self) -> (f64, f64) {
        match self {
            Metric::Temperature => (10.0, 40.0),
            Metric::Humidity => (0.0, 100.0),
            Metric::Co2 => (300.0, 1500.0),
            Metric::Light => (0.0, 20000.0),
        }
    }

    pub fn format_value(self, value: f64) -> String {
        format!("{value:.prec$} {unit}", prec = self.precision(), unit = self.unit())
    }
}
