//! Canned alert data: the initial sample set and the simulation template pool

use crate::models::{Alert, NewAlert, Severity};

const MINUTE_MS: i64 = 60 * 1000;

/// The five sample alerts shown before any live activity, newest first.
/// Timestamps are offsets from `now_ms`.
pub fn sample_alerts(now_ms: i64) -> Vec<Alert> {
    let sample = |id: &str, age_minutes: i64, fields: NewAlert, acknowledged: bool| Alert {
        acknowledged,
        ..Alert::from_new(id, now_ms - age_minutes * MINUTE_MS, fields)
    };

    vec![
        sample(
            "alert-001",
            2,
            NewAlert::new(
                Severity::Critical,
                "CNC Lathe #3",
                "cnc-003",
                "Bearing Wear Detected",
                "Vibration amplitude exceeded 4.2mm/s on spindle bearing. Predicted failure in 72 hours.",
            )
            .with_measurement("Vibration", 4.2, 3.5),
            false,
        ),
        sample(
            "alert-002",
            15,
            NewAlert::new(
                Severity::Warning,
                "Hydraulic Press #1",
                "hp-001",
                "Temperature Rising",
                "Hydraulic fluid temperature trending above optimal range. Current: 78\u{b0}C, Threshold: 75\u{b0}C.",
            )
            .with_measurement("Temperature", 78.0, 75.0),
            false,
        ),
        sample(
            "alert-003",
            45,
            NewAlert::new(
                Severity::Info,
                "Milling Machine #2",
                "mm-002",
                "Maintenance Scheduled",
                "Routine lubrication cycle due in 48 hours. System auto-scheduled based on usage patterns.",
            ),
            true,
        ),
        sample(
            "alert-004",
            60,
            NewAlert::new(
                Severity::Warning,
                "Compressor Unit #4",
                "cu-004",
                "Pressure Fluctuation",
                "Output pressure variance detected. Oscillating between 5.8-6.4 bar (nominal: 6.0 bar).",
            )
            .with_measurement("Pressure", 6.4, 6.2),
            false,
        ),
        sample(
            "alert-005",
            120,
            NewAlert::new(
                Severity::Critical,
                "Welding Robot #2",
                "wr-002",
                "Arc Instability",
                "Welding arc voltage showing irregular patterns. Quality inspection recommended for last 50 welds.",
            )
            .with_measurement("Arc Voltage", 28.5, 26.0),
            true,
        ),
    ]
}

/// Templates the simulation driver cycles through, in order
pub fn simulation_templates() -> Vec<NewAlert> {
    vec![
        NewAlert::new(
            Severity::Warning,
            "CNC Lathe #1",
            "cnc-001",
            "Tool Wear Threshold",
            "Cutting tool #7 approaching end-of-life. 15% remaining. Schedule replacement.",
        )
        .with_measurement("Tool Life", 15.0, 20.0),
        NewAlert::new(
            Severity::Critical,
            "Grinding Station #3",
            "gs-003",
            "Coolant Level Critical",
            "Coolant reservoir at 12%. Machine will auto-stop at 5%.",
        )
        .with_measurement("Coolant Level", 12.0, 20.0),
        NewAlert::new(
            Severity::Info,
            "Assembly Line #1",
            "al-001",
            "Efficiency Optimized",
            "AI model adjusted cycle time by -2.3%. Throughput increased to 147 units/hr.",
        ),
        NewAlert::new(
            Severity::Warning,
            "Motor Drive #5",
            "md-005",
            "Power Consumption Spike",
            "Current draw 18% above baseline. Check for mechanical resistance.",
        )
        .with_measurement("Current", 24.5, 22.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_newest_first() {
        let now = 10_000_000;
        let samples = sample_alerts(now);

        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0].timestamp, now - 2 * MINUTE_MS);
        assert!(samples.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }

    #[test]
    fn test_sample_acknowledgement_split() {
        let samples = sample_alerts(0);
        let unacked = samples.iter().filter(|a| !a.acknowledged).count();
        assert_eq!(unacked, 3);
    }

    #[test]
    fn test_templates_validate() {
        for template in simulation_templates() {
            assert!(template.validate().is_ok(), "{}", template.title);
        }
    }
}
