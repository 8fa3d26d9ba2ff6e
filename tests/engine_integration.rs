//! End-to-end acquisition scenarios against the engine
//!
//! These tests exercise the full path the renderer depends on: timebase and
//! voltage selection, hysteretic trigger search, frequency estimation, and
//! the per-channel readouts, all over synthetic captures.

mod common;

use common::builders::{square_wave_counts, EngineBuilder};
use common::{assert_float_eq, init_tracing};
use scopevis_rs::tables::RangeTable;
use scopevis_rs::trigger::TriggerSlope;

/// The reference scenario: 1 ms/div, 1 V/div, rising trigger at the
/// midpoint of the active range, 1 kHz square wave sampled at 80 kS/s.
#[test]
fn test_one_khz_square_wave_readout() {
    init_tracing();

    let range = RangeTable::get(2).unwrap();
    let mut engine = EngineBuilder::new()
        .timebase(6)
        .trigger(0, TriggerSlope::Rising, range.midpoint())
        .build();
    engine.select_voltage(0, 3).unwrap();

    // 80 kS/s and 1 kHz means 80 samples per period; the pass buffer is
    // one full screen of 800 samples
    let samples = engine.samples_per_pass();
    assert_eq!(samples, 800);
    let buffers = vec![
        square_wave_counts(2, -2.0, 2.0, 80, samples),
        vec![range.zero_offset; samples],
    ];

    let summary = engine.process_pass(&buffers).unwrap();
    let frequency = summary.frequency_hz.expect("readout should be present");
    assert_float_eq(frequency, 1000.0, 20.0); // within 2%

    let trigger = summary.trigger_sample_index.expect("trigger should lock");
    assert!(trigger < samples);

    // Repeated passes over identical input must not jitter
    for _ in 0..10 {
        let again = engine.process_pass(&buffers).unwrap();
        assert_eq!(again.trigger_sample_index, Some(trigger));
        assert_eq!(again.frequency_hz, Some(frequency));
    }
}

#[test]
fn test_readouts_survive_on_channel_state() {
    let range = RangeTable::get(2).unwrap();
    let mut engine = EngineBuilder::new()
        .timebase(6)
        .trigger(0, TriggerSlope::Rising, range.midpoint())
        .build();

    let samples = engine.samples_per_pass();
    let buffers = vec![
        square_wave_counts(2, -2.0, 2.0, 80, samples),
        vec![range.zero_offset; samples],
    ];
    engine.process_pass(&buffers).unwrap();

    let ch0 = engine.channel(0).unwrap();
    assert!(ch0.trigger_sample_index().is_some());
    assert!(ch0.frequency_hz().is_some());

    // The non-trigger channel carries no trigger readouts
    let ch1 = engine.channel(1).unwrap();
    assert_eq!(ch1.trigger_sample_index(), None);
    assert_eq!(ch1.frequency_hz(), None);
}

#[test]
fn test_flat_signal_freezes_readouts() {
    let range = RangeTable::get(2).unwrap();
    let mut engine = EngineBuilder::new()
        .timebase(6)
        .trigger(0, TriggerSlope::Rising, range.midpoint())
        .build();

    let samples = engine.samples_per_pass();
    let flat = vec![
        vec![range.zero_offset; samples],
        vec![range.zero_offset; samples],
    ];
    let summary = engine.process_pass(&flat).unwrap();

    // No crossing: blank readouts, not zero and not stale
    assert_eq!(summary.trigger_sample_index, None);
    assert_eq!(summary.frequency_hz, None);
}

#[test]
fn test_trace_extents_track_signal() {
    let range = RangeTable::get(2).unwrap();
    let mut engine = EngineBuilder::new()
        .timebase(6)
        .trigger(0, TriggerSlope::Rising, range.midpoint())
        .build();

    let samples = engine.samples_per_pass();
    let buffers = vec![
        square_wave_counts(2, -2.0, 2.0, 80, samples),
        vec![range.zero_offset; samples],
    ];
    engine.process_pass(&buffers).unwrap();

    let ch0 = engine.channel(0).unwrap();
    let top = ch0.to_pixel_y(range.volts_to_count(2.0));
    let bottom = ch0.to_pixel_y(range.volts_to_count(-2.0));
    assert_eq!(ch0.y_min(), top);
    assert_eq!(ch0.y_max(), bottom);
    assert!(ch0.y_min() < ch0.y_max());
}

#[test]
fn test_range_switch_keeps_trigger_usable() {
    // A trigger set on the wide range still locks after switching the
    // channel to the narrow range: the level is carried proportionally
    let wide = RangeTable::get(2).unwrap();
    let mut engine = EngineBuilder::new()
        .timebase(6)
        .trigger(0, TriggerSlope::Rising, wide.midpoint())
        .build();

    engine.select_voltage(0, 0).unwrap(); // 100 mV/div on the narrow range
    let narrow = RangeTable::get(0).unwrap();
    let level = engine.trigger().level;
    assert!(level > narrow.v_min && level < narrow.v_max);

    let samples = engine.samples_per_pass();
    let buffers = vec![
        square_wave_counts(0, -0.5, 0.5, 80, samples),
        vec![narrow.zero_offset; samples],
    ];
    let summary = engine.process_pass(&buffers).unwrap();
    assert!(summary.trigger_sample_index.is_some());
}

#[test]
fn test_falling_trigger_locks_on_falling_edge() {
    let range = RangeTable::get(2).unwrap();
    let mut engine = EngineBuilder::new()
        .timebase(6)
        .trigger(0, TriggerSlope::Falling, range.midpoint())
        .build();

    let samples = engine.samples_per_pass();
    // Starts low, rises at 40, falls at 80
    let buffers = vec![
        square_wave_counts(2, -2.0, 2.0, 80, samples),
        vec![range.zero_offset; samples],
    ];
    let summary = engine.process_pass(&buffers).unwrap();
    assert_eq!(summary.trigger_sample_index, Some(80));
}

#[cfg(feature = "mock-adc")]
mod with_mock_adc {
    use super::common::builders::EngineBuilder;
    use super::common::{assert_float_eq, init_tracing};
    use scopevis_rs::acquisition::{MockAdc, MockChannelConfig, SampleSource, WaveformPattern};
    use scopevis_rs::tables::RangeTable;
    use scopevis_rs::trigger::TriggerSlope;

    #[test]
    fn test_mock_adc_square_wave_end_to_end() {
        init_tracing();

        let range = RangeTable::get(2).unwrap();
        let mut engine = EngineBuilder::new()
            .timebase(6)
            .trigger(0, TriggerSlope::Rising, range.midpoint())
            .build();

        let pattern = WaveformPattern::Square {
            frequency: 1000.0,
            amplitude: 2.0,
            offset: 0.0,
            duty: 0.5,
        };
        let mut adc = MockAdc::new()
            .with_channel(0, MockChannelConfig::new(pattern, 2))
            .with_channel(1, MockChannelConfig::new(WaveformPattern::Constant(0.0), 2));

        let samples = engine.samples_per_pass();
        let rate = engine.timebase_entry().sample_rate;
        let mut buffers = vec![vec![0; samples], vec![0; samples]];

        let mut last_trigger = None;
        for pass in 0..5 {
            for (channel, buffer) in buffers.iter_mut().enumerate() {
                adc.fill(channel, rate, buffer).unwrap();
            }
            let summary = engine.process_pass(&buffers).unwrap();
            let frequency = summary.frequency_hz.expect("readout should be present");
            assert_float_eq(frequency, 1000.0, 20.0);

            let trigger = summary.trigger_sample_index.expect("trigger should lock");
            if let Some(previous) = last_trigger {
                assert_eq!(trigger, previous, "trigger jittered on pass {}", pass);
            }
            last_trigger = Some(trigger);
        }
    }

    #[test]
    fn test_mock_adc_noisy_signal_still_locks() {
        let range = RangeTable::get(2).unwrap();
        let mut engine = EngineBuilder::new()
            .timebase(6)
            .trigger(0, TriggerSlope::Rising, range.midpoint())
            .build();

        // Noise well inside the hysteresis band must not break the lock
        let pattern = WaveformPattern::Square {
            frequency: 1000.0,
            amplitude: 2.0,
            offset: 0.0,
            duty: 0.5,
        };
        let noise = range.hysteresis / 4.0;
        let mut adc = MockAdc::new()
            .with_channel(0, MockChannelConfig::new(pattern, 2).with_noise(noise))
            .with_channel(1, MockChannelConfig::new(WaveformPattern::Constant(0.0), 2));

        let samples = engine.samples_per_pass();
        let rate = engine.timebase_entry().sample_rate;
        let mut buffers = vec![vec![0; samples], vec![0; samples]];
        for (channel, buffer) in buffers.iter_mut().enumerate() {
            adc.fill(channel, rate, buffer).unwrap();
        }

        let summary = engine.process_pass(&buffers).unwrap();
        assert!(summary.trigger_sample_index.is_some());
        assert_float_eq(summary.frequency_hz.unwrap(), 1000.0, 20.0);
    }
}
