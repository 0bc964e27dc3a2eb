//! # Integration Tests
//!
//! Cross-crate scenarios.
//!
//! Covers:
//! - Wire codec between generator and demodulator
//! - End-to-end scene rendering and recovery
//! - Characterization sweep behaviour
//! - Channel-fed streaming without the CLI

#[cfg(test)]
mod contract_tests {
    use contracts::{ContractError, RawPacket};
    use demodulator::PhaseDemodulator;
    use scene_synth::RawPacketGenerator;

    #[test]
    fn test_wire_round_trip_demodulates_identically() {
        let scene = contracts::SceneParameters::default();
        let packet = RawPacketGenerator::from_seed(21).generate(16, 12, &scene, 99);

        let decoded = RawPacket::decode(&packet.encode()).unwrap();
        assert_eq!(decoded, packet);

        let demod = PhaseDemodulator::new(100.0, 15.0);
        let direct = demod.process(&packet).unwrap();
        let via_wire = demod.process(&decoded).unwrap();
        assert_eq!(direct.amplitude, via_wire.amplitude);
        assert_eq!(direct.valid_pixel_count(), via_wire.valid_pixel_count());
    }

    #[test]
    fn test_malformed_packet_is_distinct_from_all_invalid_frame() {
        let mut packet = RawPacket::new(0, 4, 4);
        let demod = PhaseDemodulator::new(100.0, 15.0);

        let frame = demod.process(&packet).unwrap();
        assert_eq!(frame.invalid_pixel_count(), 16);

        packet.i270.push(0);
        assert!(matches!(
            demod.process(&packet),
            Err(ContractError::ShapeMismatch { .. })
        ));
    }
}

#[cfg(test)]
mod e2e_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{CameraIntrinsics, SceneParameters};
    use demodulator::{process, PhaseDemodulator};
    use scene_synth::{FlatTarget, RawPacketGenerator, SceneSynthesizer};

    /// 4x4 sphere scene, zero noise, recovered by the demodulator
    ///
    /// Only the four central rays hit the sphere; the rest see the
    /// background plane at 2.2 m with a fifth of the amplitude.
    #[test]
    fn test_concrete_sphere_scenario() {
        let scene = SceneParameters::sphere(0.7, 1.5, 2000.0, 0.0);
        let packet = RawPacketGenerator::from_entropy().generate(4, 4, &scene, 7);
        let frame = process(&packet, 100.0, 15.0).unwrap();

        assert_eq!(packet.frame_counter, 7);
        assert_eq!(frame.pixel_count(), 16);
        assert_eq!(frame.valid_pixel_count(), 16);

        let synth = SceneSynthesizer::new(4, 4, scene);
        for y in 0..4 {
            for x in 0..4 {
                let idx = (y * 4 + x) as usize;
                let ideal = synth.ideal_pixel(x, y);
                let (amp, dist) = (frame.amplitude[idx], frame.distance[idx]);

                assert!(
                    (amp - ideal.amplitude / 2.0).abs() < 1.0,
                    "({x},{y}) amplitude {amp}"
                );
                assert!((dist - ideal.distance_m).abs() < 1e-2, "({x},{y}) distance {dist}");
                assert!((0.8..=2.2).contains(&dist), "({x},{y}) out of bounds {dist}");
            }
        }

        let on_target = (0..16).filter(|&i| frame.amplitude[i] > 900.0).count();
        assert_eq!(on_target, 4);
    }

    #[test]
    fn test_config_drives_generation_and_demodulation() {
        let content = r#"
seed = 5

[sensor]
width = 20
height = 10

[scene]
noise_std = 5.0

[processing]
amplitude_threshold = 150.0
"#;
        let bp = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap();
        let packet = RawPacketGenerator::from_optional_seed(bp.seed).generate(
            bp.sensor.width,
            bp.sensor.height,
            &bp.scene,
            0,
        );
        let frame = PhaseDemodulator::new(
            bp.processing.amplitude_threshold,
            bp.scene.unambiguous_range_m,
        )
        .process(&packet)
        .unwrap();

        // background amplitude ~200 passes, nothing is gated
        assert_eq!(frame.valid_pixel_count(), 200);
        let (min, max) = frame.distance_bounds().unwrap();
        assert!(min > 0.7 && max < 2.5, "bounds {min}..{max}");

        // same seed, same frame
        let again = RawPacketGenerator::from_seed(5).generate(20, 10, &bp.scene, 0);
        assert_eq!(again, packet);
    }

    #[test]
    fn test_point_cloud_of_flat_target_lies_at_depth() {
        let target = FlatTarget::new(3.0, 4000.0);
        let packet = RawPacketGenerator::from_seed(0).generate_flat(6, 4, &target, 0);
        let frame = process(&packet, 100.0, 15.0).unwrap();

        let intrinsics = CameraIntrinsics::for_resolution(6, 4);
        let cloud = frame.to_point_cloud(&intrinsics);
        assert_eq!(cloud.len(), 24);
        for [_, _, z] in &cloud {
            assert!((z - 3.0).abs() < 5e-3);
        }
        // left half of the image maps to negative X
        assert!(cloud[0][0] < 0.0);
        assert!(cloud[5][0] > 0.0);
    }

    #[test]
    fn test_amplitude_gate_removes_dim_background() {
        let scene = SceneParameters::sphere(0.7, 1.5, 2000.0, 0.0);
        let packet = RawPacketGenerator::from_seed(0).generate(4, 4, &scene, 0);
        let frame = process(&packet, 300.0, 15.0).unwrap();
        assert_eq!(frame.valid_pixel_count(), 4);
    }
}

#[cfg(test)]
mod characterization_tests {
    use config_loader::ConfigLoader;
    use range_analysis::{characterize_par, RangeCharacterizer, RangeNoiseModel};

    #[test]
    fn test_precision_is_monotonic_in_range() {
        let model = RangeNoiseModel::default();
        let report = characterize_par(model, &[0.5, 1.0, 2.0, 4.0, 8.0], 100, 500, 2024);

        let ranges: Vec<f32> = report.rows.iter().map(|r| r.true_distance).collect();
        assert_eq!(ranges, vec![0.5, 1.0, 2.0, 4.0, 8.0]);
        for pair in report.rows.windows(2) {
            assert!(pair[1].std_dev_error >= pair[0].std_dev_error);
        }
    }

    #[test]
    fn test_flat_noise_model_shows_no_trend() {
        // b = 0: per-pixel sigma independent of range
        let model = RangeNoiseModel::new(0.01, 0.0);
        let report = RangeCharacterizer::from_seed(model, 3).characterize_all(&[1.0, 5.0], 200, 100);
        let expected = 0.01 / 10.0;
        for row in &report.rows {
            assert!((row.std_dev_error - expected).abs() < 0.3 * expected, "{row:?}");
        }
    }

    #[test]
    fn test_default_sweep_from_config() {
        let bp = ConfigLoader::load_or_default(None).unwrap();
        let sweep = &bp.characterization;
        let report = characterize_par(
            bp.noise_model.into(),
            &sweep.distances_m,
            10,
            50,
            bp.seed.unwrap_or(1),
        );
        assert_eq!(report.len(), sweep.distances_m.len());
        assert!(report.to_csv().starts_with("true_range_m,mean_error_m,std_dev_m\n"));
    }
}

#[cfg(test)]
mod stream_tests {
    use contracts::{RawPacket, SceneParameters};
    use demodulator::PhaseDemodulator;
    use observability::FrameMetricsAggregator;
    use scene_synth::RawPacketGenerator;
    use tokio::sync::mpsc;

    /// Generator task -> bounded channel -> demodulator, frames stay in order
    #[tokio::test]
    async fn test_channel_fed_demodulation() {
        let (tx, mut rx) = mpsc::channel::<RawPacket>(2);
        let frames = 6u32;

        let producer = tokio::spawn(async move {
            let mut generator = RawPacketGenerator::from_seed(8);
            let scene = SceneParameters::default();
            for counter in 0..frames {
                let packet = generator.generate(8, 8, &scene, counter);
                if tx.send(packet).await.is_err() {
                    break;
                }
            }
        });

        let demod = PhaseDemodulator::new(100.0, 15.0);
        let mut aggregator = FrameMetricsAggregator::new();
        let mut counters = Vec::new();
        while let Some(packet) = rx.recv().await {
            let frame = demod.process(&packet).unwrap();
            aggregator.update(&frame, 0.0);
            counters.push(packet.frame_counter);
        }
        producer.await.unwrap();

        assert_eq!(counters, (0..frames).collect::<Vec<_>>());
        let summary = aggregator.summary();
        assert_eq!(summary.total_frames, 6);
        assert_eq!(summary.valid_pixels + summary.invalid_pixels, 6 * 64);
    }
}
