//! 端到端流程测试：曲线 → 峰 → 相

use approx::assert_abs_diff_eq;
use lipidsaxs::detect::{merge_detections, DetectorConfig, PeakDetector};
use lipidsaxs::fitting::voigt;
use lipidsaxs::models::{Peak, PeakSet, PhaseTag, Spectrum};
use lipidsaxs::parsers::parse_spectrum_content;
use lipidsaxs::phase::PhaseIdentifier;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};
use std::f64::consts::PI;

const DIAMOND: [u32; 8] = [2, 3, 4, 6, 8, 9, 10, 12];
const PRIMITIVE: [u32; 8] = [2, 4, 6, 8, 10, 12, 14, 16];
const GYROID: [u32; 8] = [6, 8, 14, 16, 20, 22, 24, 26];

fn cubic_peaks(a: f64, indices: &[u32]) -> Vec<f64> {
    indices
        .iter()
        .map(|&m| 2.0 * PI * (m as f64).sqrt() / a)
        .collect()
}

/// 线性背景上按给定峰位叠加 Voigt 峰
fn synthetic_curve(centers: &[f64], amplitude: f64, sigma: f64) -> Vec<(f64, f64)> {
    (0..300)
        .map(|i| {
            let q = 0.05 + i as f64 * 0.001;
            let peaks: f64 = centers.iter().map(|&c| voigt(q, amplitude, c, sigma)).sum();
            (q, 10.0 - 5.0 * q + peaks)
        })
        .collect()
}

fn detector(min_separation: f64) -> PeakDetector {
    PeakDetector::new(DetectorConfig {
        lo_q: 0.06,
        hi_q: 0.3,
        min_separation,
        height_threshold: Some(0.1),
        ..DetectorConfig::default()
    })
    .unwrap()
}

#[test]
fn test_diamond_curve_end_to_end() {
    let centers = cubic_peaks(100.0, &DIAMOND);
    let points = synthetic_curve(&centers, 0.5, 0.0015);
    let spectrum = Spectrum::from_points("diamond", &points).unwrap();

    let peaks = detector(0.005).detect(&spectrum);
    assert!(peaks.len() >= 7, "found {:?}", peaks.positions());

    let result = PhaseIdentifier::default().identify(&peaks, 0.06);
    let d = result.get(PhaseTag::D).expect("diamond phase");
    assert_abs_diff_eq!(d.lattice_parameter, 100.0, epsilon = 0.5);
    assert!(d.peaks.len() >= 6);
    assert!(!result.contains(PhaseTag::P));
}

#[test]
fn test_inline_content_to_peaks() {
    let points = synthetic_curve(&[0.1, 0.16], 1.0, 0.002);
    let mut content = String::from("# q\tI\n");
    for (q, i) in &points {
        content.push_str(&format!("{}\t{}\n", q, i));
    }

    let spectrum = parse_spectrum_content(&content, "inline", None).unwrap();
    assert_eq!(spectrum.len(), 300);

    let peaks = detector(0.01).detect(&spectrum);
    assert_eq!(peaks.len(), 2);
    assert_abs_diff_eq!(peaks.peaks()[0].q, 0.1, epsilon = 0.002);
    assert_abs_diff_eq!(peaks.peaks()[1].q, 0.16, epsilon = 0.002);
}

#[test]
fn test_overlapping_detections_collapse() {
    let raw: Vec<Peak> = [0.1000, 0.1004, 0.1011, 0.2001, 0.2003]
        .iter()
        .map(|&q| Peak::at(q))
        .collect();

    let merged = merge_detections(&raw, 0.005);
    assert_eq!(merged.len(), 2);
    assert_abs_diff_eq!(merged.peaks()[0].q, 0.1005, epsilon = 1e-9);
    assert_abs_diff_eq!(merged.peaks()[1].q, 0.2002, epsilon = 1e-9);
}

#[test]
fn test_coexisting_cubic_phases() {
    let mut positions = cubic_peaks(2.0 * PI / 0.06, &PRIMITIVE);
    positions.extend(cubic_peaks(2.0 * PI / (0.06 * 1.28), &DIAMOND));
    let peaks = PeakSet::from_positions(&positions);

    let result = PhaseIdentifier::default().identify(&peaks, 0.04);

    let d = result.get(PhaseTag::D).expect("diamond phase");
    let p = result.get(PhaseTag::P).expect("primitive phase");
    assert_abs_diff_eq!(d.lattice_parameter, 2.0 * PI / (0.06 * 1.28), epsilon = 1e-6);
    assert_abs_diff_eq!(p.lattice_parameter, 2.0 * PI / 0.06, epsilon = 1e-6);
    assert!(d.peaks.iter().all(|q| !p.peaks.contains(q)));
    assert!(result.unassigned_peaks.is_empty());
    assert_eq!(result.assigned_count(), 16);
}

#[test]
fn test_gyroid_kept_beside_diamond_and_primitive() {
    // G(20) 距 D(3) 只有 0.0006，仍归 G
    let mut positions = cubic_peaks(69.98, &DIAMOND);
    positions.extend(cubic_peaks(180.0, &GYROID));
    let result = PhaseIdentifier::default().identify(&PeakSet::from_positions(&positions), 0.04);

    let d = result.get(PhaseTag::D).expect("diamond phase");
    let g = result.get(PhaseTag::G).expect("gyroid phase");
    assert_eq!(d.indices, DIAMOND.to_vec());
    assert_eq!(g.indices, GYROID.to_vec());
    assert_abs_diff_eq!(d.lattice_parameter, 69.98, epsilon = 0.1);
    assert_abs_diff_eq!(g.lattice_parameter, 180.0, epsilon = 1e-6);
    assert!(result.unassigned_peaks.is_empty());

    let mut positions = cubic_peaks(120.0, &PRIMITIVE);
    positions.extend(cubic_peaks(200.0, &GYROID));
    let result = PhaseIdentifier::default().identify(&PeakSet::from_positions(&positions), 0.04);

    assert_eq!(result.get(PhaseTag::P).map(|p| p.peaks.len()), Some(8));
    assert_eq!(result.get(PhaseTag::G).map(|g| g.peaks.len()), Some(8));
    assert!(result.unassigned_peaks.is_empty());
}

#[test]
fn test_lamellar_series() {
    let peaks = PeakSet::from_positions(&[0.1, 0.2, 0.3]);
    let result = PhaseIdentifier::default().identify(&peaks, 0.04);

    let la = result.get(PhaseTag::La).expect("lamellar phase");
    assert_abs_diff_eq!(la.lattice_parameter, 2.0 * PI / 0.1, epsilon = 1e-9);
    assert_eq!(la.indices, vec![1, 2, 3]);
}

#[test]
fn test_fundamental_below_search_window_rejected() {
    let peaks = PeakSet::from_positions(&cubic_peaks(100.0, &DIAMOND));
    let lowest = peaks.peaks()[0].q;

    let result = PhaseIdentifier::default().identify(&peaks, lowest + 0.001);
    assert!(!result.contains(PhaseTag::D));
    assert!(result.unassigned_peaks.contains(&lowest));
}

#[test]
fn test_trivial_peak_lists() {
    let identifier = PhaseIdentifier::default();

    let empty = identifier.identify(&PeakSet::default(), 0.04);
    assert!(empty.is_empty());
    assert!(empty.unassigned_peaks.is_empty());

    let single = identifier.identify(&PeakSet::from_positions(&[0.1]), 0.04);
    assert!(single.is_empty());
    assert_eq!(single.unassigned_peaks, vec![0.1]);
}

fn random_peaks(seed: u64) -> PeakSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let count = Uniform::new_inclusive(2usize, 14).sample(&mut rng);
    let position = Uniform::new(0.04, 0.35);
    let noise = Normal::new(0.0, 2e-4).unwrap();

    let mut positions: Vec<f64> = (0..count).map(|_| position.sample(&mut rng)).collect();
    // 一半样本混入真实的立方序列
    if seed % 2 == 0 {
        let a = Uniform::new(60.0, 140.0).sample(&mut rng);
        positions.extend(
            cubic_peaks(a, &DIAMOND)
                .into_iter()
                .map(|q| q + noise.sample(&mut rng)),
        );
    }
    PeakSet::from_positions(&positions)
}

#[test]
fn test_identification_is_deterministic() {
    let identifier = PhaseIdentifier::default();
    for seed in 0..20 {
        let peaks = random_peaks(seed);
        let first = identifier.identify(&peaks, 0.04);
        let second = identifier.identify(&peaks, 0.04);
        assert_eq!(first, second, "seed {}", seed);
    }
}

#[test]
fn test_assignments_partition_the_peaks() {
    let identifier = PhaseIdentifier::default();
    for seed in 0..20 {
        let peaks = random_peaks(seed);
        let result = identifier.identify(&peaks, 0.04);

        let mut seen: Vec<f64> = result
            .phases
            .values()
            .flat_map(|a| a.peaks.iter().copied())
            .chain(result.unassigned_peaks.iter().copied())
            .collect();
        seen.sort_by(|a, b| a.total_cmp(b));
        seen.dedup();
        assert_eq!(seen.len(), peaks.len());
        assert_eq!(seen.len(), result.assigned_count() + result.unassigned_peaks.len());

        // 剩余峰再识别一次，未指认数不会增加
        let leftover = PeakSet::from_positions(&result.unassigned_peaks);
        let again = identifier.identify(&leftover, 0.04);
        assert!(again.unassigned_peaks.len() <= result.unassigned_peaks.len());
    }
}
