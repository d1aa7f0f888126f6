/// Length of `len` samples once converted from `from_rate` to `to_rate`, rounded up.
pub fn resampled_len(len: usize, from_rate: u32, to_rate: u32) -> usize {
    if from_rate == 0 || to_rate == 0 {
        return 0;
    }
    (len as u64 * to_rate as u64).div_ceil(from_rate as u64) as usize
}

/// Linear-interpolation resampler.
///
/// Target sample `j` reads source position `j * from_rate / to_rate`; positions past
/// the end repeat the last source sample. Positions are computed in integers so that
/// long inputs do not drift.
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }
    if from_rate == 0 || to_rate == 0 {
        return Vec::new();
    }

    let last = samples.len() - 1;
    let from = from_rate as u64;
    let to = to_rate as u64;
    let new_len = resampled_len(samples.len(), from_rate, to_rate);

    (0..new_len as u64)
        .map(|j| {
            let scaled = j * from;
            let idx = ((scaled / to) as usize).min(last);
            let frac = (scaled % to) as f64 / to as f64;
            let a = samples[idx] as f64;
            let b = samples[(idx + 1).min(last)] as f64;
            (a + (b - a) * frac) as f32
        })
        .collect()
}

/// Repeat or truncate `samples` to exactly `len` entries.
///
/// An empty input yields silence.
pub fn loop_to_length(samples: &[f32], len: usize) -> Vec<f32> {
    if samples.is_empty() {
        return vec![0.0; len];
    }
    samples.iter().copied().cycle().take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_is_identity() {
        let samples = vec![0.1, -0.2, 0.3];
        assert_eq!(resample_linear(&samples, 24_000, 24_000), samples);
    }

    #[test]
    fn test_downsample_length_rounds_up() {
        assert_eq!(resampled_len(44_100, 44_100, 24_000), 24_000);
        assert_eq!(resampled_len(10, 3, 2), 7);
        assert_eq!(resample_linear(&[0.0; 10], 3, 2).len(), 7);
    }

    #[test]
    fn test_upsample_interpolates_between_neighbours() {
        let out = resample_linear(&[0.0, 1.0, 0.0], 1, 2);
        assert_eq!(out, vec![0.0, 0.5, 1.0, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_fractional_position() {
        // 44.1k -> 24k: second output sample sits at source 1.8375
        let src: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let out = resample_linear(&src, 44_100, 24_000);
        assert!((out[1] - 1.8375).abs() < 1e-6);
    }

    #[test]
    fn test_tail_repeats_last_sample() {
        let out = resample_linear(&[0.25, 0.75], 1, 4);
        assert_eq!(out.len(), 8);
        assert!(out[4..].iter().all(|s| *s == 0.75));
    }

    #[test]
    fn test_loop_wraps_modulo() {
        let music: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let looped = loop_to_length(&music, 25);
        let expected: Vec<f32> = (0..25).map(|i| (i % 10) as f32).collect();
        assert_eq!(looped, expected);

        assert_eq!(loop_to_length(&music, 4), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(loop_to_length(&[], 3), vec![0.0; 3]);
    }
}
