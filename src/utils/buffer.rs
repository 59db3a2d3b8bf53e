// -------------------------------------------------------------------------------------------------

/// Multiply every sample in the given buffer with the given scale factor.
pub fn scale_buffer(buffer: &mut [f32], scale: f32) {
    if scale == 1.0 {
        return;
    }
    for sample in buffer.iter_mut() {
        *sample *= scale;
    }
}

// -------------------------------------------------------------------------------------------------

/// Sum of all squared sample values in the given buffer.
pub fn buffer_energy(buffer: &[f32]) -> f64 {
    buffer
        .iter()
        .map(|sample| *sample as f64 * *sample as f64)
        .sum()
}

/// Root mean square level of the given buffer. Returns 0 for empty buffers.
pub fn buffer_rms(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    (buffer_energy(buffer) / buffer.len() as f64).sqrt() as f32
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale() {
        let mut buffer = vec![1.0, -0.5, 0.25, 0.0];
        scale_buffer(&mut buffer, 2.0);
        assert_eq!(buffer, vec![2.0, -1.0, 0.5, 0.0]);

        scale_buffer(&mut buffer, 1.0);
        assert_eq!(buffer, vec![2.0, -1.0, 0.5, 0.0]);
    }

    #[test]
    fn energy_and_rms() {
        assert_eq!(buffer_energy(&[]), 0.0);
        assert_eq!(buffer_rms(&[]), 0.0);

        let buffer = vec![0.5, -0.5, 0.5, -0.5];
        assert!((buffer_energy(&buffer) - 1.0).abs() < 1e-9);
        assert!((buffer_rms(&buffer) - 0.5).abs() < 1e-6);
    }
}
