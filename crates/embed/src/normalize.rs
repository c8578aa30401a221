/// In-place L2 normalization. Returns the norm measured before scaling so callers can
/// reject degenerate vectors; a zero norm leaves `v` untouched.
pub fn l2_normalize_in_place(v: &mut [f32]) -> f32 {
    let norm = l2_norm(v);
    if norm > 0.0 && norm.is_finite() {
        let inv_norm = norm.recip();
        for x in v.iter_mut() {
            *x *= inv_norm;
        }
    }
    norm
}

/// Euclidean length of `v`.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Plain dot product; equals cosine similarity when both sides are unit length.
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_length_before_scaling() {
        let mut v = vec![0.0f32, 2.0, 0.0, 0.0];
        assert_eq!(l2_normalize_in_place(&mut v), 2.0);
        assert_eq!(v, vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn encoder_sized_vector_becomes_unit_length() {
        let mut v: Vec<f32> = (0..512).map(|i| (i as f32 * 0.37).sin()).collect();
        let before = l2_norm(&v);
        let reported = l2_normalize_in_place(&mut v);
        assert_eq!(reported, before);
        assert!((l2_norm(&v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn direction_and_sign_survive() {
        let mut v = vec![-1.0f32, 2.0, -2.0];
        let norm = l2_normalize_in_place(&mut v);
        assert!((norm - 3.0).abs() < 1e-6);
        let expected = [-1.0 / 3.0, 2.0 / 3.0, -2.0 / 3.0];
        for (got, want) in v.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
    }

    #[test]
    fn zero_vector_reports_zero_and_stays_put() {
        let mut v = vec![0.0f32; 3];
        assert_eq!(l2_normalize_in_place(&mut v), 0.0);
        assert_eq!(v, vec![0.0; 3]);

        let mut empty: Vec<f32> = Vec::new();
        assert_eq!(l2_normalize_in_place(&mut empty), 0.0);
    }

    #[test]
    fn non_finite_norm_is_reported_without_scaling() {
        let mut nan = vec![f32::NAN, 1.0];
        assert!(l2_normalize_in_place(&mut nan).is_nan());
        assert_eq!(nan[1], 1.0);

        let mut inf = vec![f32::INFINITY, 1.0];
        assert!(l2_normalize_in_place(&mut inf).is_infinite());
        assert_eq!(inf[1], 1.0);
    }

    #[test]
    fn already_unit_vector_reports_one() {
        let mut v = vec![0.6f32, 0.8];
        let norm = l2_normalize_in_place(&mut v);
        assert!((norm - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn dot_of_unit_vectors_is_cosine() {
        let a = [0.6f32, 0.8];
        let b = [0.8f32, 0.6];
        assert!((dot(&a, &b) - 0.96).abs() < 1e-6);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-6);
    }
}
