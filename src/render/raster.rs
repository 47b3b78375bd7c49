use ndarray::{Array2, ArrayView2};

/// Resample `src` onto a `rows × cols` grid with bilinear interpolation,
/// sampling at pixel centres and clamping at the edges.
pub fn resample_bilinear(src: ArrayView2<f32>, rows: usize, cols: usize) -> Array2<f32> {
    let (src_rows, src_cols) = src.dim();
    if src_rows == 0 || src_cols == 0 {
        return Array2::zeros((rows, cols));
    }
    let axis = |dst: usize, dst_len: usize, src_len: usize| {
        let pos = ((dst as f32 + 0.5) * src_len as f32 / dst_len as f32 - 0.5)
            .clamp(0.0, (src_len - 1) as f32);
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(src_len - 1);
        (lo, hi, pos - lo as f32)
    };
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let (r0, r1, fr) = axis(r, rows, src_rows);
        let (c0, c1, fc) = axis(c, cols, src_cols);
        let top = src[[r0, c0]] * (1.0 - fc) + src[[r0, c1]] * fc;
        let bottom = src[[r1, c0]] * (1.0 - fc) + src[[r1, c1]] * fc;
        top * (1.0 - fr) + bottom * fr
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn same_size_is_identity() {
        let a = array![[1.0_f32, 2.0], [3.0, 4.0]];
        assert_eq!(resample_bilinear(a.view(), 2, 2), a);
    }

    #[test]
    fn upsampling_interpolates() {
        let a = array![[0.0_f32, 4.0]];
        let r = resample_bilinear(a.view(), 1, 4);
        assert_eq!(r, array![[0.0, 1.0, 3.0, 4.0]]);
    }

    #[test]
    fn empty_source() {
        let a = Array2::<f32>::zeros((0, 3));
        assert_eq!(resample_bilinear(a.view(), 2, 2), Array2::<f32>::zeros((2, 2)));
    }
}
