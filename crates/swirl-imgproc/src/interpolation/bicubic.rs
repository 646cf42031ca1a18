use swirl_image::Image;

/// Free parameter of the Keys cubic convolution kernel, same value as OpenCV's INTER_CUBIC.
const CUBIC_A: f32 = -0.75;

/// Compute the four cubic convolution weights for a fractional offset `t` in `[0, 1)`.
///
/// The weights apply to the samples at offsets -1, 0, 1 and 2 and always sum to one.
#[inline]
fn cubic_weights(t: f32) -> [f32; 4] {
    let a = CUBIC_A;
    let t1 = t + 1.0;
    let w0 = ((a * t1 - 5.0 * a) * t1 + 8.0 * a) * t1 - 4.0 * a;
    let w1 = ((a + 2.0) * t - (a + 3.0)) * t * t + 1.0;
    let s = 1.0 - t;
    let w2 = ((a + 2.0) * s - (a + 3.0)) * s * s + 1.0;
    let w3 = 1.0 - w0 - w1 - w2;
    [w0, w1, w2, w3]
}

/// Kernel for bicubic interpolation
///
/// Samples the 4x4 neighbourhood around `(u, v)`. Neighbours falling outside
/// the image replicate the border pixel.
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values.
pub(crate) fn bicubic_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows() as isize, image.cols() as isize);

    let u0 = u.floor();
    let v0 = v.floor();
    let wx = cubic_weights(u - u0);
    let wy = cubic_weights(v - v0);
    let (iu, iv) = (u0 as isize, v0 as isize);

    let data = image.as_slice();
    let mut pixel = [0.0; C];

    for (j, wyj) in wy.iter().enumerate() {
        let row = (iv - 1 + j as isize).clamp(0, rows - 1);
        for (i, wxi) in wx.iter().enumerate() {
            let col = (iu - 1 + i as isize).clamp(0, cols - 1);
            let w = wyj * wxi;
            let base = (row * cols + col) as usize * C;
            pixel
                .iter_mut()
                .zip(&data[base..base + C])
                .for_each(|(p, s)| *p += w * s);
        }
    }

    pixel
}
