use swirl_image::Image;

/// Summed area tables of an 8-bit grayscale image.
///
/// All tables are `(width + 1) x (height + 1)` with a zero first row and
/// column, so the sum of the rectangle `[x, x + w) x [y, y + h)` needs four
/// lookups.
#[derive(Debug, Clone)]
pub struct IntegralImage {
    width: usize,
    sum: Vec<i64>,
    sqsum: Vec<i64>,
    tilted: Option<Vec<i64>>,
}

impl IntegralImage {
    /// Compute the integral and squared integral of `src`.
    ///
    /// The 45 degree rotated integral is only built when `with_tilted` is set.
    pub fn new(src: &Image<u8, 1>, with_tilted: bool) -> Self {
        let (width, height) = (src.width(), src.height());
        let stride = width + 1;
        let data = src.as_slice();

        let mut sum = vec![0i64; stride * (height + 1)];
        let mut sqsum = vec![0i64; stride * (height + 1)];

        for y in 0..height {
            let (mut row_sum, mut row_sqsum) = (0i64, 0i64);
            for x in 0..width {
                let v = data[y * width + x] as i64;
                row_sum += v;
                row_sqsum += v * v;
                let idx = (y + 1) * stride + x + 1;
                sum[idx] = sum[idx - stride] + row_sum;
                sqsum[idx] = sqsum[idx - stride] + row_sqsum;
            }
        }

        let tilted = with_tilted.then(|| tilted_integral(data, width, height));

        Self {
            width,
            sum,
            sqsum,
            tilted,
        }
    }

    #[inline]
    fn at(table: &[i64], stride: usize, x: usize, y: usize) -> i64 {
        table[y * stride + x]
    }

    /// Sum of the pixels in `[x, x + w) x [y, y + h)`.
    #[inline]
    pub fn rect_sum(&self, x: usize, y: usize, w: usize, h: usize) -> i64 {
        let s = self.width + 1;
        Self::at(&self.sum, s, x, y) - Self::at(&self.sum, s, x + w, y)
            - Self::at(&self.sum, s, x, y + h)
            + Self::at(&self.sum, s, x + w, y + h)
    }

    /// Sum of the squared pixels in `[x, x + w) x [y, y + h)`.
    #[inline]
    pub fn rect_sqsum(&self, x: usize, y: usize, w: usize, h: usize) -> i64 {
        let s = self.width + 1;
        Self::at(&self.sqsum, s, x, y) - Self::at(&self.sqsum, s, x + w, y)
            - Self::at(&self.sqsum, s, x, y + h)
            + Self::at(&self.sqsum, s, x + w, y + h)
    }

    /// Sum of a rectangle rotated by 45 degrees.
    ///
    /// The rectangle hangs from its top corner `(x, y)`, extends `w` pixels
    /// down-right and `h` pixels down-left, covering `2 * w * h` pixels. The caller guarantees `x >= h`,
    /// `x + w <= width` and `y + w + h <= height`. Returns zero when the
    /// rotated table was not built.
    #[inline]
    pub fn tilted_sum(&self, x: usize, y: usize, w: usize, h: usize) -> i64 {
        let Some(t) = &self.tilted else {
            return 0;
        };
        let s = self.width + 1;
        Self::at(t, s, x, y) - Self::at(t, s, x - h, y + h) - Self::at(t, s, x + w, y + w)
            + Self::at(t, s, x + w - h, y + w + h)
    }
}

/// Rotated summed area table.
///
/// `T(X, Y)` sums the pixels `(x, y)` with `y < Y` and
/// `|x - X + 1| <= Y - y - 1`, a cone opening upwards from `(X - 1, Y - 1)`.
/// The cones leave the image on both sides, so the table is built on a grid
/// padded by `height + 1` columns and cropped afterwards.
fn tilted_integral(data: &[u8], width: usize, height: usize) -> Vec<i64> {
    let pad = height + 1;
    let ext = width + 1 + 2 * pad;

    let pixel = |x: isize, y: isize| -> i64 {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            0
        } else {
            data[y as usize * width + x as usize] as i64
        }
    };

    let mut table = vec![0i64; ext * (height + 1)];
    let get = |t: &[i64], col: isize, row: isize| -> i64 {
        if col < 0 || row < 0 || col >= ext as isize {
            0
        } else {
            t[row as usize * ext + col as usize]
        }
    };

    for row in 1..=height as isize {
        for col in 0..ext as isize {
            // column `col` of the padded grid is `X = col - pad`
            let x = col - pad as isize;
            let v = get(&table, col - 1, row - 1) + get(&table, col + 1, row - 1)
                - get(&table, col, row - 2)
                + pixel(x - 1, row - 1)
                + pixel(x - 1, row - 2);
            table[row as usize * ext + col as usize] = v;
        }
    }

    let stride = width + 1;
    let mut tilted = vec![0i64; stride * (height + 1)];
    for row in 0..=height {
        let src = &table[row * ext + pad..row * ext + pad + stride];
        tilted[row * stride..(row + 1) * stride].copy_from_slice(src);
    }

    tilted
}
