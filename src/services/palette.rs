//! Dominant-color extraction by modified median cut (MMCQ).
//!
//! Colors are binned into a 5-bit-per-channel histogram. Boxes in that
//! histogram are split at the population median along their widest axis:
//! first by population until 75% of the requested colors exist, then by
//! population times volume for the rest. Each box reports the
//! population-weighted average of its cell centers.

use lqip_core::Srgb;

const SIGBITS: u32 = 5;
const RSHIFT: u32 = 8 - SIGBITS;
const SIDE: usize = 1 << SIGBITS;
const MAX_ITERATIONS: usize = 1000;
const FRACT_BY_POPULATIONS: f64 = 0.75;

/// Produces a palette ordered from most to least prevalent.
pub trait PaletteExtractor: Send + Sync {
    fn palette(&self, pixels: &[Srgb], max_colors: u8) -> Vec<Srgb>;
}

/// First entry of the extractor's palette.
pub fn dominant_color<P: PaletteExtractor + ?Sized>(
    extractor: &P,
    pixels: &[Srgb],
    max_colors: u8,
) -> Option<Srgb> {
    extractor.palette(pixels, max_colors).into_iter().next()
}

/// Modified median cut quantizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianCut;

impl PaletteExtractor for MedianCut {
    fn palette(&self, pixels: &[Srgb], max_colors: u8) -> Vec<Srgb> {
        quantize(pixels, max_colors as usize)
    }
}

#[inline]
fn color_index(r: usize, g: usize, b: usize) -> usize {
    (r << (2 * SIGBITS)) + (g << SIGBITS) + b
}

#[inline]
fn bin(pixel: Srgb) -> [usize; 3] {
    [
        (pixel.r >> RSHIFT) as usize,
        (pixel.g >> RSHIFT) as usize,
        (pixel.b >> RSHIFT) as usize,
    ]
}

struct Histogram {
    counts: Vec<u32>,
}

impl Histogram {
    fn from_pixels(pixels: &[Srgb]) -> Self {
        let mut counts = vec![0u32; SIDE * SIDE * SIDE];
        for &pixel in pixels {
            let [r, g, b] = bin(pixel);
            counts[color_index(r, g, b)] += 1;
        }
        Self { counts }
    }

    #[inline]
    fn get(&self, r: i32, g: i32, b: i32) -> u32 {
        self.counts[color_index(r as usize, g as usize, b as usize)]
    }
}

/// Inclusive bounds per axis. A box can end up empty (`lo > hi`) after a
/// degenerate split; its population and volume are then zero.
#[derive(Debug, Clone)]
struct ColorBox {
    lo: [i32; 3],
    hi: [i32; 3],
    count: u32,
}

impl ColorBox {
    fn new(lo: [i32; 3], hi: [i32; 3], histogram: &Histogram) -> Self {
        let mut count = 0;
        for_each_cell(&lo, &hi, |r, g, b| count += histogram.get(r, g, b));
        Self { lo, hi, count }
    }

    fn from_pixels(pixels: &[Srgb], histogram: &Histogram) -> Self {
        let mut lo = [i32::MAX; 3];
        let mut hi = [i32::MIN; 3];
        for &pixel in pixels {
            for (axis, v) in bin(pixel).into_iter().enumerate() {
                lo[axis] = lo[axis].min(v as i32);
                hi[axis] = hi[axis].max(v as i32);
            }
        }
        Self::new(lo, hi, histogram)
    }

    fn width(&self, axis: usize) -> i32 {
        (self.hi[axis] - self.lo[axis] + 1).max(0)
    }

    fn volume(&self) -> u64 {
        (0..3).map(|axis| self.width(axis) as u64).product()
    }

    fn weight(&self) -> u64 {
        self.count as u64 * self.volume()
    }

    fn average(&self, histogram: &Histogram) -> Srgb {
        let mult = (1 << RSHIFT) as f64;
        let mut total = 0u64;
        let mut sums = [0.0f64; 3];

        for_each_cell(&self.lo, &self.hi, |r, g, b| {
            let h = histogram.get(r, g, b);
            if h > 0 {
                total += h as u64;
                for (sum, v) in sums.iter_mut().zip([r, g, b]) {
                    *sum += h as f64 * (v as f64 + 0.5) * mult;
                }
            }
        });

        if total > 0 {
            let [r, g, b] = sums.map(|s| (s / total as f64) as u8);
            Srgb::new(r, g, b)
        } else {
            let center = |axis: usize| (mult * (self.lo[axis] + self.hi[axis] + 1) as f64 / 2.0) as u8;
            Srgb::new(center(0), center(1), center(2))
        }
    }
}

fn for_each_cell(lo: &[i32; 3], hi: &[i32; 3], mut f: impl FnMut(i32, i32, i32)) {
    for r in lo[0]..=hi[0] {
        for g in lo[1]..=hi[1] {
            for b in lo[2]..=hi[2] {
                f(r, g, b);
            }
        }
    }
}

/// Split a box at the population median of its widest axis.
///
/// Returns `None` for an empty box and a single box when it holds one pixel.
fn median_cut_apply(histogram: &Histogram, cbox: &ColorBox) -> Option<(ColorBox, Option<ColorBox>)> {
    if cbox.count == 0 {
        return None;
    }
    if cbox.count == 1 {
        return Some((cbox.clone(), None));
    }

    let widths = [cbox.width(0), cbox.width(1), cbox.width(2)];
    let max_width = widths.into_iter().max().unwrap_or(0);
    let axis = widths.iter().position(|&w| w == max_width).unwrap_or(0);
    let (other1, other2) = match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    let lo = cbox.lo[axis];
    let hi = cbox.hi[axis];

    // Running population along the cut axis; defined only for lo..=hi
    let mut partial = vec![0u64; (hi - lo + 1) as usize];
    let mut total = 0u64;
    for i in lo..=hi {
        let mut sum = 0u64;
        for j in cbox.lo[other1]..=cbox.hi[other1] {
            for k in cbox.lo[other2]..=cbox.hi[other2] {
                let mut cell = [0i32; 3];
                cell[axis] = i;
                cell[other1] = j;
                cell[other2] = k;
                sum += histogram.get(cell[0], cell[1], cell[2]) as u64;
            }
        }
        total += sum;
        partial[(i - lo) as usize] = total;
    }

    let partial_at = |i: i32| -> Option<u64> {
        if i < lo || i > hi {
            None
        } else {
            Some(partial[(i - lo) as usize])
        }
    };
    let lookahead_at = |i: i32| partial_at(i).map(|p| total - p);
    let nonzero = |v: Option<u64>| v.is_some_and(|v| v != 0);

    for i in lo..=hi {
        if (partial_at(i).unwrap_or(0) as f64) <= total as f64 / 2.0 {
            continue;
        }

        let left = (i - lo) as f64;
        let right = (hi - i) as f64;
        let mut d2 = if left <= right {
            (hi - 1).min((i as f64 + right / 2.0).trunc() as i32)
        } else {
            lo.max((i as f64 - 1.0 - left / 2.0).trunc() as i32)
        };

        // Avoid 0-count boxes
        while !nonzero(partial_at(d2)) {
            d2 += 1;
        }
        let mut count2 = lookahead_at(d2).unwrap_or(0);
        while count2 == 0 && nonzero(partial_at(d2 - 1)) {
            d2 -= 1;
            count2 = lookahead_at(d2).unwrap_or(0);
        }

        let mut hi1 = cbox.hi;
        hi1[axis] = d2;
        let mut lo2 = cbox.lo;
        lo2[axis] = d2 + 1;

        return Some((
            ColorBox::new(cbox.lo, hi1, histogram),
            Some(ColorBox::new(lo2, cbox.hi, histogram)),
        ));
    }

    None
}

/// Lazily sorted queue; `pop` returns the box with the largest key,
/// the latest-inserted one among equals.
struct BoxQueue {
    contents: Vec<ColorBox>,
    sorted: bool,
    key: fn(&ColorBox) -> u64,
}

impl BoxQueue {
    fn new(key: fn(&ColorBox) -> u64) -> Self {
        Self {
            contents: Vec::new(),
            sorted: false,
            key,
        }
    }

    fn push(&mut self, cbox: ColorBox) {
        self.contents.push(cbox);
        self.sorted = false;
    }

    fn pop(&mut self) -> Option<ColorBox> {
        if !self.sorted {
            self.contents.sort_by_key(self.key);
            self.sorted = true;
        }
        self.contents.pop()
    }

    fn len(&self) -> usize {
        self.contents.len()
    }
}

/// Keep splitting the largest box until `target` boxes exist.
fn iterate(queue: &mut BoxQueue, histogram: &Histogram, target: f64) {
    let mut ncolors = queue.len();
    let mut niters = 0;

    while niters < MAX_ITERATIONS {
        if ncolors as f64 >= target {
            return;
        }
        niters += 1;

        let Some(cbox) = queue.pop() else {
            return;
        };
        if cbox.count == 0 {
            queue.push(cbox);
            niters += 1;
            continue;
        }

        let Some((first, second)) = median_cut_apply(histogram, &cbox) else {
            return;
        };
        queue.push(first);
        if let Some(second) = second {
            queue.push(second);
            ncolors += 1;
        }
    }
}

/// Quantize `pixels` into at most `max_colors` colors, most prevalent first.
///
/// Returns an empty palette for no pixels or `max_colors` outside 2..=256.
pub fn quantize(pixels: &[Srgb], max_colors: usize) -> Vec<Srgb> {
    if pixels.is_empty() || !(2..=256).contains(&max_colors) {
        return Vec::new();
    }

    let histogram = Histogram::from_pixels(pixels);
    let initial = ColorBox::from_pixels(pixels, &histogram);

    let mut by_count = BoxQueue::new(|b| b.count as u64);
    by_count.push(initial);
    iterate(&mut by_count, &histogram, FRACT_BY_POPULATIONS * max_colors as f64);

    let mut by_weight = BoxQueue::new(ColorBox::weight);
    while let Some(cbox) = by_count.pop() {
        by_weight.push(cbox);
    }
    let remaining = max_colors as f64 - by_weight.len() as f64;
    iterate(&mut by_weight, &histogram, remaining);

    let mut palette = Vec::with_capacity(by_weight.len());
    while let Some(cbox) = by_weight.pop() {
        palette.push(cbox.average(&histogram));
    }
    palette
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input_gives_empty_palette() {
        assert!(quantize(&[], 4).is_empty());
        assert_eq!(dominant_color(&MedianCut, &[], 4), None);
    }

    #[test]
    fn test_invalid_color_count_gives_empty_palette() {
        let pixels = [Srgb::new(1, 2, 3); 8];
        assert!(quantize(&pixels, 1).is_empty());
        assert!(quantize(&pixels, 257).is_empty());
    }

    #[test]
    fn test_solid_color_reports_cell_center() {
        // 200 >> 3 = 25 -> (25 + 0.5) * 8 = 204; 30 >> 3 = 3 -> 28
        let pixels = vec![Srgb::new(200, 30, 30); 100];
        assert_eq!(
            dominant_color(&MedianCut, &pixels, 4),
            Some(Srgb::new(204, 28, 28))
        );
    }

    #[test]
    fn test_single_pixel() {
        let palette = quantize(&[Srgb::new(0, 0, 0)], 4);
        assert_eq!(palette.first(), Some(&Srgb::new(4, 4, 4)));
    }

    #[test]
    fn test_two_colors_are_separated() {
        let mut pixels = vec![Srgb::new(255, 0, 0); 75];
        pixels.extend(vec![Srgb::new(0, 0, 255); 25]);

        let palette = quantize(&pixels, 4);
        assert!(palette.contains(&Srgb::new(252, 4, 4)), "{palette:?}");
        assert!(palette.contains(&Srgb::new(4, 4, 252)), "{palette:?}");
        assert!(palette.len() <= 4);
    }

    #[test]
    fn test_palette_is_ordered_by_population_times_volume() {
        let mut pixels = Vec::new();
        for v in 0..=255u8 {
            pixels.push(Srgb::new(v, 255 - v, v / 2));
            pixels.push(Srgb::new(v / 4, v / 4, v / 4));
        }
        let histogram = Histogram::from_pixels(&pixels);

        let mut queue = BoxQueue::new(|b| b.count as u64);
        queue.push(ColorBox::from_pixels(&pixels, &histogram));
        iterate(&mut queue, &histogram, 8.0);
        assert!(queue.len() >= 8);

        let mut weights = Vec::new();
        let mut by_weight = BoxQueue::new(ColorBox::weight);
        while let Some(b) = queue.pop() {
            by_weight.push(b);
        }
        while let Some(b) = by_weight.pop() {
            weights.push(b.weight());
        }
        assert!(weights.windows(2).all(|w| w[0] >= w[1]), "{weights:?}");
    }

    #[test]
    fn test_split_conserves_population() {
        let pixels: Vec<Srgb> = (0..=255u8).map(|v| Srgb::new(v, v / 2, 255 - v)).collect();
        let histogram = Histogram::from_pixels(&pixels);
        let whole = ColorBox::from_pixels(&pixels, &histogram);
        assert_eq!(whole.count, 256);

        let (a, b) = median_cut_apply(&histogram, &whole).unwrap();
        let b = b.unwrap();
        assert_eq!(a.count + b.count, whole.count);
        assert!(a.count > 0 && b.count > 0);
    }

    #[test]
    fn test_queue_pops_largest_and_latest_among_equals() {
        let histogram = Histogram::from_pixels(&[]);
        let mut queue = BoxQueue::new(|b| b.hi[0] as u64);
        queue.push(ColorBox::new([0, 0, 0], [1, 0, 0], &histogram));
        queue.push(ColorBox::new([0, 0, 0], [5, 0, 0], &histogram));
        queue.push(ColorBox::new([1, 0, 0], [5, 0, 0], &histogram));

        assert_eq!(queue.pop().map(|b| b.lo[0]), Some(1));
        assert_eq!(queue.pop().map(|b| b.lo[0]), Some(0));
        assert_eq!(queue.pop().map(|b| b.hi[0]), Some(1));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_deterministic() {
        let pixels: Vec<Srgb> = (0..2000u32)
            .map(|i| Srgb::new((i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8))
            .collect();
        assert_eq!(quantize(&pixels, 4), quantize(&pixels, 4));
    }
}
