use parallax_image::{Image, ImageError};

/// Fill masked pixels by diffusing the surrounding image content inward.
///
/// Runs Gauss-Seidel relaxation of the hole region: every masked pixel is
/// repeatedly replaced by the average of its 4-neighbors while the unmasked
/// pixels act as hard boundary constraints. Sweeps alternate between raster
/// and reverse raster order so color propagates from all sides. The result
/// is the harmonic (smooth) continuation of the surrounding structure, not
/// a blur of the hole content.
///
/// An empty mask reduces to a plain copy.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
/// * `dst` - The output image with shape (H, W, C).
/// * `mask` - Single-channel mask, non-zero on the pixels to fill.
/// * `iterations` - The number of relaxation sweeps.
pub fn inpaint_diffusion<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    mask: &Image<u8, 1>,
    iterations: usize,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            mask.cols(),
            mask.rows(),
        ));
    }

    dst.as_slice_mut().copy_from_slice(src.as_slice());

    let (rows, cols) = (src.rows(), src.cols());
    let holes = mask
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(_, &m)| m != 0)
        .map(|(i, _)| (i / cols, i % cols))
        .collect::<Vec<_>>();

    if holes.is_empty() {
        return Ok(());
    }

    // seed the hole region so the relaxation does not drag in stale content
    for &(r, c) in holes.iter() {
        dst.as_slice_mut()[(r * cols + c) * C..(r * cols + c) * C + C].fill(0.0);
    }

    let data = dst.as_slice_mut();
    for sweep in 0..iterations {
        let mut relax = |r: usize, c: usize| {
            let mut neighbors: [(usize, usize); 4] = [(0, 0); 4];
            let mut count = 0;
            if r > 0 {
                neighbors[count] = (r - 1, c);
                count += 1;
            }
            if r + 1 < rows {
                neighbors[count] = (r + 1, c);
                count += 1;
            }
            if c > 0 {
                neighbors[count] = (r, c - 1);
                count += 1;
            }
            if c + 1 < cols {
                neighbors[count] = (r, c + 1);
                count += 1;
            }

            for ch in 0..C {
                let mut acc = 0.0;
                for &(nr, nc) in neighbors.iter().take(count) {
                    acc += data[(nr * cols + nc) * C + ch];
                }
                data[(r * cols + c) * C + ch] = acc / count as f32;
            }
        };

        if sweep % 2 == 0 {
            for &(r, c) in holes.iter() {
                relax(r, c);
            }
        } else {
            for &(r, c) in holes.iter().rev() {
                relax(r, c);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use parallax_image::{Image, ImageError, ImageSize};

    #[test]
    fn inpaint_empty_mask_is_a_copy() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 3,
        };
        let image = Image::<f32, 3>::new(
            size,
            (0..size.width * size.height * 3).map(|x| x as f32).collect(),
        )?;
        let mask = Image::<u8, 1>::from_size_val(size, 0)?;

        let mut filled = Image::<f32, 3>::from_size_val(size, 0.0)?;
        super::inpaint_diffusion(&image, &mut filled, &mask, 16)?;

        assert_eq!(filled.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn inpaint_fills_hole_in_flat_image() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 8,
            height: 8,
        };
        let image = Image::<f32, 1>::from_size_val(size, 0.5)?;

        let mut mask = Image::<u8, 1>::from_size_val(size, 0)?;
        for v in 3..5 {
            for u in 3..5 {
                mask.as_slice_mut()[v * size.width + u] = 1;
            }
        }

        let mut filled = Image::<f32, 1>::from_size_val(size, 0.0)?;
        super::inpaint_diffusion(&image, &mut filled, &mask, 64)?;

        // the hole converges to the surrounding flat color
        for &x in filled.as_slice() {
            assert!((x - 0.5).abs() < 1e-3);
        }

        Ok(())
    }

    #[test]
    fn inpaint_interpolates_gradient() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 9,
            height: 3,
        };
        // horizontal ramp with the middle column knocked out
        let image = Image::<f32, 1>::new(
            size,
            (0..size.width * size.height)
                .map(|i| (i % size.width) as f32 / (size.width - 1) as f32)
                .collect(),
        )?;

        let mut mask = Image::<u8, 1>::from_size_val(size, 0)?;
        for v in 0..size.height {
            mask.as_slice_mut()[v * size.width + 4] = 1;
        }

        let mut filled = Image::<f32, 1>::from_size_val(size, 0.0)?;
        super::inpaint_diffusion(&image, &mut filled, &mask, 64)?;

        // the filled column lands between its neighbors
        let center = filled.as_slice()[size.width + 4];
        assert!((center - 0.5).abs() < 1e-2);

        Ok(())
    }
}
