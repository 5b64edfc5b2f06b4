use itertools::Itertools;

pub type Crd = i64;

/*****************************************************************************/

/* Image layer */

#[derive(Clone, Debug, PartialEq)]
pub struct ImageLayer<T>
where
    T: Copy + Clone + ImgLayerDefValue<Type = T>
{
    data: Vec<T>,
    width: Crd,
    height: Crd,
}

pub type ImageLayerF64 = ImageLayer::<f64>;
pub type ImageLayerU8 = ImageLayer::<u8>;

impl<T> ImageLayer<T>
where T: Copy + Clone + ImgLayerDefValue<Type = T> {
    pub fn new(width: Crd, height: Crd) -> ImageLayer<T> {
        let mut result = ImageLayer::<T> { data: vec![], width, height };
        result.data.resize((width * height) as usize, T::DEF_VALUE);
        result
    }

    pub fn from_vec(width: Crd, height: Crd, data: Vec<T>) -> anyhow::Result<ImageLayer<T>> {
        if width < 0 || height < 0 || data.len() != (width * height) as usize {
            anyhow::bail!(
                "Data length {} doesn't match image size {}x{}",
                data.len(), width, height
            );
        }
        Ok(ImageLayer { data, width, height })
    }

    pub fn width(&self) -> Crd {
        self.width
    }

    pub fn height(&self) -> Crd {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[cfg(test)]
    #[inline(always)]
    pub fn get(&self, x: Crd, y: Crd) -> Option<T> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some(self.data[(y * self.width + x) as usize])
    }

    #[cfg(test)]
    #[inline(always)]
    pub fn set(&mut self, x: Crd, y: Crd, value: T) {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            panic!("Internal error")
        }
        self.data[(y*self.width+x) as usize] = value;
    }

    pub fn iter<'a>(&'a self) -> std::slice::Iter<'a, T> {
        self.data.iter()
    }

    pub fn iter_mut<'a>(&'a mut self) -> std::slice::IterMut<'a, T> {
        self.data.iter_mut()
    }

    #[cfg(test)]
    pub fn iter_row<'a>(&'a self, y: Crd) -> std::slice::Iter<'a, T> {
        let pos = (y*self.width) as usize;
        self.data[pos..pos + self.width as usize].iter()
    }

    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }
}

pub trait ImgLayerDefValue {
    type Type;
    const DEF_VALUE: Self::Type;
}

impl ImgLayerDefValue for f64 {
    type Type = f64;
    const DEF_VALUE: Self::Type = 0.0;
}

impl ImgLayerDefValue for u8 {
    type Type = u8;
    const DEF_VALUE: Self::Type = 0;
}

/*****************************************************************************/

/* Squeezing of FITS arrays */

/// Result of squeezing the primary data array of FITS file.
/// Decided once, right after reading.
#[derive(Debug)]
pub enum Squeezed {
    Image2D(ImageLayerF64),

    /// Dimensions after squeeze, slowest axis first
    UnsupportedShape(Vec<usize>),
}

impl Squeezed {
    /// `axes` are in FITS order (`NAXIS1` first, fastest varying).
    /// Samples are in file order. Blank samples must be NaN.
    pub fn from_fits_data(axes: &[usize], data: Vec<f64>) -> anyhow::Result<Squeezed> {
        let expected_len: usize = if axes.is_empty() { 0 } else { axes.iter().product() };
        if data.len() != expected_len {
            anyhow::bail!(
                "FITS data has {} samples but axes {} require {}",
                data.len(),
                format_shape(&axes.iter().rev().copied().collect::<Vec<_>>()),
                expected_len
            );
        }

        let squeezed = squeeze(axes);
        match squeezed.as_slice() {
            &[width, height] if width > 0 && height > 0 => {
                let image = ImageLayerF64::from_vec(width as Crd, height as Crd, data)?;
                Ok(Squeezed::Image2D(image))
            }
            _ =>
                Ok(Squeezed::UnsupportedShape(squeezed.iter().rev().copied().collect())),
        }
    }
}

/// Removes axes of length 1 keeping order of remaining ones
pub fn squeeze(axes: &[usize]) -> Vec<usize> {
    axes.iter().copied().filter(|&a| a != 1).collect()
}

/// Formats shape as a tuple: `(5, 5, 2)`, `(7,)`, `()`
pub fn format_shape(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [single] => format!("({},)", single),
        _ => format!("({})", shape.iter().join(", ")),
    }
}
