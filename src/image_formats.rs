use std::{path::*, io::*, fs::*, panic::AssertUnwindSafe};
use anyhow::Context;
use tiff::{*, encoder::*};
use fitrs::*;
use crate::{image::*, fs_utils::*};

pub const FITS_SUFFIX: &str = ".fits";
pub const TIFF_SUFFIX: &str = ".tiff";

/// Every FITS file starts with this card
const FITS_SIGNATURE: &[u8] = b"SIMPLE  =";

pub fn is_fits_file_name(file_name: &str) -> bool {
    file_name.ends_with(FITS_SUFFIX)
}

/// `m31.fits` -> `m31.tiff`
pub fn tiff_file_name_for(fits_file: &Path) -> PathBuf {
    let name = extract_file_name(fits_file);
    let stem = name.strip_suffix(FITS_SUFFIX).unwrap_or(name);
    PathBuf::from(format!("{}{}", stem, TIFF_SUFFIX))
}

/*****************************************************************************/

// FITS format

fn check_fits_signature(file_name: &Path) -> anyhow::Result<()> {
    let mut file = File::open(file_name)?;
    let mut header = [0_u8; FITS_SIGNATURE.len()];
    let ok = file.read_exact(&mut header).is_ok() && &header[..] == FITS_SIGNATURE;
    if !ok {
        anyhow::bail!("File doesn't start with SIMPLE keyword, not a FITS file");
    }
    Ok(())
}

fn blanks_to_nan<T: Copy + Into<f64>>(data: &[Option<T>]) -> Vec<f64> {
    data.iter()
        .map(|v| v.map(Into::into).unwrap_or(f64::NAN))
        .collect()
}

fn read_primary_hdu(file_name: &Path) -> anyhow::Result<Squeezed> {
    let fits = Fits::open(file_name)?;
    let hdu = fits
        .iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("FITS file has no primary HDU"))?;

    if let Some(HeaderValue::IntegerNumber(0)) = hdu.value("NAXIS") {
        return Ok(Squeezed::UnsupportedShape(Vec::new()));
    }

    let (axes, data): (Vec<usize>, Vec<f64>) = match hdu.read_data() {
        FitsData::FloatingPoint32(d) =>
            (d.shape.clone(), d.data.iter().map(|v| *v as f64).collect()),

        FitsData::FloatingPoint64(d) =>
            (d.shape.clone(), d.data.to_vec()),

        FitsData::IntegersI32(d) =>
            (d.shape.clone(), blanks_to_nan(&d.data)),

        FitsData::IntegersU32(d) =>
            (d.shape.clone(), blanks_to_nan(&d.data)),

        FitsData::Characters(d) =>
            (d.shape.clone(), d.data.iter().map(|c| *c as u32 as f64).collect()),
    };

    Squeezed::from_fits_data(&axes, data)
}

/// Reads data of first (primary) HDU and squeezes it
pub fn load_primary_array_from_fits_file(file_name: &Path) -> anyhow::Result<Squeezed> {
    check_fits_signature(file_name)
        .with_context(|| format!("Can't open `{}`", path_to_str(file_name)))?;

    // fitrs panics on some malformed headers instead of returning error
    std::panic::catch_unwind(AssertUnwindSafe(|| read_primary_hdu(file_name)))
        .map_err(|_| anyhow::anyhow!("FITS decoder crashed"))
        .and_then(|res| res)
        .with_context(|| format!("Can't read `{}`", path_to_str(file_name)))
}

/*****************************************************************************/

// TIFF format

pub fn save_grayscale_u8_to_tiff_file(
    image:     &ImageLayerU8,
    src_name:  &str,
    file_name: &Path
) -> anyhow::Result<()> {
    assert!(!image.is_empty());
    let mut file = BufWriter::new(File::create(file_name)?);
    {
        let mut encoder = TiffEncoder::new(&mut file)?;
        let mut tiff = encoder.new_image::<colortype::Gray8>(
            image.width() as u32,
            image.height() as u32
        )?;
        write_info_into_tiff(tiff.encoder(), src_name)?;
        tiff.write_data(image.as_slice())?;
    }
    file.flush()?;
    Ok(())
}

fn write_info_into_tiff<W: Write + Seek, K: TiffKind>(
    enc:      &mut tiff::encoder::DirectoryEncoder<W, K>,
    src_name: &str
) -> anyhow::Result<()> {
    use tiff::tags::*;

    enc.write_tag(
        Tag::Software,
        format!(
            "{} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ).as_str()
    )?;

    if !src_name.is_empty() {
        enc.write_tag(Tag::ImageDescription, src_name)?;
    }
    Ok(())
}
