#[cfg(feature = "jp2io")]
use crate::image::{Image, PixelFormat};
#[cfg(feature = "jp2io")]
use hayro_jpeg2000::{self, ColorSpace};
#[cfg(feature = "jp2io")]
use openjp2::image::opj_image_comptparm;
#[cfg(feature = "jp2io")]
use openjp2::openjpeg::{opj_codec_t, opj_cparameters_t, opj_create_compress,
                        opj_destroy_codec, opj_encode, opj_end_compress,
                        opj_image, opj_setup_encoder, opj_start_compress,
                        opj_stream_create_default_file_stream,
                        opj_stream_destroy, opj_stream_t, OPJ_CLRSPC_GRAY,
                        OPJ_CLRSPC_SRGB, OPJ_CODEC_JP2};
#[cfg(feature = "jp2io")]
use std::ffi::CString;
#[cfg(feature = "jp2io")]
use std::{fs, io};

// A JP2 file starts with this signature box; a bare codestream starts with
// the SOC and SIZ markers.
const JP2_SIGNATURE: &[u8; 12] = b"\0\0\0\x0cjP  \r\n\x87\n";
const J2K_SIGNATURE: &[u8; 4] = b"\xff\x4f\xff\x51";

/// Returns true if the data looks like a JPEG 2000 file or codestream.
pub fn is_jp2(data: &[u8]) -> bool {
    data.starts_with(JP2_SIGNATURE) || data.starts_with(J2K_SIGNATURE)
}

#[cfg(feature = "jp2io")]
impl Image {
    /// Reads an image from a Jpeg 2000 file.
    pub fn read_jp2(input: &[u8]) -> io::Result<Image> {
        let image = hayro_jpeg2000::Image::new(
            input,
            &hayro_jpeg2000::DecodeSettings {
                resolve_palette_indices: true,
                strict: false,
                target_resolution: None,
            },
        )
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let pixel_format = match (image.color_space(), image.has_alpha()) {
            (ColorSpace::Gray, true) => PixelFormat::GrayAlpha,
            (ColorSpace::Gray, false) => PixelFormat::Gray,
            (ColorSpace::RGB, true) => PixelFormat::RGBA,
            (ColorSpace::RGB, false) => PixelFormat::RGB,
            (ColorSpace::CMYK, _) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "jpeg2000 images with CMYK color space not supported",
                ));
            }
            (ColorSpace::Unknown { num_channels }, _) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "jpeg2000 images with Unknown ({num_channels}\
                        -channel) color space not supported"
                    ),
                ));
            }
            (ColorSpace::Icc { .. }, _) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "jpeg2000 images with ICC profile not supported",
                ));
            }
        };
        let (width, height) = (image.width(), image.height());
        let img_data = image
            .decode()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let img_data: &[u8] = &img_data;
        Image::from_data(pixel_format, width, height, img_data.to_vec())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData,
                               "decoded jpeg2000 data has unexpected length")
            })
    }

    /// Writes the image as a lossless JP2 file and returns its bytes.
    pub fn write_jp2(&self) -> io::Result<Vec<u8>> {
        let image = match self.format {
            PixelFormat::Alpha => self.convert_to(PixelFormat::GrayAlpha),
            _ => self.clone(),
        };
        let format = image.pixel_format();
        let channels = format.bytes_per_pixel() as usize;
        let (width, height) = (image.width(), image.height());
        let params = vec![
            opj_image_comptparm {
                dx: 1,
                dy: 1,
                w: width,
                h: height,
                prec: 8,
                bpp: 8,
                ..Default::default()
            };
            channels
        ];
        let color_space = match format.color_space() {
            crate::image::ColorSpace::Gray => OPJ_CLRSPC_GRAY,
            crate::image::ColorSpace::Rgb => OPJ_CLRSPC_SRGB,
        };
        let mut j2k = opj_image::create(&params, color_space)
            .ok_or_else(|| jp2_error("cannot allocate jpeg2000 components"))?;
        j2k.x1 = width;
        j2k.y1 = height;
        let comps = j2k
            .comps_mut()
            .ok_or_else(|| jp2_error("jpeg2000 image has no components"))?;
        for (channel, comp) in comps.iter_mut().enumerate() {
            if format.has_alpha() && channel + 1 == channels {
                comp.alpha = 1;
            }
            let samples = comp
                .data_mut()
                .ok_or_else(|| jp2_error("jpeg2000 component has no data"))?;
            let pixels = image.data().chunks_exact(channels);
            for (sample, pixel) in samples.iter_mut().zip(pixels) {
                *sample = i32::from(pixel[channel]);
            }
        }

        let mut params = opj_cparameters_t::default();
        params.tcp_numlayers = 1;
        params.tcp_rates[0] = 0.0;
        params.cp_disto_alloc = 1;
        params.numresolution = resolution_levels(width.min(height));
        params.tcp_mct = u8::from(channels >= 3) as _;

        let file = tempfile::NamedTempFile::new()?;
        let path = file
            .path()
            .to_str()
            .and_then(|path| CString::new(path).ok())
            .ok_or_else(|| jp2_error("temporary path is not valid UTF-8"))?;
        {
            let compressor = Compressor {
                codec: unsafe { opj_create_compress(OPJ_CODEC_JP2) },
                stream: unsafe {
                    opj_stream_create_default_file_stream(path.as_ptr(), 0)
                },
            };
            if compressor.codec.is_null() || compressor.stream.is_null() {
                return Err(jp2_error("cannot create jpeg2000 encoder"));
            }
            let image_ptr: *mut opj_image = &mut *j2k;
            let ok = unsafe {
                opj_setup_encoder(compressor.codec, &mut params, image_ptr) != 0 &&
                    opj_start_compress(compressor.codec, image_ptr,
                                       compressor.stream) != 0 &&
                    opj_encode(compressor.codec, compressor.stream) != 0 &&
                    opj_end_compress(compressor.codec, compressor.stream) != 0
            };
            if !ok {
                return Err(jp2_error("jpeg2000 encoding failed"));
            }
        }
        fs::read(file.path())
    }
}

/// Owns an encoder and its output stream; dropping it flushes the stream.
#[cfg(feature = "jp2io")]
struct Compressor {
    codec: *mut opj_codec_t,
    stream: *mut opj_stream_t,
}

#[cfg(feature = "jp2io")]
impl Drop for Compressor {
    fn drop(&mut self) {
        unsafe {
            opj_stream_destroy(self.stream);
            opj_destroy_codec(self.codec);
        }
    }
}

/// The smallest tile edge must cover every decomposition level.
#[cfg(feature = "jp2io")]
fn resolution_levels(min_edge: u32) -> i32 {
    let mut levels = 1;
    while levels < 6 && (min_edge >> levels) > 0 {
        levels += 1;
    }
    levels
}

#[cfg(feature = "jp2io")]
fn jp2_error(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}
