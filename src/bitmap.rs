//! Encoding of a [`PixelBuffer`] as an uncompressed 24-bit BMP.
//!
//! The file is a 14 byte file header, a 40 byte info header and the pixel
//! rows. Rows are stored bottom row first and each row is padded with zero
//! bytes up to a multiple of 4 bytes. All integers are little endian.

use crate::{
    error::{FractalError, Result},
    image::{PixelBuffer, BYTES_PER_PIXEL},
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, info};
use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

pub const FILE_HEADER_SIZE: u32 = 14;
pub const INFO_HEADER_SIZE: u32 = 40;
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
const BITS_PER_PIXEL: u16 = 24;

/// Length of one stored row, rounded up to a multiple of 4
pub fn padded_row_len(width: u32) -> usize {
    (width as usize * BYTES_PER_PIXEL + 3) & !3
}

/// Number of zero bytes appended to each stored row
pub fn row_padding(width: u32) -> usize {
    padded_row_len(width) - width as usize * BYTES_PER_PIXEL
}

/// Total number of bytes `encode_bmp` writes for an image of this size
pub fn encoded_len(width: u32, height: u32) -> usize {
    PIXEL_DATA_OFFSET as usize + height as usize * padded_row_len(width)
}

/// The header fields of a 24-bit BMP
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpHeader {
    pub file_size: u32,
    pub pixel_offset: u32,
    pub info_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
}

impl BmpHeader {
    pub fn for_image(width: u32, height: u32) -> Result<BmpHeader> {
        let max = i32::MAX as u32;
        let too_large = FractalError::ImageTooLarge { width, height };
        if width > max || height > max {
            return Err(too_large);
        }
        let image_size = height as u64 * padded_row_len(width) as u64;
        let file_size = PIXEL_DATA_OFFSET as u64 + image_size;
        if file_size > u32::MAX as u64 {
            return Err(too_large);
        }
        Ok(BmpHeader {
            file_size: file_size as u32,
            pixel_offset: PIXEL_DATA_OFFSET,
            info_size: INFO_HEADER_SIZE,
            width: width as i32,
            height: height as i32,
            planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            compression: 0,
            image_size: image_size as u32,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        // file header
        w.write_all(b"BM")?;
        w.write_u32::<LittleEndian>(self.file_size)?;
        w.write_u32::<LittleEndian>(0)?;
        w.write_u32::<LittleEndian>(self.pixel_offset)?;
        // info header
        w.write_u32::<LittleEndian>(self.info_size)?;
        w.write_i32::<LittleEndian>(self.width)?;
        w.write_i32::<LittleEndian>(self.height)?;
        w.write_u16::<LittleEndian>(self.planes)?;
        w.write_u16::<LittleEndian>(self.bits_per_pixel)?;
        w.write_u32::<LittleEndian>(self.compression)?;
        w.write_u32::<LittleEndian>(self.image_size)?;
        // resolution, palette colors, important colors
        for _ in 0..4 {
            w.write_u32::<LittleEndian>(0)?;
        }
        Ok(())
    }

    /// Read back the headers of an encoded bitmap.
    pub fn parse<R: Read>(r: &mut R) -> Result<BmpHeader> {
        let mut magic = [0; 2];
        r.read_exact(&mut magic)?;
        if &magic != b"BM" {
            return Err(FractalError::NotABitmap("bad magic"));
        }
        let file_size = r.read_u32::<LittleEndian>()?;
        let _reserved = r.read_u32::<LittleEndian>()?;
        let pixel_offset = r.read_u32::<LittleEndian>()?;
        let info_size = r.read_u32::<LittleEndian>()?;
        if info_size != INFO_HEADER_SIZE {
            return Err(FractalError::NotABitmap("unsupported info header"));
        }
        let width = r.read_i32::<LittleEndian>()?;
        let height = r.read_i32::<LittleEndian>()?;
        let planes = r.read_u16::<LittleEndian>()?;
        let bits_per_pixel = r.read_u16::<LittleEndian>()?;
        if bits_per_pixel != BITS_PER_PIXEL {
            return Err(FractalError::NotABitmap("not 24 bits per pixel"));
        }
        let compression = r.read_u32::<LittleEndian>()?;
        let image_size = r.read_u32::<LittleEndian>()?;
        let mut rest = [0; 16];
        r.read_exact(&mut rest)?;
        Ok(BmpHeader {
            file_size,
            pixel_offset,
            info_size,
            width,
            height,
            planes,
            bits_per_pixel,
            compression,
            image_size,
        })
    }
}

/// Write `img` as a BMP into `w`, bottom row first.
pub fn encode_bmp<W: Write>(w: &mut W, img: &PixelBuffer) -> Result<()> {
    let header = BmpHeader::for_image(img.width(), img.height())?;
    header.write(w)?;
    let padding = [0u8; 3];
    let pad = row_padding(img.width());
    for y in (0..img.height()).rev() {
        w.write_all(img.row(y))?;
        w.write_all(&padding[..pad])?;
    }
    debug!(
        "encoded {}x{} bitmap, {} bytes",
        img.width(),
        img.height(),
        header.file_size
    );
    Ok(())
}

/// Encode `img` into a new vector
pub fn encode_to_vec(img: &PixelBuffer) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(encoded_len(img.width(), img.height()));
    encode_bmp(&mut out, img)?;
    Ok(out)
}

/// Create (or truncate) the file at `path` and write `img` into it.
/// The file is closed when this returns, also on failure.
pub fn write_bmp_file(path: &Path, img: &PixelBuffer) -> Result<()> {
    let unavailable = |source| FractalError::OutputSinkUnavailable {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(unavailable)?;
    let mut w = BufWriter::new(file);
    match encode_bmp(&mut w, img) {
        Ok(()) => {}
        Err(FractalError::Io(source)) => return Err(unavailable(source)),
        Err(e) => return Err(e),
    }
    w.flush().map_err(unavailable)?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut img = PixelBuffer::new(width, height);
        for (i, px) in img.data_mut().chunks_exact_mut(3).enumerate() {
            px.copy_from_slice(&[i as u8, (i >> 8) as u8, 7]);
        }
        img
    }

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        Cursor::new(&bytes[offset..offset + 4])
            .read_u32::<LittleEndian>()
            .unwrap()
    }

    #[test]
    fn padding_rule() {
        assert_eq!(row_padding(400), 0);
        assert_eq!(row_padding(401), 1);
        assert_eq!(row_padding(402), 2);
        assert_eq!(row_padding(403), 3);
        assert_eq!(row_padding(1), 1);
        assert_eq!(padded_row_len(401), 1204);
    }

    #[test]
    fn header_layout() {
        let bytes = encode_to_vec(&gradient(400, 300)).unwrap();
        assert_eq!(bytes.len(), 360054);
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(u32_at(&bytes, 2), 360054);
        assert_eq!(u32_at(&bytes, 6), 0);
        assert_eq!(u32_at(&bytes, 10), 54);
        assert_eq!(u32_at(&bytes, 14), 40);
        assert_eq!(u32_at(&bytes, 18), 400);
        assert_eq!(u32_at(&bytes, 22), 300);
        assert_eq!(&bytes[26..30], &[1, 0, 24, 0]);
        assert_eq!(u32_at(&bytes, 30), 0);
        assert_eq!(u32_at(&bytes, 34), 400 * 300 * 3);
        assert!(bytes[38..54].iter().all(|&b| b == 0));
    }

    #[test]
    fn rows_are_stored_bottom_up_with_padding() {
        let img = gradient(3, 2);
        let bytes = encode_to_vec(&img).unwrap();
        // 9 bytes per row + 3 padding
        assert_eq!(bytes.len(), 54 + 2 * 12);
        assert_eq!(&bytes[54..63], img.row(1));
        assert_eq!(&bytes[63..66], &[0, 0, 0]);
        assert_eq!(&bytes[66..75], img.row(0));
        assert_eq!(&bytes[75..78], &[0, 0, 0]);
    }

    #[test]
    fn size_law_holds_for_odd_widths() {
        for (w, h) in [(1, 1), (401, 3), (402, 5), (7, 0)] {
            let bytes = encode_to_vec(&gradient(w, h)).unwrap();
            assert_eq!(bytes.len(), encoded_len(w, h));
            assert_eq!(bytes.len(), 54 + h as usize * ((w as usize * 3 + 3) & !3));
            assert_eq!(u32_at(&bytes, 2) as usize, bytes.len());
        }
    }

    #[test]
    fn header_parses_back() {
        let bytes = encode_to_vec(&gradient(401, 3)).unwrap();
        let header = BmpHeader::parse(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(header, BmpHeader::for_image(401, 3).unwrap());
        assert_eq!(header.image_size, 3 * 1204);
    }

    #[test]
    fn parse_rejects_other_data() {
        let err = BmpHeader::parse(&mut Cursor::new(b"PK\x03\x04")).unwrap_err();
        assert!(matches!(err, FractalError::NotABitmap(_)));
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_errors_are_reported() {
        let err = encode_bmp(&mut FailingSink, &gradient(2, 2)).unwrap_err();
        assert!(matches!(err, FractalError::Io(_)));
    }

    #[test]
    fn unwritable_path_is_unavailable_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.bmp");
        let err = write_bmp_file(&path, &gradient(2, 2)).unwrap_err();
        match err {
            FractalError::OutputSinkUnavailable { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
