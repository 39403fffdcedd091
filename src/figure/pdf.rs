//! Single-page PDF holding one figure as a JPEG (`/DCTDecode`) image.

use std::io::Write;

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

use super::{Figure, FigureError};
use crate::consts::FIGURE_DPI;

const JPEG_QUALITY: u8 = 95;

pub fn encode(figure: &Figure) -> Result<Vec<u8>, FigureError> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode(
        figure.pixels(),
        figure.width(),
        figure.height(),
        ExtendedColorType::Rgb8,
    )?;

    // Page size in points (1/72 inch).
    let page_w = f64::from(figure.width()) * 72.0 / FIGURE_DPI;
    let page_h = f64::from(figure.height()) * 72.0 / FIGURE_DPI;
    let content = format!("q {page_w:.2} 0 0 {page_h:.2} 0 0 cm /Im0 Do Q\n");

    let mut out: Vec<u8> = Vec::new();
    let mut offsets = Vec::with_capacity(5);
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    offsets.push(out.len());
    out.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    offsets.push(out.len());
    out.extend_from_slice(b"2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n");

    offsets.push(out.len());
    write!(
        out,
        "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {page_w:.2} {page_h:.2}] \
         /Resources << /XObject << /Im0 4 0 R >> >> /Contents 5 0 R >>\nendobj\n"
    )?;

    offsets.push(out.len());
    write!(
        out,
        "4 0 obj\n<< /Type /XObject /Subtype /Image /Width {} /Height {} \
         /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>\nstream\n",
        figure.width(),
        figure.height(),
        jpeg.len()
    )?;
    out.extend_from_slice(&jpeg);
    out.extend_from_slice(b"\nendstream\nendobj\n");

    offsets.push(out.len());
    write!(
        out,
        "5 0 obj\n<< /Length {} >>\nstream\n{content}endstream\nendobj\n",
        content.len()
    )?;

    let xref = out.len();
    write!(out, "xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1)?;
    for offset in &offsets {
        write!(out, "{offset:010} 00000 n \n")?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
        offsets.len() + 1
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).rposition(|w| w == needle)
    }

    fn number_at(bytes: &[u8], start: usize) -> usize {
        let digits: String = bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .map(|&b| b as char)
            .collect();
        digits.parse().unwrap()
    }

    #[test]
    fn xref_points_at_objects() {
        let figure = Figure::from_rgb(2, 1, vec![10, 20, 30, 40, 50, 60]);
        let bytes = encode(&figure).unwrap();

        let start = rfind(&bytes, b"startxref\n").unwrap() + b"startxref\n".len();
        let xref = number_at(&bytes, start);
        assert!(bytes[xref..].starts_with(b"xref\n0 6\n"));

        // Entry for object 1 follows the header line and the free entry.
        let entry = xref + b"xref\n0 6\n".len() + 20;
        let offset = number_at(&bytes, entry);
        assert!(bytes[offset..].starts_with(b"1 0 obj"));

        let image = rfind(&bytes, b"4 0 obj").unwrap();
        let entry4 = xref + b"xref\n0 6\n".len() + 4 * 20;
        assert_eq!(number_at(&bytes, entry4), image);
        assert!(bytes.ends_with(b"%%EOF\n"));
    }
}
