use std::fmt;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Latest capture of the worker's browser viewport.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    revision: u64,
    image: Vec<u8>,
    natural_size: Option<(u32, u32)>,
}

impl Snapshot {
    pub fn new(revision: u64, image: Vec<u8>) -> Self {
        let natural_size = png_dimensions(&image);
        Self {
            revision,
            image,
            natural_size,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Pixel size of the capture, known only for PNG payloads.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.natural_size
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("revision", &self.revision)
            .field("bytes", &self.image.len())
            .field("natural_size", &self.natural_size)
            .finish()
    }
}

/// Reads width and height from the IHDR chunk, which must follow the signature.
fn png_dimensions(image: &[u8]) -> Option<(u32, u32)> {
    if image.len() < 24 || image[..8] != PNG_SIGNATURE || &image[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(image[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(image[20..24].try_into().ok()?);
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

#[cfg(test)]
pub(crate) fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_size_from_png_header() {
        let snapshot = Snapshot::new(1, png_header(800, 600));
        assert_eq!(snapshot.natural_size(), Some((800, 600)));
    }

    #[test]
    fn non_png_payload_has_no_size() {
        assert_eq!(Snapshot::new(1, b"GIF89a....".to_vec()).natural_size(), None);
        assert_eq!(Snapshot::new(1, Vec::new()).natural_size(), None);
    }
}
