use puzzle_images::CandidateFile;

/// PNG signature followed by the start of an IHDR chunk.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ]
}

pub fn png_file() -> CandidateFile {
    CandidateFile::new("settlement.png", "image/png", create_minimal_png())
}

/// A file whose declared size is `size`, without allocating that much.
pub fn declared_file(name: &str, content_type: &str, size: u64) -> CandidateFile {
    CandidateFile::new(name, content_type, create_minimal_png()).with_declared_size(size)
}
