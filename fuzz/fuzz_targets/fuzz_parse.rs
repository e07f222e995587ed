#![no_main]

use exif_io::{ExifData, ExifInfo, ReadOptions, ThumbnailInfo};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any input must parse without panicking, only return None
    if let Some(exif) = ExifData::from_bytes(data) {
        let _ = exif.to_string();
        let _ = ExifInfo::from_exif(&exif);
        if let Some(thumb) = ThumbnailInfo::from_exif(&exif) {
            let _ = thumb.bytes(data);
        }
        for (_, dir) in exif.directories() {
            for (_, value) in dir.iter() {
                let _ = value.to_int(0);
                let _ = value.to_double(0);
                let _ = value.to_text();
            }
        }
    }

    // Tight limits take the early-exit paths
    let strict = ReadOptions::new().with_max_ifd_chain(1).with_max_sub_depth(1);
    let _ = ExifData::from_bytes_with(data, &strict);

    let _ = exif_io::jpeg::read_exif(data);
});
