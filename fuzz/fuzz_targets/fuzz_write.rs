#![no_main]

use exif_io::ExifData;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Whatever parses must write, and writing is stable across a re-parse
    let Some(mut exif) = ExifData::from_bytes(data) else {
        return;
    };
    let Ok(first) = exif.to_bytes() else {
        return;
    };

    let mut reparsed = ExifData::from_bytes(&first).expect("written stream has a valid header");
    let second = reparsed.to_bytes().expect("re-parsed tree writes");
    assert_eq!(first, second);
});
