#![no_main]

use libfuzzer_sys::fuzz_target;
use persist_codec::utils::compression::{compress, decompress};

const LIMIT: usize = 1024 * 1024;

fuzz_target!(|data: &[u8]| {
    // Roundtrip at a level chosen by the first byte
    let level = data.first().map_or(6, |b| u32::from(*b % 10));
    if let Ok(compressed) = compress(data, level) {
        let restored = decompress(&compressed, usize::MAX).expect("roundtrip");
        assert_eq!(restored, data);
    }

    // Raw decompression of malformed input must stay within the limit
    if let Ok(out) = decompress(data, LIMIT) {
        assert!(out.len() <= LIMIT);
    }
});
