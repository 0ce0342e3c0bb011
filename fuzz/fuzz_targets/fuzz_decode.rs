#![no_main]

use libfuzzer_sys::fuzz_target;
use persist_codec::{Codec, Encoding, Encrypted, Persistable, PortableSigned, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Target {
    weights: Vec<f64>,
    label: String,
}

impl Persistable for Target {
    const CLASS_NAME: &'static str = "Target";

    fn revision(&self) -> u32 {
        1
    }
}

fuzz_target!(|data: &[u8]| {
    let encoding = Encoding::from(data.to_vec());

    // Untrusted bytes must be rejected without panicking
    let portable: Result<Target> = PortableSigned::new("fuzz").decode(&encoding);
    assert!(portable.is_err());

    let _: Result<Target> = Encrypted::new("fuzz").decode(&encoding);
    let _ = PortableSigned::new("fuzz").inspect(&encoding);
});
