#![allow(clippy::unwrap_used)]

use persist_codec::{Codec, Encrypted, Persistable, PortableSigned, Signed};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Histogram {
    bins: Vec<u64>,
    worker: usize,
}

impl Persistable for Histogram {
    const CLASS_NAME: &'static str = "Histogram";

    fn revision(&self) -> u32 {
        1
    }
}

fn hammer<C>(codec: Arc<C>, threads: usize, iterations: usize)
where
    C: Codec + Send + Sync + 'static,
{
    let payload_sizes = [0usize, 64, 512, 4096];

    let handles: Vec<_> = (0..threads)
        .map(|worker| {
            let codec = Arc::clone(&codec);
            thread::spawn(move || {
                for i in 0..iterations {
                    let size = payload_sizes[(worker + i) % payload_sizes.len()];
                    let model = Histogram {
                        bins: vec![(i * worker) as u64; size],
                        worker,
                    };
                    let encoding = codec.encode(&model).unwrap();
                    let restored: Histogram = codec.decode(&encoding).unwrap();
                    assert_eq!(restored, model);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn concurrent_signed_shared_instance() {
    // One stretched key shared by every thread
    hammer(Arc::new(Signed::new("hunter2").unwrap()), 8, 200);
}

#[test]
fn concurrent_portable_shared_instance() {
    hammer(Arc::new(PortableSigned::new("hunter2")), 8, 200);
}

#[test]
fn concurrent_encrypted_shared_instance() {
    hammer(Arc::new(Encrypted::new("hunter2")), 8, 200);
}

#[test]
fn concurrent_writers_single_reader() {
    let writer = Arc::new(PortableSigned::new("hunter2"));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                writer
                    .encode(&Histogram {
                        bins: vec![worker as u64; 32],
                        worker,
                    })
                    .unwrap()
            })
        })
        .collect();

    let reader = PortableSigned::new("hunter2");
    for (worker, handle) in handles.into_iter().enumerate() {
        let restored: Histogram = reader.decode(&handle.join().unwrap()).unwrap();
        assert_eq!(restored.worker, worker);
        assert_eq!(restored.bins, vec![worker as u64; 32]);
    }
}
