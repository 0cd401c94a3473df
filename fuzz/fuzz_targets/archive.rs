#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate initrd_core;

use initrd_core::ArchiveSrc;

fuzz_target!(|data: &[u8]| {
    let mut src = data;
    if let Ok(entries) = src.read_entries() {
        let mut buf = [0; 256];
        for entry in entries {
            let _ = src.read_entry(entry, 0, &mut buf);
        }
    }
});
