#![no_main]

use libfuzzer_sys::fuzz_target;
use ldapsync::infrastructure::directory::{DirectorySnapshot, SnapshotFormat};

fuzz_target!(|data: &[u8]| {
    let Some((selector, rest)) = data.split_first() else {
        return;
    };
    let format = match selector % 3 {
        0 => SnapshotFormat::Json,
        1 => SnapshotFormat::Yaml,
        _ => SnapshotFormat::Toml,
    };
    if let Ok(content) = std::str::from_utf8(rest) {
        if let Ok(snapshot) = DirectorySnapshot::parse(content, format) {
            for entry in snapshot.entries() {
                let _ = entry.group_names("memberof");
                let _ = entry.is_under("DC=corp,DC=example");
            }
        }
    }
});
