//! Minimal XMP packet attribute scanner.
//!
//! Drone vendors write their telemetry as RDF attributes inside the file's
//! XMP packet (`drone-dji:AbsoluteAltitude="+102.36"` and friends). A full
//! XML parse is unnecessary for that shape; this scanner lifts every
//! `prefix:Name="value"` attribute between the `x:xmpmeta` markers into the
//! tag container.

use crate::tags::{TagSet, TagValue};

const XMP_OPEN: &[u8] = b"<x:xmpmeta";
const XMP_CLOSE: &[u8] = b"</x:xmpmeta>";

/// Scan a file's bytes for an XMP packet and merge its attributes into
/// `tags`. Files without a packet are left untouched.
pub fn scan_xmp_attributes(data: &[u8], tags: &mut TagSet) {
    let Some(start) = find(data, XMP_OPEN) else {
        return;
    };
    let Some(end) = find(&data[start..], XMP_CLOSE) else {
        return;
    };

    let packet = String::from_utf8_lossy(&data[start..start + end]);
    let bytes = packet.as_bytes();

    let mut i = 0;
    while i < bytes.len() {
        // An attribute is name="value" with a namespaced name
        if bytes[i] == b'=' && i + 1 < bytes.len() && bytes[i + 1] == b'"' {
            let name_end = i;
            let mut name_start = i;
            while name_start > 0 && is_name_byte(bytes[name_start - 1]) {
                name_start -= 1;
            }
            let name = &packet[name_start..name_end];

            let value_start = i + 2;
            if let Some(quote) = find(&bytes[value_start..], b"\"") {
                let value = &packet[value_start..value_start + quote];
                if name.contains(':') && !name.starts_with("xmlns") {
                    tags.insert(name.to_string(), TagValue::Text(value.to_string()));
                }
                i = value_start + quote + 1;
                continue;
            }
        }
        i += 1;
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b':' || b == b'-' || b == b'_' || b == b'.'
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
