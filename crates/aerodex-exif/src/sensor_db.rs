//! Static sensor size database.
//!
//! Fallback source of physical sensor widths when the focal-plane
//! resolution tags are missing. Keys are normalized sensor names as
//! produced by `extract_sensor` (lowercase `"make model"` with duplicate
//! make tokens removed).

/// Known sensor widths in millimeters, keyed by normalized sensor name.
static SENSOR_WIDTHS: &[(&str, f64)] = &[
    ("autel robotics xt701", 6.3),
    ("canon eos 5d mark iv", 36.0),
    ("canon eos m6", 22.3),
    ("canon eos r5", 36.0),
    ("canon ixus 220hs", 6.16),
    ("canon powershot g9 x", 13.2),
    ("canon powershot s100", 7.6),
    ("dji fc200", 6.17),
    ("dji fc220", 6.17),
    ("dji fc300c", 6.17),
    ("dji fc300s", 6.17),
    ("dji fc300x", 6.17),
    ("dji fc3170", 6.4),
    ("dji fc330", 6.17),
    ("dji fc3411", 6.4),
    ("dji fc350", 6.17),
    ("dji fc550", 17.3),
    ("dji fc6310", 13.2),
    ("dji fc6520", 17.3),
    ("dji fc7203", 6.3),
    ("dji mavic2-enterprise-advanced", 6.3),
    ("dji zenmuse z3", 6.17),
    ("gopro hero4 black", 6.17),
    ("gopro hero4 silver", 6.17),
    ("gopro hero8 black", 6.17),
    ("hasselblad l1d-20c", 13.2),
    ("nikon coolpix a", 23.6),
    ("nikon d800", 35.9),
    ("parrot anafi", 5.9),
    ("parrot bebop 2", 6.17),
    ("parrot sequoia", 4.8),
    ("phase one ixm-100", 44.0),
    ("ricoh gr ii", 23.7),
    ("samsung galaxy s7", 5.76),
    ("sensefly s.o.d.a.", 13.2),
    ("sentera 21022-02", 5.9),
    ("sentera 21030-06", 5.9),
    ("sony dsc-rx100m3", 13.2),
    ("sony dsc-wx220", 6.17),
    ("sony ilce-6000", 23.5),
    ("sony ilce-7r", 35.9),
    ("sony ilce-7rm4", 35.7),
    ("sony umc-r10c", 23.2),
    ("yuneec e90", 13.2),
];

/// Look up a sensor's physical width by normalized name.
pub fn sensor_width_mm(sensor: &str) -> Option<f64> {
    SENSOR_WIDTHS
        .iter()
        .find(|(name, _)| *name == sensor)
        .map(|(_, width)| *width)
}
